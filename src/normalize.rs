//! Session list normalization.
//!
//! Turns the raw session list of a stored group into its canonical form:
//! every field canonicalized, invalid entries set aside with a reason, the
//! rest sorted by (day index, time in minutes).
//!
//! Duplicate (day, time, room) triples are kept. Detecting them is a
//! save-time concern handled by [`crate::occupancy`].

use thiserror::Error;
use tracing::debug;

use crate::canon::Canonicalizer;
use crate::models::{RawSession, Session};

/// Why a raw session was left out of the canonical list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// Day field missing or blank.
    #[error("missing day")]
    MissingDay,
    /// Time field missing or blank.
    #[error("missing time")]
    MissingTime,
    /// Time present but not `H:MM`/`HH:MM`.
    #[error("invalid time '{0}'")]
    InvalidTime(String),
    /// Room field missing or blank.
    #[error("missing room")]
    MissingRoom,
    /// Day did not resolve to a registry day.
    #[error("unknown day '{0}'")]
    UnknownDay(String),
    /// Room did not resolve to a registry room.
    #[error("unknown room '{0}'")]
    UnknownRoom(String),
}

/// A raw entry that did not survive normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSession {
    /// The entry as received.
    pub raw: RawSession,
    /// First failing check.
    pub reason: RejectReason,
}

/// Result of normalizing one session list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Canonical sessions, sorted.
    pub accepted: Vec<Session>,
    /// Entries left out, in input order.
    pub rejected: Vec<RejectedSession>,
}

impl Normalized {
    /// Whether every raw entry was accepted.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Canonicalizes a single raw session.
pub fn normalize_session(canon: &Canonicalizer, raw: &RawSession) -> Result<Session, RejectReason> {
    let day = canon.canon_day(raw.day_str());
    if day.is_empty() {
        return Err(RejectReason::MissingDay);
    }

    let raw_time = raw.time_str().trim();
    if raw_time.is_empty() {
        return Err(RejectReason::MissingTime);
    }
    let time = canon.canon_time(raw_time);
    if time.is_empty() {
        return Err(RejectReason::InvalidTime(raw_time.to_string()));
    }

    let room = canon.canon_room(raw.room_str());
    if room.is_empty() {
        return Err(RejectReason::MissingRoom);
    }

    if !canon.days().contains(&day) {
        return Err(RejectReason::UnknownDay(day));
    }
    if !canon.rooms().is_empty() && !canon.rooms().contains(&room) {
        return Err(RejectReason::UnknownRoom(room));
    }

    Ok(Session { day, time, room })
}

/// Normalizes a raw session list.
///
/// Output is sorted by (day index, time in minutes); the sort is stable so
/// sessions sharing day and time keep their input order. Applying this to
/// its own output yields the same list.
pub fn normalize_sessions(canon: &Canonicalizer, raw: &[RawSession]) -> Normalized {
    let mut out = Normalized::default();

    for entry in raw {
        match normalize_session(canon, entry) {
            Ok(session) => out.accepted.push(session),
            Err(reason) => {
                debug!(?entry, %reason, "session dropped during normalization");
                out.rejected.push(RejectedSession {
                    raw: entry.clone(),
                    reason,
                });
            }
        }
    }

    out.accepted.sort_by(|a, b| canon.compare_sessions(a, b));
    out
}

/// Re-normalizes already canonical sessions.
pub fn renormalize(canon: &Canonicalizer, sessions: &[Session]) -> Normalized {
    let raw: Vec<RawSession> = sessions.iter().map(RawSession::from).collect();
    normalize_sessions(canon, &raw)
}
