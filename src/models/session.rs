//! Session model.
//!
//! A session is one weekly recurring slot: day × time × room. It has no
//! identity of its own; two sessions with the same triple are the same slot.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::loose::de_opt_text;

/// A canonical session.
///
/// Produced by the normalizer; `day` and `room` are canonical registry
/// values and `time` is zero-padded `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Session {
    /// Canonical day label.
    pub day: String,
    /// Start time, `HH:MM`.
    pub time: String,
    /// Canonical room key.
    pub room: String,
}

/// A session as stored by the persistence layer, before canonicalization.
///
/// Any field may be missing, null, numeric (`"room": 1`) or written in a
/// loose form ("salon 2", "9:5").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSession {
    #[serde(
        default,
        deserialize_with = "de_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub day: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub room: Option<String>,
}

/// Occupancy key of a slot: `"{day}__{time}__{room}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionKey(String);

impl Session {
    /// Creates a session from already-canonical values.
    pub fn new(day: impl Into<String>, time: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            time: time.into(),
            room: room.into(),
        }
    }

    /// Occupancy key for this slot.
    pub fn key(&self) -> SessionKey {
        SessionKey(format!("{}__{}__{}", self.day, self.time, self.room))
    }

    /// Per-day cell key (`"{time}__{room}"`) used by day statistics.
    pub fn cell_key(&self) -> String {
        format!("{}__{}", self.time, self.room)
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} en {}", self.day, self.time, self.room)
    }
}

impl RawSession {
    /// Creates a raw session with all three fields present.
    pub fn new(day: impl Into<String>, time: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            day: Some(day.into()),
            time: Some(time.into()),
            room: Some(room.into()),
        }
    }

    pub(crate) fn day_str(&self) -> &str {
        self.day.as_deref().unwrap_or("")
    }

    pub(crate) fn time_str(&self) -> &str {
        self.time.as_deref().unwrap_or("")
    }

    pub(crate) fn room_str(&self) -> &str {
        self.room.as_deref().unwrap_or("")
    }
}

impl From<&Session> for RawSession {
    fn from(s: &Session) -> Self {
        Self::new(s.day.clone(), s.time.clone(), s.room.clone())
    }
}

impl SessionKey {
    /// The key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
