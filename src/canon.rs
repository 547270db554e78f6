//! Canonicalization of loosely-typed day, time and room input.
//!
//! Stored records carry whatever the editors typed: "miercoles",
//! "SALON 2", "9:5". The [`Canonicalizer`] folds those into the registry's
//! canonical values.
//!
//! # Folding
//! Text is NFKC-normalized, trimmed, lowercased, decomposed and stripped
//! of combining marks, and has inner whitespace runs collapsed to one
//! space. Folding is only used for alias
//! lookup; canonical values keep their accents.
//!
//! # Failure Model
//! Nothing here fails. Unknown days and rooms pass through trimmed so the
//! normalizer can reject them with a reason; unparseable times become the
//! empty string.

use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

use crate::models::{DayRegistry, RoomRegistry, Session};

static TIME_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,2}):([0-9]{1,2})$").ok());

/// Sort position for times that do not parse.
const UNPARSEABLE_MINUTES: u32 = 9999;

/// Folds text for alias matching.
///
/// Compatibility forms are unified (NFKC) before lowercasing, then the
/// text is decomposed (NFD) so every combining mark can be dropped.
pub fn fold(text: &str) -> String {
    let lowered: String = text.nfkc().flat_map(char::to_lowercase).collect();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for c in lowered.trim().nfd() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if is_combining_mark(c) {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    out
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Canonicalizes a time to zero-padded `HH:MM`.
///
/// Accepts one or two digits on each side of the colon. Hours clamp to
/// 0..=23 and minutes to 0..=59. Returns an empty string when the input
/// does not look like a time at all.
pub fn canon_time(raw: &str) -> String {
    let Some(re) = &*TIME_RE else {
        return String::new();
    };
    let Some(caps) = re.captures(raw.trim()) else {
        return String::new();
    };

    let hour = caps[1].parse::<u32>().unwrap_or(0).min(23);
    let minute = caps[2].parse::<u32>().unwrap_or(0).min(59);
    format!("{hour:02}:{minute:02}")
}

/// Minutes since midnight, or `None` when the time does not parse.
pub fn time_to_minutes(raw: &str) -> Option<u32> {
    let t = canon_time(raw);
    let (h, m) = t.split_once(':')?;
    Some(h.parse::<u32>().ok()? * 60 + m.parse::<u32>().ok()?)
}

/// Minutes used for ordering; unparseable times sort last.
pub fn sort_minutes(raw: &str) -> u32 {
    time_to_minutes(raw).unwrap_or(UNPARSEABLE_MINUTES)
}

/// Resolves fuzzy day and room strings against injected registries.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    days: DayRegistry,
    rooms: RoomRegistry,
    day_aliases: HashMap<String, String>,
    room_aliases: HashMap<String, String>,
}

impl Canonicalizer {
    /// Builds alias tables for the given registries.
    pub fn new(days: DayRegistry, rooms: RoomRegistry) -> Self {
        let day_aliases = days
            .iter()
            .map(|d| (fold(d), d.to_string()))
            .collect::<HashMap<_, _>>();

        let mut room_aliases = HashMap::new();
        for room in rooms.rooms() {
            for alias in [&room.key, &room.short, &room.label] {
                if !alias.trim().is_empty() {
                    room_aliases
                        .entry(fold(alias))
                        .or_insert_with(|| room.key.clone());
                }
            }
        }

        Self {
            days,
            rooms,
            day_aliases,
            room_aliases,
        }
    }

    /// Day registry in use.
    pub fn days(&self) -> &DayRegistry {
        &self.days
    }

    /// Room registry in use.
    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Canonical day label, or the trimmed input when no alias matches.
    pub fn canon_day(&self, raw: &str) -> String {
        self.day_aliases
            .get(&fold(raw))
            .cloned()
            .unwrap_or_else(|| raw.trim().to_string())
    }

    /// Canonical room key, or the trimmed input when no alias matches.
    pub fn canon_room(&self, raw: &str) -> String {
        self.room_aliases
            .get(&fold(raw))
            .cloned()
            .unwrap_or_else(|| raw.trim().to_string())
    }

    /// Canonical time; see [`canon_time`].
    pub fn canon_time(&self, raw: &str) -> String {
        canon_time(raw)
    }

    /// Day position in the week; unknown days sort after every known one.
    pub fn day_rank(&self, day: &str) -> usize {
        self.days.index_of(day).unwrap_or(usize::MAX)
    }

    /// Orders sessions by (day index, time in minutes).
    pub fn compare_sessions(&self, a: &Session, b: &Session) -> Ordering {
        self.day_rank(&a.day)
            .cmp(&self.day_rank(&b.day))
            .then_with(|| sort_minutes(&a.time).cmp(&sort_minutes(&b.time)))
    }
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new(DayRegistry::default(), RoomRegistry::academy())
    }
}
