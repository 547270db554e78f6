//! Day grid rows and free-slot suggestions.
//!
//! The day grid shows one row per start time: the configured base slots
//! plus any other time used on that day, in chronological order.

use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

use crate::canon::sort_minutes;
use crate::models::RoomRegistry;
use crate::stats::DaySession;

/// Candidate times used when no slot is a peak hour.
pub const FALLBACK_SLOT_COUNT: usize = 4;

/// An unoccupied (time, room) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreeSlot {
    pub time: String,
    pub room: String,
}

/// One grid cell with the groups holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub room: String,
    pub group_ids: Vec<String>,
}

impl GridCell {
    /// More than one group in the cell.
    pub fn is_collision(&self) -> bool {
        self.group_ids.len() > 1
    }
}

/// One grid row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub time: String,
    /// One cell per registry room, in registry order.
    pub cells: Vec<GridCell>,
}

/// Union of day-session times and base slots, sorted by minutes.
pub fn build_time_slots(day_sessions: &[DaySession], base_slots: &[String]) -> Vec<String> {
    let set: BTreeSet<&str> = day_sessions
        .iter()
        .map(|s| s.time.as_str())
        .chain(base_slots.iter().map(String::as_str))
        .filter(|t| !t.is_empty())
        .collect();

    let mut slots: Vec<String> = set.into_iter().map(String::from).collect();
    slots.sort_by_key(|t| sort_minutes(t));
    slots
}

/// Lays day sessions out on a time × room grid.
///
/// Sessions in rooms outside the registry or at times outside `slots` are
/// not placed.
pub fn build_day_grid(
    day_sessions: &[DaySession],
    slots: &[String],
    rooms: &RoomRegistry,
) -> Vec<GridRow> {
    slots
        .iter()
        .map(|time| GridRow {
            time: time.clone(),
            cells: rooms
                .rooms()
                .iter()
                .map(|room| GridCell {
                    room: room.key.clone(),
                    group_ids: day_sessions
                        .iter()
                        .filter(|s| s.time == *time && s.room == room.key)
                        .map(|s| s.group_id.clone())
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

/// Free cells worth proposing for new groups.
///
/// Candidate times are the peak-hour slots, or the last
/// [`FALLBACK_SLOT_COUNT`] slots when none is a peak hour. Every candidate
/// time is crossed with every room; occupied cells are skipped.
pub fn suggest_free_slots(
    day_sessions: &[DaySession],
    slots: &[String],
    rooms: &RoomRegistry,
    peak_hours: &BTreeSet<String>,
) -> Vec<FreeSlot> {
    let occupied: HashSet<(&str, &str)> = day_sessions
        .iter()
        .map(|s| (s.time.as_str(), s.room.as_str()))
        .collect();

    let peak: Vec<&String> = slots.iter().filter(|t| peak_hours.contains(*t)).collect();
    let candidates = if peak.is_empty() {
        slots
            .iter()
            .skip(slots.len().saturating_sub(FALLBACK_SLOT_COUNT))
            .collect()
    } else {
        peak
    };

    let mut out = Vec::new();
    for time in candidates {
        for room in rooms.rooms() {
            if !occupied.contains(&(time.as_str(), room.key.as_str())) {
                out.push(FreeSlot {
                    time: time.clone(),
                    room: room.key.clone(),
                });
            }
        }
    }
    out
}
