//! Global room occupancy index and collision detection.
//!
//! The timetable invariant is that no two groups hold the same room at the
//! same day and time. Before a group is written, its candidate sessions
//! are checked twice:
//! - against each other ([`has_duplicate_inside_same_group`]),
//! - against every other known group ([`OccupancyIndex`] +
//!   [`find_first_collision`]).
//!
//! # Complexity
//! Building the index is O(total sessions); each lookup is O(1) average.
//!
//! # First Writer Wins
//! When several stored groups already share a slot, the index keeps the
//! first one in input order. The index answers "is this slot taken, and by
//! whom (one example)", not "list every occupant".

use std::collections::{HashMap, HashSet};
use tracing::trace;

use crate::models::{HydratedGroup, Session, SessionKey};

/// The group holding a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    /// Occupying group ID.
    pub group_id: String,
    /// Human label of the occupying group.
    pub label: String,
}

/// A candidate session that hits an occupied slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// The offending candidate session.
    pub session: Session,
    /// Who already holds the slot.
    pub occupant: Occupant,
}

/// Map from slot key to its (first) occupant.
#[derive(Debug, Clone, Default)]
pub struct OccupancyIndex {
    slots: HashMap<SessionKey, Occupant>,
}

impl OccupancyIndex {
    /// Indexes the canonical sessions of `groups`, skipping `exclude_id`.
    ///
    /// `exclude_id` is the group being edited, so its stored sessions do
    /// not count against its own new version.
    pub fn build(groups: &[HydratedGroup], exclude_id: Option<&str>) -> Self {
        let exclude_id = exclude_id.map(str::trim).filter(|id| !id.is_empty());
        let mut slots = HashMap::new();

        for g in groups {
            if exclude_id.is_some_and(|id| id == g.id()) {
                continue;
            }
            let label = g.label();
            for s in &g.sessions {
                slots.entry(s.key()).or_insert_with(|| Occupant {
                    group_id: g.id().to_string(),
                    label: label.clone(),
                });
            }
        }

        trace!(
            groups = groups.len(),
            slots = slots.len(),
            excluded = exclude_id.unwrap_or(""),
            "occupancy index built"
        );
        Self { slots }
    }

    /// Occupant of a slot.
    pub fn get(&self, key: &SessionKey) -> Option<&Occupant> {
        self.slots.get(key)
    }

    /// Occupant of the slot `session` would take.
    pub fn occupant_of(&self, session: &Session) -> Option<&Occupant> {
        self.get(&session.key())
    }

    /// Whether a slot is taken.
    pub fn contains(&self, key: &SessionKey) -> bool {
        self.slots.contains_key(key)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Occupied slot keys (unordered).
    pub fn keys(&self) -> impl Iterator<Item = &SessionKey> {
        self.slots.keys()
    }
}

/// Whether two candidate sessions share the same slot.
///
/// Stops at the first repeated key.
pub fn has_duplicate_inside_same_group(candidates: &[Session]) -> bool {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates.iter().any(|s| !seen.insert(s.key()))
}

/// First candidate (in the given order) whose slot is already occupied.
///
/// Pass candidates in canonical order so the reported session is
/// deterministic.
pub fn find_first_collision(candidates: &[Session], index: &OccupancyIndex) -> Option<Collision> {
    candidates.iter().find_map(|s| {
        index.occupant_of(s).map(|occupant| Collision {
            session: s.clone(),
            occupant: occupant.clone(),
        })
    })
}
