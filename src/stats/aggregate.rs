//! Day and week statistics over a set of groups.
//!
//! Computes timetable indicators from hydrated groups, usually the subset
//! currently selected by the dashboard filters.
//!
//! # Metrics
//!
//! | Metric | Scope | Definition |
//! |--------|-------|-----------|
//! | Sessions | day | Sessions on the focus day |
//! | Rooms used | day | Distinct rooms on the focus day |
//! | Peak sessions | day / week | Sessions starting at a peak hour |
//! | Collision cells | day | (time, room) cells holding 2+ sessions |
//! | Conflict extras | day | Σ (cell count − 1) over collision cells |
//! | Seat sums | day / week | Σ cupo over sessions of groups with cupoMax > 0 |
//! | Distributions | week | See [`super::distribution`] |
//!
//! Seat sums are accumulated per session, so a group meeting twice a week
//! contributes its seats twice to the week totals.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use super::distribution::{percent, DistEntry, OccEntry, OccTally, Tally};
use crate::canon::{sort_minutes, Canonicalizer};
use crate::models::{HydratedGroup, Session};
use crate::timetable::Timetable;
use crate::tone::Tone;

/// Fallback age bracket label.
pub const NO_AGE_LABEL: &str = "Sin edad";

/// Fallback class label.
pub const NO_CLASS_LABEL: &str = "Sin clase";

/// A session on the focus day, with its group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySession {
    pub group_id: String,
    pub group_label: String,
    pub time: String,
    pub room: String,
}

/// A (time, room) cell on the focus day held by more than one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionCell {
    pub time: String,
    pub room: String,
    /// Sessions in the cell.
    pub count: usize,
    /// Groups in the cell, in day-session order.
    pub group_ids: Vec<String>,
}

/// Week-scoped distributions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distributions {
    pub by_day: Vec<DistEntry>,
    pub by_room: Vec<DistEntry>,
    pub by_hour: Vec<DistEntry>,
    pub by_edad: Vec<DistEntry>,
    pub by_area: Vec<DistEntry>,
    pub by_clase: Vec<DistEntry>,
    pub occ_by_area: Vec<OccEntry>,
    pub occ_by_edad: Vec<OccEntry>,
}

/// Timetable statistics for one focus day plus the whole week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Canonical focus day.
    pub focus_day: String,
    /// Groups in the input set.
    pub groups_count: usize,
    pub sessions_count: usize,
    pub rooms_used_count: usize,
    pub peak_sessions: usize,
    pub collisions_cells: usize,
    pub conflicts_extras: usize,
    pub cupo_max_sum: u64,
    pub cupo_ocu_sum: u64,
    /// Focus-day sessions sorted by time.
    pub day_sessions: Vec<DaySession>,
    /// Collision cells sorted by time, then room.
    pub collision_detail: Vec<CollisionCell>,

    pub week_sessions_count: usize,
    pub week_peak_sessions: usize,
    pub week_cupo_max_sum: u64,
    pub week_cupo_ocu_sum: u64,

    /// Groups per area (not sessions), music first.
    pub groups_by_area: Vec<DistEntry>,
    pub dist: Distributions,
}

impl Stats {
    /// Focus-day seat occupancy ratio, `None` when no seats are declared.
    pub fn occupancy_ratio(&self) -> Option<f64> {
        (self.cupo_max_sum > 0).then(|| self.cupo_ocu_sum as f64 / self.cupo_max_sum as f64)
    }

    /// Focus-day seat occupancy as a rounded percentage.
    pub fn occupancy_pct(&self) -> u32 {
        percent(self.cupo_ocu_sum, self.cupo_max_sum)
    }

    /// Week seat occupancy as a rounded percentage.
    pub fn week_occupancy_pct(&self) -> u32 {
        percent(self.week_cupo_ocu_sum, self.week_cupo_max_sum)
    }
}

struct Flat<'a> {
    group: &'a HydratedGroup,
    session: &'a Session,
}

fn room_rank(canon: &Canonicalizer, room: &str) -> usize {
    canon
        .rooms()
        .rooms()
        .iter()
        .position(|r| r.key == room)
        .unwrap_or(usize::MAX)
}

fn compare_week(canon: &Canonicalizer, a: &Session, b: &Session) -> Ordering {
    canon
        .compare_sessions(a, b)
        .then_with(|| room_rank(canon, &a.room).cmp(&room_rank(canon, &b.room)))
        .then_with(|| a.room.cmp(&b.room))
}

fn seats(g: &HydratedGroup) -> Option<(u32, u32)> {
    let max = g.group.cupo_max;
    (max > 0).then_some((g.group.cupo_ocupado, max))
}

/// Computes day and week statistics.
///
/// `focus_day` is canonicalized first, so "miercoles" selects
/// "Miércoles". Only canonical sessions are counted; entries the
/// normalizer rejected never reach the aggregates. Day order, room labels
/// and peak hours all come from `tt`.
pub fn compute_stats(groups: &[HydratedGroup], focus_day: &str, tt: &Timetable) -> Stats {
    let canon = tt.canonicalizer();
    let config = tt.config();
    let day = canon.canon_day(focus_day);
    let day_ref = day.as_str();

    // Day scope.
    let mut day_flat: Vec<Flat<'_>> = groups
        .iter()
        .flat_map(|g| g.sessions_on(day_ref).map(move |s| Flat { group: g, session: s }))
        .collect();
    day_flat.sort_by_key(|f| sort_minutes(&f.session.time));

    let mut rooms_used = HashSet::new();
    let mut cells: BTreeMap<(u32, String, String), Vec<&str>> = BTreeMap::new();
    let mut peak_sessions = 0;
    let mut cupo_max_sum = 0u64;
    let mut cupo_ocu_sum = 0u64;

    for f in &day_flat {
        let s = f.session;
        rooms_used.insert(s.room.as_str());
        if config.is_peak(&s.time) {
            peak_sessions += 1;
        }
        cells
            .entry((sort_minutes(&s.time), s.time.clone(), s.room.clone()))
            .or_default()
            .push(f.group.id());
        if let Some((ocu, max)) = seats(f.group) {
            cupo_max_sum += u64::from(max);
            cupo_ocu_sum += u64::from(ocu);
        }
    }

    let collision_detail: Vec<CollisionCell> = cells
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|((_, time, room), ids)| CollisionCell {
            time,
            room,
            count: ids.len(),
            group_ids: ids.into_iter().map(String::from).collect(),
        })
        .collect();
    let conflicts_extras = collision_detail.iter().map(|c| c.count - 1).sum();

    // Week scope.
    let mut week_flat: Vec<Flat<'_>> = groups
        .iter()
        .flat_map(|g| g.sessions.iter().map(move |s| Flat { group: g, session: s }))
        .collect();
    week_flat.sort_by(|a, b| compare_week(canon, a.session, b.session));

    let mut by_day = Tally::default();
    let mut by_room = Tally::default();
    let mut by_hour = Tally::default();
    let mut by_edad = Tally::default();
    let mut by_area = Tally::default();
    let mut by_clase = Tally::default();
    let mut occ_by_area = OccTally::default();
    let mut occ_by_edad = OccTally::default();
    let mut week_peak_sessions = 0;
    let mut week_cupo_max_sum = 0u64;
    let mut week_cupo_ocu_sum = 0u64;

    for f in &week_flat {
        let (g, s) = (f.group, f.session);
        let area = g.tone.label();
        let edad = non_blank(&g.age_key, NO_AGE_LABEL);
        let clase = non_blank(&g.group.clase, NO_CLASS_LABEL);

        by_day.add(&s.day);
        by_room.add(canon.rooms().label_for(&s.room));
        by_hour.add(&s.time);
        by_edad.add(edad);
        by_area.add(area);
        by_clase.add(clase);

        if config.is_peak(&s.time) {
            week_peak_sessions += 1;
        }
        if let Some((ocu, max)) = seats(g) {
            week_cupo_max_sum += u64::from(max);
            week_cupo_ocu_sum += u64::from(ocu);
            occ_by_area.add(area, ocu, max);
            occ_by_edad.add(edad, ocu, max);
        }
    }

    let groups_by_area = Tone::ALL
        .iter()
        .map(|&tone| DistEntry {
            key: tone.key().to_string(),
            label: tone.label().to_string(),
            value: groups.iter().filter(|g| g.tone == tone).count(),
        })
        .collect();

    Stats {
        focus_day: day.clone(),
        groups_count: groups.len(),
        sessions_count: day_flat.len(),
        rooms_used_count: rooms_used.len(),
        peak_sessions,
        collisions_cells: collision_detail.len(),
        conflicts_extras,
        cupo_max_sum,
        cupo_ocu_sum,
        day_sessions: day_flat
            .iter()
            .map(|f| DaySession {
                group_id: f.group.id().to_string(),
                group_label: f.group.label(),
                time: f.session.time.clone(),
                room: f.session.room.clone(),
            })
            .collect(),
        collision_detail,
        week_sessions_count: week_flat.len(),
        week_peak_sessions,
        week_cupo_max_sum,
        week_cupo_ocu_sum,
        groups_by_area,
        dist: Distributions {
            by_day: by_day.into_calendar(canon.days()),
            by_room: by_room.into_sorted(),
            by_hour: by_hour.into_sorted(),
            by_edad: by_edad.into_sorted(),
            by_area: by_area.into_sorted(),
            by_clase: by_clase.into_sorted(),
            occ_by_area: occ_by_area.into_sorted(),
            occ_by_edad: occ_by_edad.into_sorted(),
        },
    }
}

fn non_blank<'a>(s: &'a str, fallback: &'a str) -> &'a str {
    if s.trim().is_empty() {
        fallback
    } else {
        s
    }
}
