//! Timetable analytics.
//!
//! Aggregates a set of hydrated groups into day and week indicators,
//! categorical distributions and heuristic alerts.
//!
//! # Pipeline
//!
//! ```text
//! &[HydratedGroup] ──compute_stats──▶ Stats ──derive_alerts──▶ Vec<Alert>
//! ```
//!
//! Both steps are pure: the same groups and configuration always produce
//! the same output, including the order of every distribution.
//!
//! # Metrics
//!
//! `Stats` carries session counts, peak-hour load, collision cells and
//! seat sums for the focus day, the same totals for the week, and the
//! week distributions by day, room, hour, age, area and class.

mod aggregate;
mod alerts;
mod distribution;

pub use aggregate::{
    compute_stats, CollisionCell, DaySession, Distributions, Stats, NO_AGE_LABEL, NO_CLASS_LABEL,
};
pub use alerts::{derive_alerts, Alert};
pub use distribution::{compare_labels, percent, DistEntry, OccEntry, OccTally, Tally, BLANK_KEY};
