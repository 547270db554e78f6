//! Weekly class timetable core.
//!
//! Keeps an academy's weekly schedule consistent and measurable: loosely
//! typed day/time/room input is canonicalized, room double-booking is
//! rejected at save time, and day/week utilization is aggregated for the
//! dashboard.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Group`, `HydratedGroup`, `Session`,
//!   `RawSession`, `Room`, `RoomRegistry`, `DayRegistry`
//! - **`canon`**: Text folding and day/time/room canonicalization
//! - **`normalize`**: Raw session lists to canonical, sorted sessions
//! - **`occupancy`**: Global slot index and collision detection
//! - **`validation`**: Save-time checks (`validate_save`)
//! - **`tone`**: Area classification of groups
//! - **`stats`**: Day/week aggregates, distributions and alerts
//! - **`filter`**: Dashboard filters and memoized stats
//! - **`slots`**: Day grid rows and free-slot suggestions
//! - **`backup`**: JSON backup export and import
//! - **`config`**: TOML-loadable registries and thresholds
//! - **`timetable`**: Configured entry point over the pipeline
//!
//! # Architecture
//!
//! Everything is synchronous and pure over borrowed snapshots. Storage,
//! authentication and rendering belong to the caller; this crate only
//! decides what may be written and what the dashboard shows.
//!
//! # Logging
//!
//! Events are emitted through `tracing`. The crate never installs a
//! subscriber.

pub mod backup;
pub mod canon;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod normalize;
pub mod occupancy;
pub mod slots;
pub mod stats;
pub mod timetable;
pub mod tone;
pub mod validation;

pub use config::{AlertThresholds, TimetableConfig};
pub use error::{Error, Result};
pub use models::{Group, HydratedGroup, RawSession, Room, RoomRegistry, Session};
pub use timetable::Timetable;
pub use validation::{validate_save, SaveError, SaveErrorKind};
