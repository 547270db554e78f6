//! Timetable domain models.
//!
//! Provides the core data types for the weekly class timetable: the day
//! and room registries, sessions, and groups.
//!
//! # Domain Mappings
//!
//! | u-timetable | Academy | Scheduling theory |
//! |-------------|---------|-------------------|
//! | Group | Class offering | Task |
//! | Session | Weekly slot | Activity assignment |
//! | Room | Classroom | Resource (unit capacity) |
//! | DayRegistry | Teaching week | Calendar |

mod day;
mod group;
mod loose;
mod room;
mod session;

pub use day::{DayRegistry, DEFAULT_DAYS};
pub use group::{Group, HydratedGroup};
pub use room::{Room, RoomRegistry};
pub use session::{RawSession, Session, SessionKey};
