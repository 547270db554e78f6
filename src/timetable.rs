//! Configured entry point over the timetable pipeline.

use tracing::info;

use crate::backup::Backup;
use crate::canon::Canonicalizer;
use crate::config::TimetableConfig;
use crate::error::{BackupError, ConfigError};
use crate::models::{Group, HydratedGroup, Session};
use crate::slots::{build_day_grid, build_time_slots, suggest_free_slots, FreeSlot, GridRow};
use crate::stats::{compute_stats, derive_alerts, Alert, Stats};
use crate::validation::{validate_save, SaveError};

/// A validated configuration with its canonicalizer.
///
/// # Example
///
/// ```
/// use u_timetable::{Group, Timetable, TimetableConfig};
///
/// let tt = Timetable::new(TimetableConfig::default()).unwrap();
/// let known = tt.hydrate_all(&[Group::new("a")
///     .with_clase("Piano")
///     .with_session("Lunes", "16:00", "Salón 8")]);
///
/// let draft = Group::new("").with_clase("Violín").with_session("lunes", "16:00", "s8");
/// assert!(tt.validate_save(&draft, &known).is_err());
///
/// let stats = tt.stats(&known, "Lunes");
/// assert_eq!(stats.sessions_count, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Timetable {
    config: TimetableConfig,
    canon: Canonicalizer,
}

impl Timetable {
    /// Validates `config` and builds the alias tables.
    pub fn new(config: TimetableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let canon = config.canonicalizer();
        info!(
            days = config.days.len(),
            rooms = config.rooms.len(),
            peak_hours = config.peak_hours.len(),
            "timetable configured"
        );
        Ok(Self { config, canon })
    }

    pub fn config(&self) -> &TimetableConfig {
        &self.config
    }

    pub fn canonicalizer(&self) -> &Canonicalizer {
        &self.canon
    }

    /// Hydrates a snapshot of stored groups.
    pub fn hydrate_all(&self, groups: &[Group]) -> Vec<HydratedGroup> {
        HydratedGroup::hydrate_all(groups, &self.canon)
    }

    /// See [`validate_save`].
    pub fn validate_save(
        &self,
        draft: &Group,
        known: &[HydratedGroup],
    ) -> Result<Vec<Session>, SaveError> {
        validate_save(draft, known, &self.canon)
    }

    /// Day and week statistics for `groups`.
    pub fn stats(&self, groups: &[HydratedGroup], focus_day: &str) -> Stats {
        compute_stats(groups, focus_day, self)
    }

    /// Alerts for computed stats.
    pub fn alerts(&self, stats: &Stats) -> Vec<Alert> {
        derive_alerts(stats, &self.config.alerts)
    }

    /// Grid rows for the stats' focus day.
    pub fn time_slots(&self, stats: &Stats) -> Vec<String> {
        build_time_slots(&stats.day_sessions, &self.config.base_slots)
    }

    /// Day grid for the stats' focus day.
    pub fn day_grid(&self, stats: &Stats) -> Vec<GridRow> {
        build_day_grid(&stats.day_sessions, &self.time_slots(stats), &self.config.rooms)
    }

    /// Free cells on the stats' focus day.
    pub fn free_slots(&self, stats: &Stats) -> Vec<FreeSlot> {
        suggest_free_slots(
            &stats.day_sessions,
            &self.time_slots(stats),
            &self.config.rooms,
            &self.config.peak_hours,
        )
    }

    /// Serializes a backup of `groups` stamped now.
    pub fn export_backup(&self, groups: &[Group]) -> Result<String, BackupError> {
        Backup::export(groups).to_json()
    }

    /// Parses a backup and returns the groups to upsert.
    pub fn import_backup(&self, text: &str) -> Result<Vec<Group>, BackupError> {
        Ok(Backup::from_json(text)?.importable_groups())
    }
}
