//! Timetable configuration.
//!
//! Everything environment-specific is injected through [`TimetableConfig`]:
//! the week, the room registry, peak hours, the base grid slots and the
//! alert thresholds. Nothing in the crate reads global constants, so tests
//! can build isolated configurations.
//!
//! # TOML Layout
//!
//! ```toml
//! days = ["Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado", "Domingo"]
//! peak_hours = ["16:00", "17:00"]
//! base_slots = ["08:00", "09:00"]
//!
//! [[rooms]]
//! key = "Salón 1"
//! short = "S1"
//! label = "Salón 1"
//! note = "Danzas/Teatro"
//!
//! [alerts]
//! peak_crowding = 10
//! ```
//!
//! Omitted sections take the academy defaults.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use crate::canon::{canon_time, Canonicalizer};
use crate::error::ConfigError;
use crate::models::{DayRegistry, RoomRegistry};

/// Alert thresholds for the analytics dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Peak-hour sessions on the focus day that count as crowded.
    pub peak_crowding: usize,
    /// Occupancy ratio at or above which capacity is nearly exhausted.
    pub high_ratio: f64,
    /// Occupancy ratio at or below which utilization is low.
    pub low_ratio: f64,
    /// Minimum day sessions before the low-utilization alert fires.
    pub low_min_sessions: usize,
    /// Share of groups in one area that counts as dominance.
    pub dominance_share: f64,
    /// Minimum groups before the dominance alert fires.
    pub dominance_min_groups: usize,
    /// Share at or below which an area counts as absent.
    pub absent_share: f64,
    /// Minimum groups before the absent-area alert fires.
    pub absent_min_groups: usize,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            peak_crowding: 10,
            high_ratio: 0.92,
            low_ratio: 0.25,
            low_min_sessions: 8,
            dominance_share: 0.55,
            dominance_min_groups: 8,
            absent_share: 0.08,
            absent_min_groups: 10,
        }
    }
}

/// Full timetable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableConfig {
    /// Week in calendar order.
    pub days: DayRegistry,
    /// Room registry.
    pub rooms: RoomRegistry,
    /// High-demand start times (`HH:MM`).
    pub peak_hours: BTreeSet<String>,
    /// Slots always shown on the day grid.
    pub base_slots: Vec<String>,
    /// Alert thresholds.
    pub alerts: AlertThresholds,
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            days: DayRegistry::default(),
            rooms: RoomRegistry::academy(),
            peak_hours: ["16:00", "17:00", "18:00", "19:00"]
                .into_iter()
                .map(String::from)
                .collect(),
            base_slots: (8..=19).map(|h| format!("{h:02}:00")).collect(),
            alerts: AlertThresholds::default(),
        }
    }
}

impl TimetableConfig {
    /// Parses a TOML document and validates it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks registry rules.
    ///
    /// - exactly 7 distinct, non-blank days
    /// - distinct, non-blank room keys
    /// - day labels and room keys without surrounding whitespace
    /// - peak hours and base slots already in canonical `HH:MM`
    /// - ratios within 0..=1
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.days.len() != 7 {
            return Err(ConfigError::Invalid(format!(
                "expected 7 days, got {}",
                self.days.len()
            )));
        }
        let mut seen = HashSet::new();
        for d in self.days.iter() {
            if d != d.trim() {
                return Err(ConfigError::Invalid(format!("day '{d}' has surrounding whitespace")));
            }
            if d.is_empty() || !seen.insert(d) {
                return Err(ConfigError::Invalid(format!("blank or repeated day '{d}'")));
            }
        }

        let mut keys = HashSet::new();
        for room in self.rooms.rooms() {
            if room.key != room.key.trim() {
                return Err(ConfigError::Invalid(format!(
                    "room key '{}' has surrounding whitespace",
                    room.key
                )));
            }
            if room.key.is_empty() || !keys.insert(room.key.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "blank or repeated room key '{}'",
                    room.key
                )));
            }
        }

        for t in self.peak_hours.iter().chain(&self.base_slots) {
            if canon_time(t) != *t {
                return Err(ConfigError::Invalid(format!("time '{t}' is not HH:MM")));
            }
        }

        let a = &self.alerts;
        for (name, ratio) in [
            ("high_ratio", a.high_ratio),
            ("low_ratio", a.low_ratio),
            ("dominance_share", a.dominance_share),
            ("absent_share", a.absent_share),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within 0..=1, got {ratio}"
                )));
            }
        }

        Ok(())
    }

    /// Builds a canonicalizer over this configuration's registries.
    pub fn canonicalizer(&self) -> Canonicalizer {
        Canonicalizer::new(self.days.clone(), self.rooms.clone())
    }

    /// Whether a canonical time is a peak hour.
    pub fn is_peak(&self, time: &str) -> bool {
        self.peak_hours.contains(time)
    }
}
