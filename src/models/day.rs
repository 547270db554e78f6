//! Day-of-week registry.
//!
//! The academy works on a fixed, ordered week of seven localized labels.
//! The registry is injected wherever day order matters, so tests can run
//! against their own week without touching shared state.

use serde::{Deserialize, Serialize};

/// Default Spanish weekday labels, Monday first.
pub const DEFAULT_DAYS: [&str; 7] = [
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
    "Domingo",
];

/// Ordered list of canonical day labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayRegistry {
    labels: Vec<String>,
}

impl DayRegistry {
    /// Creates a registry from labels in calendar order.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Calendar-ordered labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Position of a canonical label in the week.
    pub fn index_of(&self, day: &str) -> Option<usize> {
        self.labels.iter().position(|d| d == day)
    }

    /// Whether `day` is a canonical member.
    pub fn contains(&self, day: &str) -> bool {
        self.index_of(day).is_some()
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the registry has no days.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates labels in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Default for DayRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_week_order() {
        let days = DayRegistry::default();
        assert_eq!(days.len(), 7);
        assert_eq!(days.index_of("Lunes"), Some(0));
        assert_eq!(days.index_of("Domingo"), Some(6));
        assert!(days.contains("Miércoles"));
        assert!(!days.contains("Miercoles"));
    }

    #[test]
    fn test_custom_week() {
        let days = DayRegistry::new(["Mon", "Tue"]);
        assert_eq!(days.iter().collect::<Vec<_>>(), vec!["Mon", "Tue"]);
        assert_eq!(days.index_of("Wed"), None);
    }
}
