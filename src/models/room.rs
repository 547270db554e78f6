//! Room model.
//!
//! Rooms are the exclusive resource of the timetable: one group per room
//! per day/time. Each room has a canonical key (the value stored in
//! sessions), a short code, a display label and a free-text note.

use serde::{Deserialize, Serialize};

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Canonical key stored in sessions (e.g., "Salón 4").
    pub key: String,
    /// Short code (e.g., "S4").
    #[serde(default)]
    pub short: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Free-text note (intended use, equipment).
    #[serde(default)]
    pub note: String,
}

impl Room {
    /// Creates a room whose label equals its key.
    pub fn new(key: impl Into<String>, short: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            short: short.into(),
            note: String::new(),
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Label to show, falling back to the key when the label is blank.
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

/// Ordered room registry.
///
/// An empty registry disables room membership checks during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomRegistry {
    rooms: Vec<Room>,
}

impl RoomRegistry {
    /// Creates a registry from rooms in display order.
    pub fn new(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }

    /// The academy's ten rooms.
    pub fn academy() -> Self {
        Self::new(vec![
            Room::new("Salón 1", "S1").with_note("Danzas/Teatro"),
            Room::new("Salón 2", "S2").with_note("Artes"),
            Room::new("Salón 3", "S3").with_note("Auditorio"),
            Room::new("Salón 4", "S4").with_note("Música (cuerdas)"),
            Room::new("Salón 5", "S5").with_note("Música (guitarra)"),
            Room::new("Salón 6", "S6").with_note("Artes"),
            Room::new("Salón 7", "S7").with_note("Chiquis/estimulación"),
            Room::new("Salón 8", "S8").with_note("Piano prioridad"),
            Room::new("Salón 9", "S9").with_note("Danzas/Teatro"),
            Room::new("Salón 10", "S10").with_note("Batería/ensamble"),
        ])
    }

    /// Rooms in registry order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Finds a room by canonical key.
    pub fn get(&self, key: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.key == key)
    }

    /// Whether `key` is a registered room key.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Display label for a key; unknown keys are returned as-is.
    pub fn label_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map(Room::display_label).unwrap_or(key)
    }

    /// Number of rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_builder() {
        let r = Room::new("Salón 3", "S3")
            .with_label("Auditorio")
            .with_note("Tarima");

        assert_eq!(r.key, "Salón 3");
        assert_eq!(r.short, "S3");
        assert_eq!(r.display_label(), "Auditorio");
        assert_eq!(r.note, "Tarima");
    }

    #[test]
    fn test_blank_label_falls_back_to_key() {
        let r = Room::new("Salón 3", "S3").with_label("  ");
        assert_eq!(r.display_label(), "Salón 3");
    }

    #[test]
    fn test_academy_registry() {
        let rooms = RoomRegistry::academy();
        assert_eq!(rooms.len(), 10);
        assert_eq!(rooms.rooms()[0].key, "Salón 1");
        assert_eq!(rooms.get("Salón 10").map(|r| r.short.as_str()), Some("S10"));
        assert!(!rooms.contains("Salón 11"));
    }

    #[test]
    fn test_label_for_unknown_key() {
        let rooms = RoomRegistry::new(vec![Room::new("A", "a").with_label("Room A")]);
        assert_eq!(rooms.label_for("A"), "Room A");
        assert_eq!(rooms.label_for("Z"), "Z");
    }
}
