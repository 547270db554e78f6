//! Group model.
//!
//! A group is a recurring class offering (class × age bracket × focus)
//! that owns its weekly sessions. [`Group`] is the record exactly as the
//! persistence layer stores it; [`HydratedGroup`] adds the fields derived
//! from it (canonical sessions, area, age key, search text).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::loose::{de_opt_flag, de_opt_seat_count, de_sessions, de_text};
use super::{RawSession, Session};
use crate::canon::{fold, Canonicalizer};
use crate::normalize::{normalize_sessions, RejectedSession};
use crate::tone::{classify, Tone};

/// A stored group record.
///
/// Reading is tolerant: null or numeric text fields become text, seat
/// counts are clamped, a missing or non-list `sessions` reads as empty, and
/// `cupoMax` wins over the legacy `cupo_max` when both are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "GroupRecord")]
pub struct Group {
    /// Document ID. Empty for groups not yet persisted.
    pub id: String,
    /// Class name (e.g., "Piano").
    pub clase: String,
    /// Age bracket (e.g., "Musikids").
    pub edad: String,
    /// Focus / program name.
    pub enfoque: String,
    /// Level.
    pub nivel: String,
    /// Teacher name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub docente: String,
    /// Free-text notes.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notas: String,
    /// Maximum seats.
    pub cupo_max: u32,
    /// Occupied seats.
    pub cupo_ocupado: u32,
    /// Whether the group is running.
    pub activo: bool,
    /// Weekly sessions as stored.
    pub sessions: Vec<RawSession>,
    /// Stored fields this crate does not model (e.g. `updatedAt`), written
    /// back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire shape of a stored group, before legacy keys are resolved.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupRecord {
    #[serde(default, deserialize_with = "de_text")]
    id: String,
    #[serde(default, deserialize_with = "de_text")]
    clase: String,
    #[serde(default, deserialize_with = "de_text")]
    edad: String,
    #[serde(default, deserialize_with = "de_text")]
    enfoque: String,
    #[serde(default, deserialize_with = "de_text")]
    nivel: String,
    #[serde(default, deserialize_with = "de_text")]
    docente: String,
    #[serde(default, deserialize_with = "de_text")]
    notas: String,
    #[serde(default, deserialize_with = "de_opt_seat_count")]
    cupo_max: Option<u32>,
    #[serde(default, rename = "cupo_max", deserialize_with = "de_opt_seat_count")]
    legacy_cupo_max: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_seat_count")]
    cupo_ocupado: Option<u32>,
    #[serde(default, rename = "cupo_ocupado", deserialize_with = "de_opt_seat_count")]
    legacy_cupo_ocupado: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_flag")]
    activo: Option<bool>,
    #[serde(default, deserialize_with = "de_sessions")]
    sessions: Vec<RawSession>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<GroupRecord> for Group {
    fn from(r: GroupRecord) -> Self {
        let mut extra = r.extra;
        // Derived fields from older exports.
        extra.retain(|k, _| !k.starts_with("__"));
        Self {
            id: r.id,
            clase: r.clase,
            edad: r.edad,
            enfoque: r.enfoque,
            nivel: r.nivel,
            docente: r.docente,
            notas: r.notas,
            cupo_max: r.cupo_max.or(r.legacy_cupo_max).unwrap_or(0),
            cupo_ocupado: r.cupo_ocupado.or(r.legacy_cupo_ocupado).unwrap_or(0),
            activo: r.activo.unwrap_or(true),
            sessions: r.sessions,
            extra,
        }
    }
}

impl Group {
    /// Creates an empty group with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            clase: String::new(),
            edad: String::new(),
            enfoque: String::new(),
            nivel: String::new(),
            docente: String::new(),
            notas: String::new(),
            cupo_max: 0,
            cupo_ocupado: 0,
            activo: true,
            sessions: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Sets the class name.
    pub fn with_clase(mut self, clase: impl Into<String>) -> Self {
        self.clase = clase.into();
        self
    }

    /// Sets the age bracket.
    pub fn with_edad(mut self, edad: impl Into<String>) -> Self {
        self.edad = edad.into();
        self
    }

    /// Sets the focus.
    pub fn with_enfoque(mut self, enfoque: impl Into<String>) -> Self {
        self.enfoque = enfoque.into();
        self
    }

    /// Sets the level.
    pub fn with_nivel(mut self, nivel: impl Into<String>) -> Self {
        self.nivel = nivel.into();
        self
    }

    /// Sets the teacher.
    pub fn with_docente(mut self, docente: impl Into<String>) -> Self {
        self.docente = docente.into();
        self
    }

    /// Sets seat capacity and occupancy.
    pub fn with_cupo(mut self, max: u32, ocupado: u32) -> Self {
        self.cupo_max = max;
        self.cupo_ocupado = ocupado;
        self
    }

    /// Sets the active flag.
    pub fn with_activo(mut self, activo: bool) -> Self {
        self.activo = activo;
        self
    }

    /// Adds a raw session.
    pub fn with_session(
        mut self,
        day: impl Into<String>,
        time: impl Into<String>,
        room: impl Into<String>,
    ) -> Self {
        self.sessions.push(RawSession::new(day, time, room));
        self
    }

    /// Human label: "enfoque · edad · clase", falling back to the ID.
    pub fn label(&self) -> String {
        let parts: Vec<&str> = [&self.enfoque, &self.edad, &self.clase]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if !parts.is_empty() {
            parts.join(" · ")
        } else if !self.id.trim().is_empty() {
            self.id.trim().to_string()
        } else {
            "Grupo".to_string()
        }
    }

    /// Whether the group has a persisted ID.
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }

    fn trimmed(&self) -> Self {
        Self {
            clase: self.clase.trim().to_string(),
            edad: self.edad.trim().to_string(),
            enfoque: self.enfoque.trim().to_string(),
            nivel: self.nivel.trim().to_string(),
            ..self.clone()
        }
    }
}

/// A group with its derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct HydratedGroup {
    /// The record, text fields trimmed.
    pub group: Group,
    /// Canonical sessions, sorted by day then time.
    pub sessions: Vec<Session>,
    /// Stored sessions that did not normalize.
    pub rejected: Vec<RejectedSession>,
    /// Area classification.
    pub tone: Tone,
    /// Age bracket key (trimmed `edad`, may be empty).
    pub age_key: String,
    /// Folded text used by search filters.
    pub search: String,
}

impl HydratedGroup {
    /// Derives canonical fields from a stored record.
    pub fn hydrate(group: &Group, canon: &Canonicalizer) -> Self {
        let group = group.trimmed();
        let normalized = normalize_sessions(canon, &group.sessions);
        let tone = classify(&group.clase, &group.enfoque);
        let age_key = group.edad.clone();

        let search = fold(
            &[
                &group.clase,
                &group.edad,
                &group.enfoque,
                &group.nivel,
                &group.docente,
                &group.notas,
            ]
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" "),
        );

        Self {
            group,
            sessions: normalized.accepted,
            rejected: normalized.rejected,
            tone,
            age_key,
            search,
        }
    }

    /// Hydrates a snapshot of records.
    pub fn hydrate_all(groups: &[Group], canon: &Canonicalizer) -> Vec<Self> {
        groups.iter().map(|g| Self::hydrate(g, canon)).collect()
    }

    /// Document ID.
    pub fn id(&self) -> &str {
        &self.group.id
    }

    /// Human label (see [`Group::label`]).
    pub fn label(&self) -> String {
        self.group.label()
    }

    /// Canonical sessions on `day`.
    pub fn sessions_on<'a>(&'a self, day: &'a str) -> impl Iterator<Item = &'a Session> + 'a {
        self.sessions.iter().filter(move |s| s.day == day)
    }
}
