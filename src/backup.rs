//! JSON backup documents.
//!
//! A backup holds the stored group records only. Derived (`__*`) fields
//! are dropped and rebuilt on hydration; other stored fields such as
//! `updatedAt` are carried through. Importing is an upsert keyed by group
//! ID, so records without an ID are skipped.
//!
//! # Format
//!
//! ```json
//! {
//!   "kind": "musicala.horarios.backup",
//!   "version": "u-timetable.v0.1.0",
//!   "exportedAt": "2026-01-31T12:00:00Z",
//!   "groups": [{ "id": "g1", "clase": "Piano", "sessions": [] }]
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::BackupError;
use crate::models::Group;

/// Document kind tag.
pub const BACKUP_KIND: &str = "musicala.horarios.backup";

/// Format version written on export.
pub const BACKUP_VERSION: &str = concat!("u-timetable.v", env!("CARGO_PKG_VERSION"));

/// A backup document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub kind: String,
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub groups: Vec<Group>,
}

impl Backup {
    /// Backup of `groups` stamped now.
    pub fn export(groups: &[Group]) -> Self {
        Self::export_at(groups, Utc::now())
    }

    /// Backup of `groups` stamped at `at`.
    pub fn export_at(groups: &[Group], at: DateTime<Utc>) -> Self {
        Self {
            kind: BACKUP_KIND.to_string(),
            version: BACKUP_VERSION.to_string(),
            exported_at: at,
            groups: groups.to_vec(),
        }
    }

    /// Suggested download name, e.g. `horarios_backup_2026-01-31.json`.
    pub fn file_name(&self) -> String {
        format!("horarios_backup_{}.json", self.exported_at.format("%Y-%m-%d"))
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, BackupError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a backup.
    ///
    /// Only the `groups` array is required. Missing `kind`, `version` or
    /// `exportedAt` fall back to defaults, and entries that are not group
    /// objects are skipped.
    pub fn from_json(text: &str) -> Result<Self, BackupError> {
        let mut doc: Value = serde_json::from_str(text)?;
        let Some(Value::Array(raw_groups)) = doc.get_mut("groups").map(Value::take) else {
            return Err(BackupError::MissingGroups);
        };

        let mut groups = Vec::with_capacity(raw_groups.len());
        for (i, raw) in raw_groups.into_iter().enumerate() {
            match serde_json::from_value::<Group>(raw) {
                Ok(g) => groups.push(g),
                Err(err) => warn!(index = i, %err, "skipping malformed backup group"),
            }
        }

        let text_field = |name: &str, fallback: &str| {
            doc.get(name)
                .and_then(Value::as_str)
                .unwrap_or(fallback)
                .to_string()
        };
        let exported_at = doc
            .get("exportedAt")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map_or(DateTime::<Utc>::default(), |d| d.with_timezone(&Utc));

        Ok(Self {
            kind: text_field("kind", BACKUP_KIND),
            version: text_field("version", ""),
            exported_at,
            groups,
        })
    }

    /// Groups to upsert: those with a non-blank ID, IDs trimmed.
    pub fn importable_groups(&self) -> Vec<Group> {
        let out: Vec<Group> = self
            .groups
            .iter()
            .filter(|g| g.has_id())
            .map(|g| Group {
                id: g.id.trim().to_string(),
                ..g.clone()
            })
            .collect();
        info!(
            total = self.groups.len(),
            importable = out.len(),
            "backup import"
        );
        out
    }
}
