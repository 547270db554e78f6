//! Save-time validation of a group.
//!
//! Runs before the persistence layer writes a group. Checks, in order:
//! 1. The group is identifiable (focus or class set)
//! 2. At least one session survives normalization
//! 3. No two candidate sessions share a slot ([`SaveError::SelfConflict`])
//! 4. No candidate session takes a slot held by another group
//!    ([`SaveError::OccupiedSlot`])
//!
//! Only the first failing check is reported, and for an occupied slot only
//! the first offending session. A rejected save has no side effects.
//!
//! # Concurrency
//! The index is rebuilt from whatever snapshot the caller holds. The check
//! is client-side and best-effort: two editors validating against the same
//! stale snapshot can both pass and both write the same slot. Preventing
//! that needs a unique constraint in the store, outside this crate.

use thiserror::Error;
use tracing::debug;

use crate::canon::Canonicalizer;
use crate::models::{Group, HydratedGroup, Session};
use crate::normalize::normalize_sessions;
use crate::occupancy::{
    find_first_collision, has_duplicate_inside_same_group, OccupancyIndex, Occupant,
};

/// Categories of save rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveErrorKind {
    /// Neither focus nor class is set.
    MissingIdentity,
    /// No valid session.
    NoSessions,
    /// Duplicate slot inside the candidate.
    SelfConflict,
    /// Slot already held by another group.
    OccupiedSlot,
}

/// Why a group cannot be saved.
///
/// Messages are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("Pon al menos Enfoque o Clase.")]
    MissingIdentity,

    #[error("Agrega al menos una sesión (día/hora/salón).")]
    NoSessions,

    #[error("Este grupo tiene dos sesiones iguales (mismo día/hora/salón).")]
    SelfConflict,

    #[error("Ocupado: {session} (ya lo usa: {})", .occupant.label)]
    OccupiedSlot { session: Session, occupant: Occupant },
}

impl SaveError {
    /// Category of this error.
    pub fn kind(&self) -> SaveErrorKind {
        match self {
            SaveError::MissingIdentity => SaveErrorKind::MissingIdentity,
            SaveError::NoSessions => SaveErrorKind::NoSessions,
            SaveError::SelfConflict => SaveErrorKind::SelfConflict,
            SaveError::OccupiedSlot { .. } => SaveErrorKind::OccupiedSlot,
        }
    }
}

/// Checks candidate sessions for self-conflicts and against an index.
///
/// This is steps 3 and 4 of the protocol for callers that already hold
/// canonical sessions and a built index.
pub fn check_sessions(candidates: &[Session], index: &OccupancyIndex) -> Result<(), SaveError> {
    if has_duplicate_inside_same_group(candidates) {
        return Err(SaveError::SelfConflict);
    }
    if let Some(hit) = find_first_collision(candidates, index) {
        return Err(SaveError::OccupiedSlot {
            session: hit.session,
            occupant: hit.occupant,
        });
    }
    Ok(())
}

/// Validates a draft against the known groups.
///
/// `known` is the latest snapshot of stored groups; the draft's own stored
/// version (same ID) is excluded from the occupancy index.
///
/// # Returns
/// The canonical, sorted session list to write.
pub fn validate_save(
    draft: &Group,
    known: &[HydratedGroup],
    canon: &Canonicalizer,
) -> Result<Vec<Session>, SaveError> {
    let result = run_checks(draft, known, canon);
    if let Err(err) = &result {
        debug!(group = %draft.id, kind = ?err.kind(), %err, "save rejected");
    }
    result
}

fn run_checks(
    draft: &Group,
    known: &[HydratedGroup],
    canon: &Canonicalizer,
) -> Result<Vec<Session>, SaveError> {
    if draft.enfoque.trim().is_empty() && draft.clase.trim().is_empty() {
        return Err(SaveError::MissingIdentity);
    }

    let normalized = normalize_sessions(canon, &draft.sessions);
    if normalized.accepted.is_empty() {
        return Err(SaveError::NoSessions);
    }

    let exclude = draft.has_id().then_some(draft.id.as_str());
    let index = OccupancyIndex::build(known, exclude);
    check_sessions(&normalized.accepted, &index)?;

    Ok(normalized.accepted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon() -> Canonicalizer {
        Canonicalizer::default()
    }

    fn known() -> Vec<HydratedGroup> {
        HydratedGroup::hydrate_all(
            &[
                Group::new("x")
                    .with_enfoque("Iniciación")
                    .with_clase("Piano")
                    .with_session("Lunes", "16:00", "Salón 1"),
                Group::new("w")
                    .with_clase("Guitarra")
                    .with_session("Miércoles", "17:00", "Salón 5"),
            ],
            &canon(),
        )
    }

    #[test]
    fn test_valid_new_group() {
        let draft = Group::new("")
            .with_clase("Violín")
            .with_session("martes", "9:5", "salon 4")
            .with_session("Lunes", "16:00", "Salón 2");

        let sessions = validate_save(&draft, &known(), &canon()).unwrap();
        assert_eq!(
            sessions,
            vec![
                Session::new("Lunes", "16:00", "Salón 2"),
                Session::new("Martes", "09:05", "Salón 4"),
            ]
        );
    }

    #[test]
    fn test_occupied_slot_reports_occupant() {
        let draft = Group::new("y")
            .with_clase("Ballet")
            .with_session("lunes", "16:00", "s1");

        let err = validate_save(&draft, &known(), &canon()).unwrap_err();
        assert_eq!(err.kind(), SaveErrorKind::OccupiedSlot);
        match err {
            SaveError::OccupiedSlot { session, occupant } => {
                assert_eq!(session, Session::new("Lunes", "16:00", "Salón 1"));
                assert_eq!(occupant.group_id, "x");
                assert_eq!(occupant.label, "Iniciación · Piano");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_occupied_slot_message() {
        let draft = Group::new("")
            .with_clase("Ballet")
            .with_session("Lunes", "16:00", "Salón 1");
        let err = validate_save(&draft, &known(), &canon()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Ocupado: Lunes 16:00 en Salón 1 (ya lo usa: Iniciación · Piano)"
        );
    }

    #[test]
    fn test_editing_excludes_own_sessions() {
        let draft = Group::new("x")
            .with_clase("Piano")
            .with_session("Lunes", "16:00", "Salón 1")
            .with_session("Lunes", "17:00", "Salón 1");

        assert!(validate_save(&draft, &known(), &canon()).is_ok());
    }

    #[test]
    fn test_self_conflict_checked_before_occupancy() {
        let draft = Group::new("")
            .with_clase("Ballet")
            .with_session("Lunes", "16:00", "Salón 1")
            .with_session("lunes", "16:00", "S1");

        let err = validate_save(&draft, &known(), &canon()).unwrap_err();
        assert_eq!(err, SaveError::SelfConflict);
    }

    #[test]
    fn test_missing_identity() {
        let draft = Group::new("").with_session("Lunes", "10:00", "Salón 1");
        assert_eq!(
            validate_save(&draft, &[], &canon()).unwrap_err(),
            SaveError::MissingIdentity
        );
    }

    #[test]
    fn test_no_valid_sessions() {
        let draft = Group::new("")
            .with_enfoque("Coro")
            .with_session("Funday", "10:00", "Salón 1")
            .with_session("Lunes", "xx", "Salón 1");
        assert_eq!(
            validate_save(&draft, &[], &canon()).unwrap_err(),
            SaveError::NoSessions
        );
    }

    #[test]
    fn test_check_sessions_directly() {
        let index = OccupancyIndex::build(&known(), None);
        assert!(check_sessions(&[Session::new("Domingo", "10:00", "Salón 1")], &index).is_ok());
        assert_eq!(
            check_sessions(&[Session::new("Miércoles", "17:00", "Salón 5")], &index)
                .unwrap_err()
                .kind(),
            SaveErrorKind::OccupiedSlot
        );
    }
}
