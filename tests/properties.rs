use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;
use u_timetable::canon::{sort_minutes, Canonicalizer};
use u_timetable::models::{Group, HydratedGroup, RawSession, Session, DEFAULT_DAYS};
use u_timetable::normalize::{normalize_sessions, renormalize};
use u_timetable::occupancy::{
    find_first_collision, has_duplicate_inside_same_group, OccupancyIndex,
};
use u_timetable::stats::compute_stats;
use u_timetable::validation::{validate_save, SaveError};
use u_timetable::{Timetable, TimetableConfig};

/// (day index, hour, minute, room number 1..=10)
type Slot = (usize, u32, u32, usize);

fn slot() -> impl Strategy<Value = Slot> {
    (0usize..7, 8u32..22, 0u32..60, 1usize..=10)
}

/// Loose spelling of a valid slot: lowercase day, unpadded time, short room.
fn loose(s: &Slot) -> RawSession {
    let (d, h, m, r) = *s;
    RawSession::new(DEFAULT_DAYS[d].to_lowercase(), format!("{h}:{m}"), format!("s{r}"))
}

fn canonical(s: &Slot) -> Session {
    let (d, h, m, r) = *s;
    Session::new(DEFAULT_DAYS[d], format!("{h:02}:{m:02}"), format!("Salón {r}"))
}

fn group_with(id: &str, slots: &[Slot]) -> Group {
    let mut g = Group::new(id).with_clase("Piano");
    g.sessions = slots.iter().map(loose).collect();
    g
}

// ── Canonicalization is idempotent ────────────────────────────────────────

proptest! {
    #[test]
    fn canon_functions_idempotent(raw in "\\PC{0,12}") {
        let canon = Canonicalizer::default();

        let day = canon.canon_day(&raw);
        prop_assert_eq!(canon.canon_day(&day), day.clone());

        let room = canon.canon_room(&raw);
        prop_assert_eq!(canon.canon_room(&room), room.clone());

        let time = canon.canon_time(&raw);
        prop_assert_eq!(canon.canon_time(&time), time.clone());
    }

    #[test]
    fn canon_time_idempotent_on_time_like_input(h in 0u32..100, m in 0u32..100) {
        let canon = Canonicalizer::default();
        let once = canon.canon_time(&format!("{h}:{m}"));
        prop_assert_eq!(once.len(), 5);
        prop_assert_eq!(canon.canon_time(&once), once);
    }

    #[test]
    fn normalize_idempotent(slots in prop::collection::vec(slot(), 0..20)) {
        let canon = Canonicalizer::default();
        let raw: Vec<RawSession> = slots.iter().map(loose).collect();
        let first = normalize_sessions(&canon, &raw);
        prop_assert!(first.is_clean());

        let second = renormalize(&canon, &first.accepted);
        prop_assert!(second.is_clean());
        prop_assert_eq!(second.accepted, first.accepted);
    }
}

// ── Normalized output is always sorted ────────────────────────────────────

proptest! {
    #[test]
    fn normalize_output_sorted(
        slots in prop::collection::vec(slot(), 1..30).prop_shuffle()
    ) {
        let canon = Canonicalizer::default();
        let raw: Vec<RawSession> = slots.iter().map(loose).collect();
        let out = normalize_sessions(&canon, &raw).accepted;

        prop_assert_eq!(out.len(), slots.len());
        for w in out.windows(2) {
            let a = (canon.day_rank(&w[0].day), sort_minutes(&w[0].time));
            let b = (canon.day_rank(&w[1].day), sort_minutes(&w[1].time));
            prop_assert!(a <= b, "out of order: {} then {}", w[0], w[1]);
        }
    }
}

// ── Duplicate detection ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn duplicate_detection(
        distinct in prop::collection::btree_set(slot(), 1..15),
        pick in any::<prop::sample::Index>(),
        at in any::<prop::sample::Index>(),
    ) {
        let mut sessions: Vec<Session> = distinct.iter().map(canonical).collect();
        prop_assert!(!has_duplicate_inside_same_group(&sessions));

        let dup = sessions[pick.index(sessions.len())].clone();
        let pos = at.index(sessions.len() + 1);
        sessions.insert(pos, dup);
        prop_assert!(has_duplicate_inside_same_group(&sessions));
    }
}

// ── Occupancy index is the union of the other groups' keys ────────────────

proptest! {
    #[test]
    fn index_union_and_first_collision(
        groups in prop::collection::vec(prop::collection::vec(slot(), 0..6), 1..6),
        excluded in any::<prop::sample::Index>(),
        candidates in prop::collection::vec(slot(), 0..8),
    ) {
        let canon = Canonicalizer::default();
        let records: Vec<Group> = groups
            .iter()
            .enumerate()
            .map(|(i, slots)| group_with(&format!("g{i}"), slots))
            .collect();
        let hydrated = HydratedGroup::hydrate_all(&records, &canon);
        let exclude = format!("g{}", excluded.index(records.len()));

        let index = OccupancyIndex::build(&hydrated, Some(&exclude));

        let expected: HashSet<String> = hydrated
            .iter()
            .filter(|g| g.id() != exclude)
            .flat_map(|g| g.sessions.iter().map(|s| s.key().to_string()))
            .collect();
        let actual: HashSet<String> = index.keys().map(|k| k.to_string()).collect();
        prop_assert_eq!(&actual, &expected);

        let candidates: Vec<Session> = candidates.iter().map(canonical).collect();
        let first = candidates
            .iter()
            .find(|s| expected.contains(&s.key().to_string()));
        let hit = find_first_collision(&candidates, &index);
        prop_assert_eq!(hit.as_ref().map(|c| &c.session), first);
        if let Some(c) = hit {
            prop_assert_ne!(c.occupant.group_id, exclude);
        }
    }
}

// ── Distribution ordering ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn distributions_ordered(
        groups in prop::collection::vec(prop::collection::vec(slot(), 0..6), 0..8),
        focus in 0usize..7,
    ) {
        let tt = Timetable::new(TimetableConfig::default()).unwrap();
        let records: Vec<Group> = groups
            .iter()
            .enumerate()
            .map(|(i, slots)| {
                group_with(&format!("g{i}"), slots)
                    .with_clase(["Piano", "Ballet", "Teatro", "Pintura"][i % 4])
                    .with_edad(["Musikids", "Adultos", ""][i % 3])
            })
            .collect();
        let hydrated = tt.hydrate_all(&records);
        let st = compute_stats(&hydrated, DEFAULT_DAYS[focus], &tt);

        let days: Vec<&str> = st.dist.by_day.iter().map(|e| e.key.as_str()).collect();
        prop_assert_eq!(days, DEFAULT_DAYS.to_vec());
        let total: usize = st.dist.by_day.iter().map(|e| e.value).sum();
        prop_assert_eq!(total, st.week_sessions_count);

        for dist in [
            &st.dist.by_room,
            &st.dist.by_hour,
            &st.dist.by_edad,
            &st.dist.by_area,
            &st.dist.by_clase,
        ] {
            for w in dist.windows(2) {
                prop_assert!(w[0].value >= w[1].value);
            }
        }

        prop_assert!(st.conflicts_extras >= st.collisions_cells);
        prop_assert!(st.peak_sessions <= st.sessions_count);
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────

#[test]
fn scenario_occupied_slot_names_holder() {
    let canon = Canonicalizer::default();
    let known = HydratedGroup::hydrate_all(
        &[Group::new("x")
            .with_clase("Piano")
            .with_session("Lunes", "16:00", "Salón 1")],
        &canon,
    );
    let y = Group::new("y")
        .with_clase("Guitarra")
        .with_session("Lunes", "16:00", "Salón 1");

    match validate_save(&y, &known, &canon) {
        Err(SaveError::OccupiedSlot { session, occupant }) => {
            assert_eq!(session, Session::new("Lunes", "16:00", "Salón 1"));
            assert_eq!(occupant.group_id, "x");
        }
        other => panic!("expected OccupiedSlot, got {other:?}"),
    }
}

#[test]
fn scenario_loose_session_canonicalized() {
    let canon = Canonicalizer::default();
    let out = normalize_sessions(&canon, &[RawSession::new("Martes", "9:5", "salon 2")]);
    assert!(out.is_clean());
    assert_eq!(out.accepted, vec![Session::new("Martes", "09:05", "Salón 2")]);
}

#[test]
fn scenario_by_day_calendar_order() {
    let tt = Timetable::new(TimetableConfig::default()).unwrap();
    let groups = tt.hydrate_all(&[
        Group::new("a")
            .with_clase("Piano")
            .with_session("Lunes", "08:00", "Salón 1")
            .with_session("Lunes", "09:00", "Salón 1"),
        Group::new("b")
            .with_clase("Coro")
            .with_session("Lunes", "10:00", "Salón 3")
            .with_session("Viernes", "10:00", "Salón 3"),
    ]);
    let st = compute_stats(&groups, "Lunes", &tt);
    let by_day: Vec<(&str, usize)> = st
        .dist
        .by_day
        .iter()
        .map(|e| (e.key.as_str(), e.value))
        .collect();
    assert_eq!(
        by_day,
        vec![
            ("Lunes", 3),
            ("Martes", 0),
            ("Miércoles", 0),
            ("Jueves", 0),
            ("Viernes", 1),
            ("Sábado", 0),
            ("Domingo", 0),
        ]
    );
}

#[test]
fn scenario_dance_occupancy() {
    let tt = Timetable::new(TimetableConfig::default()).unwrap();
    let groups = tt.hydrate_all(&[
        Group::new("d1")
            .with_clase("Danza contemporánea")
            .with_cupo(20, 18)
            .with_session("Lunes", "16:00", "Salón 1"),
        Group::new("d2")
            .with_clase("Ballet")
            .with_cupo(10, 2)
            .with_session("Miércoles", "17:00", "Salón 9"),
    ]);
    let st = compute_stats(&groups, "Lunes", &tt);
    let danza = st
        .dist
        .occ_by_area
        .iter()
        .find(|e| e.key == "Danza")
        .expect("dance entry");
    assert_eq!((danza.ocu, danza.max, danza.pct), (20, 30, 67));
}

#[test]
fn distinct_slots_never_collide() {
    let slots: BTreeSet<Slot> = [(0, 16, 0, 1), (0, 16, 0, 2), (1, 16, 0, 1)].into();
    let sessions: Vec<Session> = slots.iter().map(canonical).collect();
    assert!(!has_duplicate_inside_same_group(&sessions));
}
