//! Categorical distributions and their ordering.
//!
//! # Sort Policy
//!
//! | Distribution | Order |
//! |--------------|-------|
//! | by day | calendar order, zero-filled |
//! | counts (room, hour, age, area, class) | value desc, then label asc |
//! | occupancy (area, age) | pct desc, then ocu desc, then label asc |
//!
//! Labels compare with Spanish collation: accents and case only break
//! ties between otherwise equal words, and "ñ" sorts between "n" and "o".

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::DayRegistry;

/// Label used when a category key is blank.
pub const BLANK_KEY: &str = "—";

/// One bar of a count distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistEntry {
    pub key: String,
    pub label: String,
    pub value: usize,
}

/// One bar of a seat-occupancy distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccEntry {
    pub key: String,
    pub label: String,
    /// Occupied seats.
    pub ocu: u64,
    /// Seat capacity.
    pub max: u64,
    /// `round(ocu / max * 100)`, 0 when `max` is 0.
    pub pct: u32,
}

/// Rounded percentage with a zero-denominator guard.
pub fn percent(ocu: u64, max: u64) -> u32 {
    if max == 0 {
        return 0;
    }
    ((ocu as f64 / max as f64) * 100.0).round() as u32
}

fn safe_key(key: &str, fallback: &str) -> String {
    let t = key.trim();
    if t.is_empty() {
        fallback.to_string()
    } else {
        t.to_string()
    }
}

/// Counts per category key.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    counts: HashMap<String, usize>,
}

impl Tally {
    /// Adds one to `key` (blank keys count under [`BLANK_KEY`]).
    pub fn add(&mut self, key: &str) {
        *self.counts.entry(safe_key(key, BLANK_KEY)).or_insert(0) += 1;
    }

    /// Count for a key.
    pub fn get(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Entries sorted by value desc, then label.
    pub fn into_sorted(self) -> Vec<DistEntry> {
        let mut out: Vec<DistEntry> = self
            .counts
            .into_iter()
            .map(|(k, v)| DistEntry {
                label: k.clone(),
                key: k,
                value: v,
            })
            .collect();
        out.sort_by(|a, b| {
            b.value
                .cmp(&a.value)
                .then_with(|| compare_labels(&a.label, &b.label))
        });
        out
    }

    /// One entry per day in calendar order, including empty days.
    pub fn into_calendar(self, days: &DayRegistry) -> Vec<DistEntry> {
        days.iter()
            .map(|d| DistEntry {
                key: d.to_string(),
                label: d.to_string(),
                value: self.get(d),
            })
            .collect()
    }
}

/// Seat sums per category key.
#[derive(Debug, Clone, Default)]
pub struct OccTally {
    sums: HashMap<String, (u64, u64)>,
}

impl OccTally {
    /// Adds occupied and maximum seats to `key`.
    pub fn add(&mut self, key: &str, ocu: u32, max: u32) {
        let e = self.sums.entry(safe_key(key, BLANK_KEY)).or_insert((0, 0));
        e.0 += u64::from(ocu);
        e.1 += u64::from(max);
    }

    /// Entries sorted by pct desc, ocu desc, then label.
    pub fn into_sorted(self) -> Vec<OccEntry> {
        let mut out: Vec<OccEntry> = self
            .sums
            .into_iter()
            .map(|(k, (ocu, max))| OccEntry {
                label: k.clone(),
                key: k,
                ocu,
                max,
                pct: percent(ocu, max),
            })
            .collect();
        out.sort_by(|a, b| {
            b.pct
                .cmp(&a.pct)
                .then_with(|| b.ocu.cmp(&a.ocu))
                .then_with(|| compare_labels(&a.label, &b.label))
        });
        out
    }
}

/// Primary weight of a character: base letter, "ñ" after "n".
fn primary(c: char) -> u32 {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'ç' => 'c',
        'ñ' => return u32::from('n') * 2 + 1,
        other => other,
    };
    u32::from(base) * 2
}

fn is_accented(c: char) -> bool {
    primary(c) != u32::from(c) * 2
}

/// Compares labels with Spanish collation.
///
/// Levels: base letters, then accents (unaccented first), then case
/// (lowercase first), then raw code points.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    let la: Vec<char> = a.chars().flat_map(char::to_lowercase).collect();
    let lb: Vec<char> = b.chars().flat_map(char::to_lowercase).collect();

    la.iter()
        .map(|&c| primary(c))
        .cmp(lb.iter().map(|&c| primary(c)))
        .then_with(|| {
            la.iter()
                .map(|&c| is_accented(c))
                .cmp(lb.iter().map(|&c| is_accented(c)))
        })
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(20, 30), 67);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(5, 0), 0);
        assert_eq!(percent(0, 0), 0);
    }

    #[test]
    fn test_compare_labels_spanish() {
        let mut v = vec!["Ñandú", "Oboe", "Niños", "árbol", "Arpa", "Música", "musica"];
        v.sort_by(|a, b| compare_labels(a, b));
        assert_eq!(
            v,
            vec!["árbol", "Arpa", "musica", "Música", "Niños", "Ñandú", "Oboe"]
        );
    }

    #[test]
    fn test_tally_sorted_by_count_then_label() {
        let mut t = Tally::default();
        for k in ["Salón 2", "Salón 1", "Salón 3", "Salón 3", "Salón 1"] {
            t.add(k);
        }
        let out = t.into_sorted();
        let keys: Vec<_> = out.iter().map(|e| (e.key.as_str(), e.value)).collect();
        assert_eq!(keys, vec![("Salón 1", 2), ("Salón 3", 2), ("Salón 2", 1)]);
    }

    #[test]
    fn test_tally_blank_key() {
        let mut t = Tally::default();
        t.add("  ");
        assert_eq!(t.get(BLANK_KEY), 1);
    }

    #[test]
    fn test_calendar_order_ignores_counts() {
        let mut t = Tally::default();
        for _ in 0..5 {
            t.add("Domingo");
        }
        t.add("Lunes");
        let out = t.into_calendar(&DayRegistry::default());
        let keys: Vec<_> = out.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado", "Domingo"]
        );
        assert_eq!(out[0].value, 1);
        assert_eq!(out[6].value, 5);
        assert_eq!(out[3].value, 0);
    }

    #[test]
    fn test_occ_tally_sort() {
        let mut t = OccTally::default();
        t.add("Danza", 18, 20);
        t.add("Danza", 2, 10);
        t.add("Música", 9, 10);
        t.add("Artes", 0, 0);
        let out = t.into_sorted();

        assert_eq!(out[0].key, "Música");
        assert_eq!(out[0].pct, 90);
        assert_eq!(
            out[1],
            OccEntry {
                key: "Danza".into(),
                label: "Danza".into(),
                ocu: 20,
                max: 30,
                pct: 67,
            }
        );
        assert_eq!(out[2].pct, 0);
    }
}
