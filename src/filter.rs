//! Group filters and memoized statistics.
//!
//! The dashboard narrows the snapshot with a [`GroupFilter`] before
//! computing [`Stats`]. Recomputing stats is linear in sessions, so
//! [`StatsMemo`] caches the last result and recomputes only when the
//! derived cache key changes.

use std::collections::BTreeSet;

use crate::canon::fold;
use crate::models::HydratedGroup;
use crate::stats::{compare_labels, compute_stats, Stats};
use crate::timetable::Timetable;

/// Dashboard filter. Blank fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GroupFilter {
    /// Free text, matched as a folded substring of the group's search text.
    pub search: String,
    /// Exact class.
    pub clase: String,
    /// Exact age bracket.
    pub edad: String,
    /// Exact group ID.
    pub group_id: String,
}

impl GroupFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_clase(mut self, clase: impl Into<String>) -> Self {
        self.clase = clase.into();
        self
    }

    pub fn with_edad(mut self, edad: impl Into<String>) -> Self {
        self.edad = edad.into();
        self
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = group_id.into();
        self
    }

    /// Same filter with trimmed fields and folded search text.
    pub fn normalized(&self) -> Self {
        Self {
            search: fold(&self.search),
            clase: self.clase.trim().to_string(),
            edad: self.edad.trim().to_string(),
            group_id: self.group_id.trim().to_string(),
        }
    }

    /// Whether no field restricts the result.
    pub fn is_empty(&self) -> bool {
        let f = self.normalized();
        f.search.is_empty() && f.clase.is_empty() && f.edad.is_empty() && f.group_id.is_empty()
    }

    /// Whether `group` passes every non-blank field.
    pub fn matches(&self, group: &HydratedGroup) -> bool {
        self.normalized().matches_normalized(group)
    }

    fn matches_normalized(&self, group: &HydratedGroup) -> bool {
        let g = &group.group;
        if !self.group_id.is_empty() && g.id != self.group_id {
            return false;
        }
        if !self.clase.is_empty() && g.clase != self.clase {
            return false;
        }
        if !self.edad.is_empty() && g.edad != self.edad {
            return false;
        }
        self.search.is_empty() || group.search.contains(&self.search)
    }

    /// Groups passing the filter, in input order.
    pub fn apply(&self, groups: &[HydratedGroup]) -> Vec<HydratedGroup> {
        let f = self.normalized();
        groups
            .iter()
            .filter(|g| f.matches_normalized(g))
            .cloned()
            .collect()
    }
}

/// Choices offered by the class and age selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub clases: Vec<String>,
    pub edades: Vec<String>,
}

/// Distinct non-blank classes and age brackets, Spanish-collated.
pub fn filter_options(groups: &[HydratedGroup]) -> FilterOptions {
    let collect = |pick: fn(&HydratedGroup) -> &str| {
        let mut v: Vec<String> = groups
            .iter()
            .map(pick)
            .filter(|s| !s.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(String::from)
            .collect();
        v.sort_by(|a, b| compare_labels(a, b));
        v
    };
    FilterOptions {
        clases: collect(|g| g.group.clase.as_str()),
        edades: collect(|g| g.group.edad.as_str()),
    }
}

/// Single-entry cache keyed by a derived key.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    entry: Option<(K, V)>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, computing it on a key change.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        let hit = matches!(&self.entry, Some((k, _)) if *k == key);
        if !hit {
            self.entry = None;
        }
        let (_, value) = self.entry.get_or_insert_with(|| (key, compute()));
        value
    }

    /// Cached key, if any.
    pub fn key(&self) -> Option<&K> {
        self.entry.as_ref().map(|(k, _)| k)
    }

    /// Drops the cached value.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

/// Cache key for [`StatsMemo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsKey {
    pub day: String,
    pub filter: GroupFilter,
    /// Snapshot size.
    pub total: usize,
}

/// Memoized [`compute_stats`] over a filtered snapshot.
///
/// The key does not see edits that keep the snapshot size, so callers must
/// [`invalidate`](StatsMemo::invalidate) when a new snapshot arrives.
#[derive(Debug, Default)]
pub struct StatsMemo {
    memo: Memo<StatsKey, Stats>,
}

impl StatsMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stats for `groups` filtered by `filter` on `day`.
    pub fn get(
        &mut self,
        groups: &[HydratedGroup],
        filter: &GroupFilter,
        day: &str,
        tt: &Timetable,
    ) -> &Stats {
        let key = StatsKey {
            day: tt.canonicalizer().canon_day(day),
            filter: filter.normalized(),
            total: groups.len(),
        };
        self.memo.get_or_compute(key, || {
            let selected = filter.apply(groups);
            compute_stats(&selected, day, tt)
        })
    }

    pub fn invalidate(&mut self) {
        self.memo.invalidate();
    }
}
