//! Grouping accumulators shared by the aggregation queries
//!
//! A `Grouping` maps a grouping key to a per-group tally type, so each query
//! states exactly which secondary cardinalities it tracks.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, FixedOffset};

/// Grouping key → per-group accumulator
#[derive(Debug)]
pub(crate) struct Grouping<S> {
    groups: HashMap<String, S>,
}

impl<S> Grouping<S> {
    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }

    /// Accumulator for `key`, created with `init` on first sight
    pub fn entry_with(&mut self, key: &str, init: impl FnOnce() -> S) -> &mut S {
        self.groups.entry(key.to_string()).or_insert_with(init)
    }

    /// Convert every group into an output record
    pub fn into_records<T>(self, mut f: impl FnMut(String, S) -> T) -> Vec<T> {
        self.groups.into_iter().map(|(key, tally)| f(key, tally)).collect()
    }
}

impl<S: Default> Grouping<S> {
    pub fn entry(&mut self, key: &str) -> &mut S {
        self.entry_with(key, S::default)
    }
}

/// Set of distinct values
#[derive(Debug, Default)]
pub(crate) struct Distinct(HashSet<String>);

impl Distinct {
    pub fn insert(&mut self, value: &str) {
        if !self.0.contains(value) {
            self.0.insert(value.to_string());
        }
    }

    /// Insert unless `value` is empty
    pub fn insert_non_empty(&mut self, value: &str) {
        if !value.is_empty() {
            self.insert(value);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Sorted set of distinct values
#[derive(Debug, Default)]
pub(crate) struct DistinctSorted(BTreeSet<String>);

impl DistinctSorted {
    pub fn insert(&mut self, value: &str) {
        if !self.0.contains(value) {
            self.0.insert(value.to_string());
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}

/// Running maximum of event timestamps
#[derive(Debug, Clone, Copy)]
pub(crate) struct LastActivity(DateTime<FixedOffset>);

impl LastActivity {
    pub fn new(first: DateTime<FixedOffset>) -> Self {
        Self(first)
    }

    pub fn observe(&mut self, timestamp: DateTime<FixedOffset>) {
        if timestamp > self.0 {
            self.0 = timestamp;
        }
    }

    pub fn get(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// `count / total * 100`, or 0 when `total` is 0
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Sort by count descending (ties by key ascending) and keep at most `limit`
///
/// A `limit` of 0 keeps everything.
pub(crate) fn rank<T>(
    mut records: Vec<T>,
    count: impl Fn(&T) -> usize,
    key: impl Fn(&T) -> &str,
    limit: usize,
) -> Vec<T> {
    records.sort_by(|a, b| count(b).cmp(&count(a)).then_with(|| key(a).cmp(key(b))));
    if limit > 0 {
        records.truncate(limit);
    }
    records
}
