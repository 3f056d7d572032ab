use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cik::Cik;

/// Outcome of a successful refresh.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    /// Records that made it into the new contents.
    pub accepted: usize,
    /// Records dropped for a bad shape or a non-integer CIK.
    pub skipped: usize,
    /// Store version installed by this refresh.
    pub version: u64,
}

/// One accepted feed record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SnapshotEntry {
    /// Key as spelled in the feed, trimmed.
    pub(crate) key: String,
    pub(crate) cik: Cik,
}

/// Immutable contents of a mapping store, published by one refresh.
///
/// Entries are indexed by normalized lookup key and keep the order in which
/// keys first appeared in the feed. A key that repeats later keeps its
/// original position and takes the later spelling and CIK.
#[derive(Clone, Debug, Default)]
pub struct MappingSnapshot {
    entries: IndexMap<String, SnapshotEntry>,
    version: u64,
}

impl MappingSnapshot {
    pub(crate) fn new(entries: IndexMap<String, SnapshotEntry>, version: u64) -> Self {
        Self { entries, version }
    }

    pub fn get(&self, normalized_key: &str) -> Option<Cik> {
        self.entries.get(normalized_key).map(|entry| entry.cik)
    }

    /// `(lookup key, cik)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Cik)> + '_ {
        self.entries
            .iter()
            .map(|(lookup_key, entry)| (lookup_key.as_str(), entry.cik))
    }

    /// `(key as published by the feed, cik)` in insertion order.
    pub fn records(&self) -> impl Iterator<Item = (&str, Cik)> + '_ {
        self.entries
            .values()
            .map(|entry| (entry.key.as_str(), entry.cik))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

/// A valid filing-type code, always upper-case (e.g. `10-K`).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilingType(String);

impl FilingType {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FilingType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
