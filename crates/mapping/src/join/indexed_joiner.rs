use std::collections::HashMap;

use super::join_traits::{CrossReference, CrossReferenceJoiner};
use crate::cik::Cik;
use crate::stores::MappingSnapshot;

/// Joins through a CIK → first-name index. O(tickers + names).
///
/// This is the default joiner.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexedJoiner;

impl IndexedJoiner {
    pub fn new() -> Self {
        Self
    }

    fn first_name_index(names: &MappingSnapshot) -> HashMap<Cik, &str> {
        let mut index = HashMap::with_capacity(names.len());
        for (name, cik) in names.records() {
            // Later aliases of the same CIK must not displace the first one.
            index.entry(cik).or_insert(name);
        }
        index
    }
}

impl CrossReferenceJoiner for IndexedJoiner {
    fn id(&self) -> &'static str {
        "indexed"
    }

    fn join(&self, tickers: &MappingSnapshot, names: &MappingSnapshot) -> CrossReference {
        let index = Self::first_name_index(names);
        let mut result = CrossReference::with_capacity(tickers.len().min(index.len()));
        for (ticker, cik) in tickers.records() {
            if let Some(name) = index.get(&cik) {
                result.insert(ticker, name);
            }
        }
        result
    }
}
