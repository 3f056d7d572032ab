use super::join_traits::{CrossReference, CrossReferenceJoiner};
use crate::stores::MappingSnapshot;

/// Scans every name for every ticker. O(tickers × names).
///
/// Kept as the reference for [`IndexedJoiner`](super::IndexedJoiner): both
/// must agree on every input. Fine for an occasional offline reconciliation,
/// too slow for anything on a request path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedScanJoiner;

impl NestedScanJoiner {
    pub fn new() -> Self {
        Self
    }
}

impl CrossReferenceJoiner for NestedScanJoiner {
    fn id(&self) -> &'static str {
        "nested-scan"
    }

    fn join(&self, tickers: &MappingSnapshot, names: &MappingSnapshot) -> CrossReference {
        let mut result = CrossReference::new();
        for (ticker, ticker_cik) in tickers.records() {
            let first_match = names.records().find(|(_, name_cik)| *name_cik == ticker_cik);
            if let Some((name, _)) = first_match {
                result.insert(ticker, name);
            }
        }
        result
    }
}
