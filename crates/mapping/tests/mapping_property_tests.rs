//! Property-based integration tests for the mapping stores and joiners.
//!
//! These tests check invariants that must hold for any feed content, using
//! the `proptest` crate for random test case generation.

use std::collections::BTreeMap;

use edgar_mapping::{
    Cik, CrossReferenceJoiner, IndexedJoiner, NameMappingStore, NestedScanJoiner,
    TickerMappingStore,
};
use proptest::prelude::*;

// =============================================================================
// Generators
// =============================================================================

/// Ticker → CIK pairs with unique, lower-case tickers.
fn arb_ticker_map(max: usize) -> impl Strategy<Value = BTreeMap<String, u64>> {
    proptest::collection::btree_map("[a-z]{1,4}(-[a-z])?", 0u64..10_000_000, 0..=max)
}

/// Name → CIK pairs in feed order. A narrow CIK range forces aliases.
fn arb_name_lines(max: usize) -> impl Strategy<Value = Vec<(String, u64)>> {
    proptest::collection::vec(("[A-Z][A-Z ]{0,12}[A-Z]", 0u64..40), 0..=max)
}

fn ticker_feed(tickers: &BTreeMap<String, u64>, pad: bool) -> String {
    tickers
        .iter()
        .map(|(ticker, cik)| {
            if pad {
                format!("{}\t{:010}\n", ticker, cik)
            } else {
                format!("{}\t{}\n", ticker, cik)
            }
        })
        .collect()
}

fn name_feed(names: &[(String, u64)]) -> String {
    names
        .iter()
        .map(|(name, cik)| format!("{}:{:010}:\n", name, cik))
        .collect()
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Refresh followed by lookup returns the exact CIK supplied, whatever the
    /// casing of the lookup key and whether the feed padded the CIK.
    #[test]
    fn prop_refresh_then_lookup_round_trips(
        tickers in arb_ticker_map(60),
        pad in any::<bool>(),
    ) {
        let store = TickerMappingStore::new();
        let summary = store.refresh(&ticker_feed(&tickers, pad)).unwrap();

        prop_assert_eq!(summary.accepted, tickers.len());
        prop_assert_eq!(summary.skipped, 0);
        for (ticker, cik) in &tickers {
            prop_assert_eq!(store.lookup(&ticker.to_uppercase()).unwrap(), Some(Cik::new(*cik)));
            prop_assert_eq!(store.lookup(ticker).unwrap(), Some(Cik::new(*cik)));
        }
    }

    /// A name line with exactly two colon-separated fields is never accepted.
    #[test]
    fn prop_two_field_name_lines_rejected(
        name in "[A-Z][A-Z ]{0,20}",
        cik in 0u64..10_000_000,
    ) {
        let store = NameMappingStore::new();
        let summary = store.refresh(&format!("{}:{}\n", name, cik)).unwrap();

        prop_assert_eq!(summary.accepted, 0);
        prop_assert_eq!(summary.skipped, 1);
        prop_assert_eq!(store.lookup(&name).unwrap(), None);
    }

    /// A later refresh replaces everything, even with a smaller payload.
    #[test]
    fn prop_refresh_fully_replaces(
        first in arb_ticker_map(40),
        second in arb_ticker_map(10),
    ) {
        let store = TickerMappingStore::new();
        store.refresh(&ticker_feed(&first, false)).unwrap();
        store.refresh(&ticker_feed(&second, true)).unwrap();

        let snapshot = store.snapshot().unwrap();
        prop_assert_eq!(snapshot.len(), second.len());
        for ticker in first.keys() {
            let expected = second.get(ticker).map(|cik| Cik::new(*cik));
            prop_assert_eq!(store.lookup(ticker).unwrap(), expected);
        }
    }

    /// The indexed joiner and the nested scan agree on every input.
    #[test]
    fn prop_indexed_join_matches_nested_scan(
        tickers in proptest::collection::btree_map("[a-z]{1,4}", 0u64..60, 0..=40),
        names in arb_name_lines(60),
    ) {
        let ticker_store = TickerMappingStore::new();
        ticker_store.refresh(&ticker_feed(&tickers, false)).unwrap();
        let name_store = NameMappingStore::new();
        name_store.refresh(&name_feed(&names)).unwrap();

        let ticker_snapshot = ticker_store.snapshot().unwrap();
        let name_snapshot = name_store.snapshot().unwrap();
        let indexed = IndexedJoiner::new().join(&ticker_snapshot, &name_snapshot);
        let nested = NestedScanJoiner::new().join(&ticker_snapshot, &name_snapshot);

        prop_assert_eq!(&indexed, &nested);

        // Every joined pair really shares a CIK, and the name is the first one
        // in the name store carrying it.
        for (ticker, name) in indexed.iter() {
            let cik = ticker_snapshot.get(&ticker.to_lowercase()).unwrap();
            let first = name_snapshot.records().find(|(_, c)| *c == cik).map(|(n, _)| n);
            prop_assert_eq!(first, Some(name));
        }
    }
}

#[test]
fn join_with_duplicate_cik_takes_first_name() {
    let tickers = TickerMappingStore::new();
    tickers.refresh("A\t50\n").unwrap();
    let names = NameMappingStore::new();
    names.refresh("ALPHA CORP:50:\nALPHA HOLDINGS:50:\n").unwrap();

    let xref = IndexedJoiner::new().join(&tickers.snapshot().unwrap(), &names.snapshot().unwrap());

    assert_eq!(xref.get("a"), Some("ALPHA CORP"));
}
