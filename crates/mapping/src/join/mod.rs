//! Ticker ↔ name reconciliation.
//!
//! The ticker and name feeds are published independently and only share the
//! CIK. Joining takes, for each ticker, the first name (in name-feed order)
//! carrying the same CIK:
//!
//! ```text
//!  tickers            names (insertion order)
//!  ┌──────┬─────┐     ┌────────────────┬─────┐
//!  │ a    │ 50  │ ──► │ ALPHA CORP     │ 50  │  ◄── first match wins
//!  │ b    │ 7   │     │ ALPHA HOLDINGS │ 50  │
//!  │ c    │ 99  │ ✗   │ OTHER          │ 7   │
//!  └──────┴─────┘     └────────────────┴─────┘
//! ```
//!
//! [`IndexedJoiner`] is the production algorithm; [`NestedScanJoiner`] is the
//! quadratic reference it is tested against.

mod indexed_joiner;
mod join_traits;
mod nested_scan_joiner;

use std::str::FromStr;

pub use indexed_joiner::IndexedJoiner;
pub use join_traits::{CrossReference, CrossReferenceJoiner};
pub use nested_scan_joiner::NestedScanJoiner;

/// Selects a [`CrossReferenceJoiner`] implementation by name.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum JoinStrategy {
    #[default]
    Indexed,
    NestedScan,
}

impl JoinStrategy {
    pub fn joiner(self) -> Box<dyn CrossReferenceJoiner> {
        match self {
            JoinStrategy::Indexed => Box::new(IndexedJoiner::new()),
            JoinStrategy::NestedScan => Box::new(NestedScanJoiner::new()),
        }
    }
}

impl FromStr for JoinStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "indexed" => Ok(JoinStrategy::Indexed),
            "nested" | "nested-scan" => Ok(JoinStrategy::NestedScan),
            other => Err(format!("Unknown join strategy: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("indexed".parse::<JoinStrategy>(), Ok(JoinStrategy::Indexed));
        assert_eq!("Nested-Scan".parse::<JoinStrategy>(), Ok(JoinStrategy::NestedScan));
        assert!("hash".parse::<JoinStrategy>().is_err());
    }

    #[test]
    fn test_strategy_builds_matching_joiner() {
        assert_eq!(JoinStrategy::Indexed.joiner().id(), "indexed");
        assert_eq!(JoinStrategy::NestedScan.joiner().id(), "nested-scan");
    }
}
