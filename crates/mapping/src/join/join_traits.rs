use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

use crate::stores::{FeedFormat, MappingSnapshot, TickerFeed};

/// Ticker → company name correspondence, in ticker-store order.
///
/// Tickers and names are reported as the feeds spelled them; [`get`](Self::get)
/// matches tickers case-insensitively. Serializes as a flat JSON object.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CrossReference(IndexMap<String, (String, String)>);

impl CrossReference {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    pub(crate) fn insert(&mut self, ticker: &str, name: &str) {
        self.0.insert(
            TickerFeed::normalize_key(ticker),
            (ticker.to_string(), name.to_string()),
        );
    }

    pub fn get(&self, ticker: &str) -> Option<&str> {
        self.0
            .get(&TickerFeed::normalize_key(ticker))
            .map(|(_, name)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.values().map(|(t, n)| (t.as_str(), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: AsRef<str>, N: AsRef<str>> FromIterator<(T, N)> for CrossReference {
    fn from_iter<I: IntoIterator<Item = (T, N)>>(iter: I) -> Self {
        let mut xref = Self::new();
        for (ticker, name) in iter {
            xref.insert(ticker.as_ref(), name.as_ref());
        }
        xref
    }
}

impl Serialize for CrossReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Reconciles the ticker and name stores on their shared CIK.
///
/// Every implementation must produce the same result: for each ticker, the
/// first name in name-store insertion order whose CIK equals the ticker's CIK.
/// Tickers without a matching name are left out. Joining never fails; empty
/// inputs give an empty result.
pub trait CrossReferenceJoiner: Send + Sync {
    /// Short identifier used in logs.
    fn id(&self) -> &'static str;

    fn join(&self, tickers: &MappingSnapshot, names: &MappingSnapshot) -> CrossReference;
}
