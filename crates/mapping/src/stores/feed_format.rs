//! Record layouts of the two upstream identifier feeds.

use crate::errors::StoreKind;

/// Describes how one upstream feed splits into `(key, cik)` records and how
/// its keys are normalized.
///
/// The same normalization is applied when a store is populated and when it
/// is queried, so lookups are insensitive to the caller's casing.
pub trait FeedFormat: Send + Sync + 'static {
    /// The store this format populates, used in errors and logs.
    const KIND: StoreKind;

    /// Splits one record into its raw key and raw CIK text.
    ///
    /// Returns `None` when the record does not have the shape the feed
    /// requires; such records are skipped and counted, never fatal.
    fn split_record(record: &str) -> Option<(&str, &str)>;

    /// Canonical form of a lookup key.
    fn normalize_key(key: &str) -> String;
}

/// `https://www.sec.gov/include/ticker.txt`: `ticker<TAB>cik`, one per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickerFeed;

impl FeedFormat for TickerFeed {
    const KIND: StoreKind = StoreKind::Tickers;

    fn split_record(record: &str) -> Option<(&str, &str)> {
        let mut fields = record.split('\t');
        let ticker = fields.next()?;
        let cik = fields.next()?;
        Some((ticker, cik))
    }

    fn normalize_key(key: &str) -> String {
        key.trim().to_lowercase()
    }
}

/// `https://www.sec.gov/Archives/edgar/cik-lookup-data.txt`: `NAME:CIK:`.
///
/// Only records with more than two colon-separated fields are accepted. The
/// trailing colon of a well-formed line yields the third field, so this
/// filters headers and truncated lines. The CIK is always the second field.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameFeed;

impl FeedFormat for NameFeed {
    const KIND: StoreKind = StoreKind::Names;

    fn split_record(record: &str) -> Option<(&str, &str)> {
        let fields: Vec<&str> = record.split(':').collect();
        if fields.len() > 2 {
            Some((fields[0], fields[1]))
        } else {
            None
        }
    }

    fn normalize_key(key: &str) -> String {
        key.trim().to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_record_split() {
        assert_eq!(TickerFeed::split_record("aapl\t320193"), Some(("aapl", "320193")));
        assert_eq!(TickerFeed::split_record("aapl"), None);
    }

    #[test]
    fn test_ticker_extra_columns_use_first_two() {
        assert_eq!(
            TickerFeed::split_record("brk-a\t1067983\textra"),
            Some(("brk-a", "1067983"))
        );
    }

    #[test]
    fn test_name_record_requires_more_than_two_fields() {
        assert_eq!(
            NameFeed::split_record("APPLE INC:0000320193:"),
            Some(("APPLE INC", "0000320193"))
        );
        assert_eq!(NameFeed::split_record("APPLE INC:0000320193"), None);
        assert_eq!(NameFeed::split_record("APPLE INC"), None);
    }

    #[test]
    fn test_key_normalization() {
        assert_eq!(TickerFeed::normalize_key("TSLA"), "tsla");
        assert_eq!(NameFeed::normalize_key("1-800-jackpot inc"), "1-800-JACKPOT INC");
    }
}
