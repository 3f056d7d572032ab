//! Upstream sources: where the feeds live and how their bytes are obtained.

mod fetcher;
mod forms_page;

pub use fetcher::{FeedFetcher, HttpFeedFetcher, DEFAULT_TIMEOUT};
pub use forms_page::extract_filing_type_cells;

pub const TICKER_FEED_URL: &str = "https://www.sec.gov/include/ticker.txt";
pub const NAME_FEED_URL: &str = "https://www.sec.gov/Archives/edgar/cik-lookup-data.txt";
pub const FORMS_PAGE_URL: &str = "https://www.sec.gov/forms";

/// Locations of the three upstream sources.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeedUrls {
    pub tickers: String,
    pub names: String,
    pub forms: String,
}

impl Default for FeedUrls {
    fn default() -> Self {
        Self {
            tickers: TICKER_FEED_URL.to_string(),
            names: NAME_FEED_URL.to_string(),
            forms: FORMS_PAGE_URL.to_string(),
        }
    }
}
