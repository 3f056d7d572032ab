use std::time::Duration;

use edgar_mapping::feeds::{FeedUrls, DEFAULT_TIMEOUT};
use edgar_mapping::persistence::DEFAULT_DATA_DIR;
use edgar_mapping::{JoinStrategy, MappingFiles};

/// sec.gov asks automated clients to identify themselves.
const DEFAULT_USER_AGENT: &str = "edgar-mapping/0.1 (set MAPPING_USER_AGENT to your contact)";

/// Output shape of the log lines, from `MAPPING_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Anything other than `json` falls back to text.
    fn from_setting(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

pub struct Config {
    pub data_dir: String,
    pub feed_urls: FeedUrls,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub join_strategy: JoinStrategy,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = FeedUrls::default();
        let data_dir =
            std::env::var("MAPPING_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
        let feed_urls = FeedUrls {
            tickers: std::env::var("MAPPING_TICKER_URL").unwrap_or(defaults.tickers),
            names: std::env::var("MAPPING_NAME_URL").unwrap_or(defaults.names),
            forms: std::env::var("MAPPING_FORMS_URL").unwrap_or(defaults.forms),
        };
        let user_agent =
            std::env::var("MAPPING_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.into());
        let timeout_ms: u64 = std::env::var("MAPPING_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT.as_millis() as u64);
        let join_strategy = std::env::var("MAPPING_JOIN_STRATEGY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        let log_format =
            LogFormat::from_setting(std::env::var("MAPPING_LOG_FORMAT").ok().as_deref());
        Self {
            data_dir,
            feed_urls,
            user_agent,
            request_timeout: Duration::from_millis(timeout_ms),
            join_strategy,
            log_format,
        }
    }

    pub fn files(&self) -> MappingFiles {
        MappingFiles::new(&self.data_dir)
    }
}
