//! Error types for the identifier mapping crate.
//!
//! Per-record parse problems never show up here: they are absorbed by the
//! store that hit them and reported through
//! [`RefreshSummary::skipped`](crate::stores::RefreshSummary::skipped).
//! Everything in [`MappingError`] is a condition the caller must act on.

use std::fmt;

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, MappingError>;

/// Which backing store an error refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StoreKind {
    Tickers,
    Names,
    FilingTypes,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Tickers => "tickers",
            StoreKind::Names => "names",
            StoreKind::FilingTypes => "filing types",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while refreshing or reading the mapping stores.
#[derive(Error, Debug)]
pub enum MappingError {
    /// The upstream fetch failed. The store being refreshed keeps its
    /// previous contents.
    #[error("Transport error fetching {url}: {message}")]
    Transport {
        /// The URL that was being fetched
        url: String,
        /// Description of the failure
        message: String,
    },

    /// A read was attempted before any refresh of this store succeeded.
    /// Callers should refresh first; this is not the same as a missing key.
    #[error("The {0} store has not been initialized; run a refresh first")]
    UninitializedStore(StoreKind),

    /// The forms page did not have the expected layout.
    #[error("Invalid forms page: {0}")]
    InvalidPage(String),

    /// A store lock was poisoned by a panicking writer.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Reading or writing a persisted mapping file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted mapping file is not a flat JSON object of strings.
    #[error("Invalid mapping file: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MappingError {
    /// Builds a transport error for a failed fetch of `url`.
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// True when the caller should refresh before retrying the read.
    pub fn is_uninitialized(&self) -> bool {
        matches!(self, Self::UninitializedStore(_))
    }

    /// True for failures that came from talking to the upstream source.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Network(_))
    }
}
