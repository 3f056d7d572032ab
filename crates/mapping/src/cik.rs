//! Central Index Key newtype and its normalization rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Central Index Key assigned by the SEC to a registrant.
///
/// Upstream feeds carry CIKs as zero-padded (`"0000320193"`) or unpadded
/// (`"320193"`) decimal text. Both normalize to the same integer, and every
/// comparison across feeds happens on this normalized form.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cik(u64);

impl Cik {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// Normalizes raw feed text into a CIK.
    ///
    /// Surrounding whitespace is ignored. Returns `None` for anything that is
    /// not a non-negative decimal integer; callers skip such records.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        trimmed.parse::<u64>().ok().map(Self)
    }

    /// Ten-digit zero-padded form used in EDGAR archive paths.
    pub fn padded(self) -> String {
        format!("{:010}", self.0)
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Cik {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Error returned by [`Cik::from_str`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvalidCik(pub String);

impl fmt::Display for InvalidCik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid CIK: {:?}", self.0)
    }
}

impl std::error::Error for InvalidCik {}

impl FromStr for Cik {
    type Err = InvalidCik;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidCik(s.to_string()))
    }
}
