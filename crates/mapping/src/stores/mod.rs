//! Refreshable stores backing the resolver: ticker → CIK, name → CIK and the
//! filing-type whitelist.

mod feed_format;
mod filing_types;
mod mapping_store;
mod store_model;

pub use feed_format::{FeedFormat, NameFeed, TickerFeed};
pub use filing_types::{FilingTypeRegistry, NOT_APPLICABLE};
pub use mapping_store::{MappingStore, NameMappingStore, TickerMappingStore};
pub use store_model::{FilingType, MappingSnapshot, RefreshSummary};
pub(crate) use store_model::SnapshotEntry;
