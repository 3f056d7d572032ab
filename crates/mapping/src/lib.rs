//! EDGAR Identifier Mapping Crate
//!
//! Keeps a local, refreshable cross-reference between ticker symbols,
//! company names and SEC Central Index Keys (CIKs), plus the whitelist of
//! valid filing-type codes.
//!
//! # Overview
//!
//! Three upstream sources are mirrored into three stores:
//! - the ticker feed (`ticker<TAB>cik`) into a [`TickerMappingStore`]
//! - the company name feed (`NAME:CIK:`) into a [`NameMappingStore`]
//! - the forms listing page into a [`FilingTypeRegistry`]
//!
//! Each store is either uninitialized or holds the result of exactly one
//! successful refresh. Refreshes swap contents in whole, so readers never see
//! a half-built store, and a failed download never clears one.
//!
//! # Architecture
//!
//! ```text
//!   FeedFetcher ──► raw text ──► refresh ──► Store snapshot ──► MappingFiles
//!                                                │
//!                                                ▼
//!                 IdentifierResolver ◄── CrossReferenceJoiner
//! ```
//!
//! # Core Types
//!
//! - [`Cik`] - Normalized Central Index Key
//! - [`IdentifierResolver`] - Lookups, filing-type checks, cross-reference
//! - [`CrossReference`] - Ticker → company name correspondence
//! - [`MappingError`] - Typed failures (`UninitializedStore`, `Transport`, ...)

pub mod cik;
pub mod errors;
pub mod feeds;
pub mod join;
pub mod persistence;
pub mod resolver;
pub mod stores;

pub use cik::Cik;
pub use errors::{MappingError, Result, StoreKind};
pub use feeds::{extract_filing_type_cells, FeedFetcher, FeedUrls, HttpFeedFetcher};
pub use join::{CrossReference, CrossReferenceJoiner, IndexedJoiner, JoinStrategy, NestedScanJoiner};
pub use persistence::MappingFiles;
pub use resolver::IdentifierResolver;
pub use stores::{
    FilingType, FilingTypeRegistry, MappingSnapshot, NameMappingStore, RefreshSummary,
    TickerMappingStore,
};
