use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;

use super::feed_format::{FeedFormat, NameFeed, TickerFeed};
use super::store_model::{MappingSnapshot, RefreshSummary, SnapshotEntry};
use crate::cik::Cik;
use crate::errors::{MappingError, Result};

/// Ticker → CIK store populated from the tab-delimited ticker feed.
pub type TickerMappingStore = MappingStore<TickerFeed>;

/// Company name → CIK store populated from the colon-delimited name feed.
pub type NameMappingStore = MappingStore<NameFeed>;

/// A key → CIK store that is replaced wholesale on every refresh.
///
/// The store is either uninitialized or holds the contents of exactly one
/// successful refresh. New contents are built off to the side and published
/// with a single pointer swap under a short write lock, so concurrent readers
/// see either the old snapshot or the new one, never a mix.
pub struct MappingStore<F: FeedFormat> {
    snapshot: RwLock<Option<Arc<MappingSnapshot>>>,
    _format: PhantomData<fn() -> F>,
}

impl<F: FeedFormat> MappingStore<F> {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(None),
            _format: PhantomData,
        }
    }

    /// Replaces the store contents with the records parsed from `raw_text`.
    ///
    /// Records with the wrong shape or a non-integer CIK are skipped and
    /// counted. Blank lines are ignored.
    pub fn refresh(&self, raw_text: &str) -> Result<RefreshSummary> {
        let mut entries = IndexMap::new();
        let mut skipped = 0;

        for record in raw_text.split('\n') {
            let record = record.trim_end_matches('\r');
            if record.trim().is_empty() {
                continue;
            }
            match F::split_record(record) {
                Some((key, cik_text)) => {
                    if !Self::insert_normalized(&mut entries, key, cik_text) {
                        skipped += 1;
                    }
                }
                None => {
                    log::debug!("Skipping malformed {} record: {:?}", F::KIND, record);
                    skipped += 1;
                }
            }
        }

        self.publish(entries, skipped)
    }

    /// Installs already split `(key, cik)` pairs, e.g. read back from disk.
    ///
    /// Keys and CIKs go through the same normalization as a feed refresh.
    pub fn load_entries<I, K, V>(&self, entries: I) -> Result<RefreshSummary>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut normalized = IndexMap::new();
        let mut skipped = 0;
        for (key, cik_text) in entries {
            if !Self::insert_normalized(&mut normalized, key.as_ref(), cik_text.as_ref()) {
                skipped += 1;
            }
        }
        self.publish(normalized, skipped)
    }

    /// Looks up a key after normalizing it the way the feed was normalized.
    ///
    /// Returns `Ok(None)` for a key the initialized store does not hold, and
    /// [`MappingError::UninitializedStore`] if no refresh has succeeded yet.
    pub fn lookup(&self, key: &str) -> Result<Option<Cik>> {
        let snapshot = self.snapshot()?;
        Ok(snapshot.get(&F::normalize_key(key)))
    }

    /// The current contents.
    pub fn snapshot(&self) -> Result<Arc<MappingSnapshot>> {
        self.current()?
            .ok_or(MappingError::UninitializedStore(F::KIND))
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.current(), Ok(Some(_)))
    }

    /// Number of successful refreshes so far; 0 while uninitialized.
    pub fn version(&self) -> u64 {
        match self.current() {
            Ok(Some(snapshot)) => snapshot.version(),
            _ => 0,
        }
    }

    fn current(&self) -> Result<Option<Arc<MappingSnapshot>>> {
        let guard = self
            .snapshot
            .read()
            .map_err(|e| MappingError::Cache(e.to_string()))?;
        Ok(guard.clone())
    }

    /// A record with a bad CIK is dropped on its own; an earlier valid record
    /// under the same key stays in place.
    fn insert_normalized(
        entries: &mut IndexMap<String, SnapshotEntry>,
        key: &str,
        cik_text: &str,
    ) -> bool {
        let lookup_key = F::normalize_key(key);
        if lookup_key.is_empty() {
            log::debug!("Skipping {} record with empty key", F::KIND);
            return false;
        }
        match Cik::parse(cik_text) {
            Some(cik) => {
                let entry = SnapshotEntry {
                    key: key.trim().to_string(),
                    cik,
                };
                entries.insert(lookup_key, entry);
                true
            }
            None => {
                log::debug!(
                    "Skipping {} record {:?}: CIK {:?} is not an integer",
                    F::KIND,
                    lookup_key,
                    cik_text
                );
                false
            }
        }
    }

    fn publish(
        &self,
        entries: IndexMap<String, SnapshotEntry>,
        skipped: usize,
    ) -> Result<RefreshSummary> {
        let accepted = entries.len();
        let mut guard = self
            .snapshot
            .write()
            .map_err(|e| MappingError::Cache(e.to_string()))?;
        let version = guard.as_ref().map_or(0, |s| s.version()) + 1;
        *guard = Some(Arc::new(MappingSnapshot::new(entries, version)));
        drop(guard);

        log::info!(
            "Refreshed {} store: {} accepted, {} skipped (version {})",
            F::KIND,
            accepted,
            skipped,
            version
        );

        Ok(RefreshSummary {
            accepted,
            skipped,
            version,
        })
    }
}

impl<F: FeedFormat> Default for MappingStore<F> {
    fn default() -> Self {
        Self::new()
    }
}
