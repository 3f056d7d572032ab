use std::sync::{Arc, RwLock};

use crate::cik::Cik;
use crate::errors::{MappingError, Result};
use crate::feeds::{extract_filing_type_cells, FeedFetcher, FeedUrls};
use crate::join::{CrossReference, CrossReferenceJoiner, IndexedJoiner};
use crate::persistence::{MappingFiles, PersistedMapping};
use crate::stores::{
    FeedFormat, FilingType, FilingTypeRegistry, MappingStore, NameMappingStore, RefreshSummary,
    TickerMappingStore,
};

/// Join result tagged with the store versions it was computed from.
struct CachedCrossReference {
    ticker_version: u64,
    name_version: u64,
    xref: Arc<CrossReference>,
}

/// Entry point for callers: CIK lookups, filing-type validation and the
/// ticker ↔ name cross-reference.
///
/// Nothing is loaded implicitly. Build one with [`IdentifierResolver::new`]
/// (empty stores) or [`IdentifierResolver::open`] (stores restored from the
/// persisted files), then refresh explicitly.
///
/// # Example
///
/// ```ignore
/// let resolver = IdentifierResolver::open(MappingFiles::new("./mapping"))?;
/// let fetcher = HttpFeedFetcher::new("example-app admin@example.com")?;
/// resolver.update_tickers(&fetcher).await?;
///
/// match resolver.resolve_ticker("TSLA") {
///     Ok(Some(cik)) => println!("{}", cik),
///     Ok(None) => println!("unknown ticker"),
///     Err(e) if e.is_uninitialized() => println!("refresh first"),
///     Err(e) => return Err(e),
/// }
/// ```
pub struct IdentifierResolver {
    tickers: Arc<TickerMappingStore>,
    names: Arc<NameMappingStore>,
    filing_types: Arc<FilingTypeRegistry>,
    joiner: Box<dyn CrossReferenceJoiner>,
    urls: FeedUrls,
    files: Option<MappingFiles>,
    xref_cache: RwLock<Option<CachedCrossReference>>,
}

impl IdentifierResolver {
    /// Creates a resolver over fresh, uninitialized stores with no file layer.
    pub fn new() -> Self {
        Self::with_stores(
            Arc::new(TickerMappingStore::new()),
            Arc::new(NameMappingStore::new()),
            Arc::new(FilingTypeRegistry::new()),
        )
    }

    /// Creates a resolver over existing stores.
    pub fn with_stores(
        tickers: Arc<TickerMappingStore>,
        names: Arc<NameMappingStore>,
        filing_types: Arc<FilingTypeRegistry>,
    ) -> Self {
        Self {
            tickers,
            names,
            filing_types,
            joiner: Box::new(IndexedJoiner::new()),
            urls: FeedUrls::default(),
            files: None,
            xref_cache: RwLock::new(None),
        }
    }

    /// Creates a resolver backed by `files` and restores whatever was
    /// persisted there. Stores whose file is absent stay uninitialized.
    pub fn open(files: MappingFiles) -> Result<Self> {
        let resolver = Self::new().with_files(files);
        resolver.load_persisted()?;
        Ok(resolver)
    }

    /// Persists every subsequent refresh to `files`.
    pub fn with_files(mut self, files: MappingFiles) -> Self {
        self.files = Some(files);
        self
    }

    pub fn with_feed_urls(mut self, urls: FeedUrls) -> Self {
        self.urls = urls;
        self
    }

    /// Replaces the join algorithm used by [`cross_reference`](Self::cross_reference).
    pub fn with_joiner(mut self, joiner: Box<dyn CrossReferenceJoiner>) -> Self {
        self.joiner = joiner;
        self
    }

    pub fn tickers(&self) -> &TickerMappingStore {
        &self.tickers
    }

    pub fn names(&self) -> &NameMappingStore {
        &self.names
    }

    pub fn filing_types(&self) -> &FilingTypeRegistry {
        &self.filing_types
    }

    pub fn feed_urls(&self) -> &FeedUrls {
        &self.urls
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// CIK for a ticker, case-insensitively.
    pub fn resolve_ticker(&self, ticker: &str) -> Result<Option<Cik>> {
        self.tickers.lookup(ticker)
    }

    /// CIK for a company name, case-insensitively.
    pub fn resolve_name(&self, name: &str) -> Result<Option<Cik>> {
        self.names.lookup(name)
    }

    pub fn is_valid_filing_type(&self, code: &str) -> bool {
        self.filing_types.contains(code)
    }

    /// The canonical upper-case code when `code` is a valid filing type.
    pub fn filing_type(&self, code: &str) -> Option<FilingType> {
        self.filing_types.get(code)
    }

    pub fn list_filing_types(&self) -> Result<Vec<FilingType>> {
        self.filing_types.list()
    }

    /// Ticker → name correspondence over the current store contents.
    ///
    /// The result is cached until either store is refreshed again. Fails with
    /// [`MappingError::UninitializedStore`] if either store was never
    /// populated.
    pub fn cross_reference(&self) -> Result<Arc<CrossReference>> {
        let tickers = self.tickers.snapshot()?;
        let names = self.names.snapshot()?;

        {
            let cache = self
                .xref_cache
                .read()
                .map_err(|e| MappingError::Cache(e.to_string()))?;
            if let Some(cached) = cache.as_ref() {
                if cached.ticker_version == tickers.version()
                    && cached.name_version == names.version()
                {
                    return Ok(Arc::clone(&cached.xref));
                }
            }
        }

        let xref = Arc::new(self.joiner.join(&tickers, &names));
        log::info!(
            "Cross-referenced {} of {} tickers against {} names ({} joiner)",
            xref.len(),
            tickers.len(),
            names.len(),
            self.joiner.id()
        );

        let mut cache = self
            .xref_cache
            .write()
            .map_err(|e| MappingError::Cache(e.to_string()))?;
        *cache = Some(CachedCrossReference {
            ticker_version: tickers.version(),
            name_version: names.version(),
            xref: Arc::clone(&xref),
        });
        Ok(xref)
    }

    // ------------------------------------------------------------------
    // Refresh from already fetched content
    // ------------------------------------------------------------------

    /// Replaces the ticker store with `raw_text` and persists it.
    ///
    /// If writing the file fails the in-memory store has already been
    /// replaced; the error reports the stale file.
    pub fn refresh_tickers(&self, raw_text: &str) -> Result<RefreshSummary> {
        let summary = self.tickers.refresh(raw_text)?;
        if let Some(files) = &self.files {
            files.save_tickers(&*self.tickers.snapshot()?)?;
        }
        Ok(summary)
    }

    /// Replaces the name store with `raw_text` and persists it.
    pub fn refresh_names(&self, raw_text: &str) -> Result<RefreshSummary> {
        let summary = self.names.refresh(raw_text)?;
        if let Some(files) = &self.files {
            files.save_names(&*self.names.snapshot()?)?;
        }
        Ok(summary)
    }

    /// Replaces the filing-type registry with extracted cell values and
    /// persists it.
    pub fn refresh_filing_types<I, S>(&self, rows: I) -> Result<RefreshSummary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let summary = self.filing_types.refresh(rows)?;
        if let Some(files) = &self.files {
            files.save_filing_types(&self.filing_types.list()?)?;
        }
        Ok(summary)
    }

    // ------------------------------------------------------------------
    // Fetch + refresh
    // ------------------------------------------------------------------

    /// Downloads the ticker feed and refreshes from it. A failed download
    /// leaves the store and its file untouched.
    pub async fn update_tickers(&self, fetcher: &dyn FeedFetcher) -> Result<RefreshSummary> {
        let text = self.fetch(fetcher, &self.urls.tickers).await?;
        self.refresh_tickers(&text)
    }

    pub async fn update_names(&self, fetcher: &dyn FeedFetcher) -> Result<RefreshSummary> {
        let text = self.fetch(fetcher, &self.urls.names).await?;
        self.refresh_names(&text)
    }

    pub async fn update_filing_types(&self, fetcher: &dyn FeedFetcher) -> Result<RefreshSummary> {
        let html = self.fetch(fetcher, &self.urls.forms).await?;
        let cells = extract_filing_type_cells(&html)?;
        self.refresh_filing_types(cells)
    }

    async fn fetch(&self, fetcher: &dyn FeedFetcher, url: &str) -> Result<String> {
        fetcher.fetch_text(url).await.map_err(|e| {
            log::warn!("Refresh aborted, keeping previous contents: {}", e);
            e
        })
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Restores stores from the attached files.
    ///
    /// Missing files are not an error. An unreadable file is logged and its
    /// store is left as it was.
    pub fn load_persisted(&self) -> Result<()> {
        let Some(files) = &self.files else {
            return Ok(());
        };

        restore_mapping(&self.tickers, files.load_tickers())?;
        restore_mapping(&self.names, files.load_names())?;

        match files.load_filing_types() {
            Ok(Some(codes)) => {
                self.filing_types.refresh(codes)?;
            }
            Ok(None) => {}
            Err(e) => log::warn!("Ignoring unreadable filing types file: {}", e),
        }
        Ok(())
    }
}

impl Default for IdentifierResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn restore_mapping<F: FeedFormat>(
    store: &MappingStore<F>,
    loaded: Result<Option<PersistedMapping>>,
) -> Result<()> {
    match loaded {
        Ok(Some(entries)) => {
            store.load_entries(entries)?;
        }
        Ok(None) => log::debug!("No persisted {} file; store stays uninitialized", F::KIND),
        Err(e) => log::warn!("Ignoring unreadable {} file: {}", F::KIND, e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use async_trait::async_trait;
    use tempfile::tempdir;

    use super::*;
    use crate::errors::StoreKind;
    use crate::join::NestedScanJoiner;

    /// Serves canned bodies; URLs without a body fail like a dead network.
    struct StubFetcher {
        bodies: HashMap<String, String>,
    }

    impl StubFetcher {
        fn new(bodies: &[(&str, &str)]) -> Self {
            Self {
                bodies: bodies
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
            }
        }

        fn offline() -> Self {
            Self::new(&[])
        }
    }

    #[async_trait]
    impl FeedFetcher for StubFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String> {
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| MappingError::transport(url, "connection refused"))
        }
    }

    fn populated() -> IdentifierResolver {
        let resolver = IdentifierResolver::new();
        resolver
            .refresh_tickers("ABC\t320193\nXYZ\t1018724\n")
            .unwrap();
        resolver
            .refresh_names("APPLE INC:320193:\nTESLA INC:1018724:\n")
            .unwrap();
        resolver
    }

    #[test]
    fn test_uninitialized_lookups_are_typed() {
        let resolver = IdentifierResolver::new();

        assert!(matches!(
            resolver.resolve_ticker("abc"),
            Err(MappingError::UninitializedStore(StoreKind::Tickers))
        ));
        assert!(matches!(
            resolver.resolve_name("APPLE INC"),
            Err(MappingError::UninitializedStore(StoreKind::Names))
        ));
        assert!(matches!(
            resolver.list_filing_types(),
            Err(MappingError::UninitializedStore(StoreKind::FilingTypes))
        ));
        assert!(!resolver.is_valid_filing_type("10-K"));
    }

    #[test]
    fn test_resolve_after_refresh() {
        let resolver = populated();

        assert_eq!(resolver.resolve_ticker("abc").unwrap(), Some(Cik::new(320193)));
        assert_eq!(resolver.resolve_ticker("nope").unwrap(), None);
        assert_eq!(
            resolver.resolve_name("tesla inc").unwrap(),
            Some(Cik::new(1018724))
        );
    }

    #[test]
    fn test_cross_reference_example() {
        let resolver = populated();
        let xref = resolver.cross_reference().unwrap();

        let pairs: Vec<_> = xref.iter().collect();
        assert_eq!(pairs, vec![("ABC", "APPLE INC"), ("XYZ", "TESLA INC")]);
        assert_eq!(xref.get("ABC"), Some("APPLE INC"));
        assert_eq!(xref.get("abc"), Some("APPLE INC"));
        assert_eq!(
            serde_json::to_string(&*xref).unwrap(),
            r#"{"ABC":"APPLE INC","XYZ":"TESLA INC"}"#
        );
    }

    #[test]
    fn test_cross_reference_requires_both_stores() {
        let resolver = IdentifierResolver::new();
        resolver.refresh_tickers("abc\t1\n").unwrap();

        assert!(matches!(
            resolver.cross_reference(),
            Err(MappingError::UninitializedStore(StoreKind::Names))
        ));
    }

    #[test]
    fn test_cross_reference_cache_invalidated_by_refresh() {
        let resolver = populated();
        let first = resolver.cross_reference().unwrap();
        let again = resolver.cross_reference().unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        resolver.refresh_names("SOMEONE ELSE:320193:\n").unwrap();
        let refreshed = resolver.cross_reference().unwrap();

        assert!(!Arc::ptr_eq(&first, &refreshed));
        assert_eq!(refreshed.get("abc"), Some("SOMEONE ELSE"));
        assert_eq!(refreshed.get("xyz"), None);
    }

    #[test]
    fn test_nested_scan_joiner_is_interchangeable() {
        let resolver = populated().with_joiner(Box::new(NestedScanJoiner::new()));
        let xref = resolver.cross_reference().unwrap();
        assert_eq!(xref.get("xyz"), Some("TESLA INC"));
    }

    #[test]
    fn test_filing_types_validation() {
        let resolver = IdentifierResolver::new();
        resolver.refresh_filing_types(["10-K", "n/a", "8-K"]).unwrap();

        assert!(resolver.is_valid_filing_type("10-k"));
        assert!(!resolver.is_valid_filing_type("99-Z"));
        assert_eq!(resolver.filing_type("8-k"), Some(FilingType::new("8-K")));
        assert_eq!(resolver.list_filing_types().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_filing_type_refresh_lists_nothing() {
        let resolver = IdentifierResolver::new();
        resolver.refresh_filing_types(Vec::<&str>::new()).unwrap();
        assert!(resolver.list_filing_types().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_from_fetcher() {
        let resolver = IdentifierResolver::new();
        let urls = resolver.feed_urls().clone();
        let fetcher = StubFetcher::new(&[
            (urls.tickers.as_str(), "tsla\t1318605\n"),
            (urls.names.as_str(), "TESLA, INC.:0001318605:\n"),
            (
                urls.forms.as_str(),
                "<table><tbody><tr><td>Form Number: 10-K</td></tr></tbody></table>",
            ),
        ]);

        let summary = resolver.update_tickers(&fetcher).await.unwrap();
        assert_eq!(summary.accepted, 1);
        resolver.update_names(&fetcher).await.unwrap();
        resolver.update_filing_types(&fetcher).await.unwrap();

        assert_eq!(resolver.resolve_ticker("TSLA").unwrap(), Some(Cik::new(1318605)));
        assert_eq!(resolver.cross_reference().unwrap().get("tsla"), Some("TESLA, INC."));
        assert!(resolver.is_valid_filing_type("10-k"));
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_contents() {
        let dir = tempdir().unwrap();
        let resolver = IdentifierResolver::new().with_files(MappingFiles::new(dir.path()));
        resolver.refresh_tickers("aapl\t320193\n").unwrap();
        let file_before = fs::read_to_string(dir.path().join("tickers.json")).unwrap();

        let err = resolver
            .update_tickers(&StubFetcher::offline())
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert_eq!(resolver.resolve_ticker("aapl").unwrap(), Some(Cik::new(320193)));
        assert_eq!(resolver.tickers().version(), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("tickers.json")).unwrap(),
            file_before
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_on_fresh_store_stays_uninitialized() {
        let resolver = IdentifierResolver::new();
        assert!(resolver
            .update_filing_types(&StubFetcher::offline())
            .await
            .is_err());
        assert!(resolver.list_filing_types().unwrap_err().is_uninitialized());
    }

    #[test]
    fn test_open_restores_persisted_stores() {
        let dir = tempdir().unwrap();
        {
            let writer = IdentifierResolver::open(MappingFiles::new(dir.path())).unwrap();
            writer.refresh_tickers("ABC\t320193\n").unwrap();
            writer.refresh_names("APPLE INC:0000320193:\n").unwrap();
            writer.refresh_filing_types(["10-K"]).unwrap();
        }

        let reader = IdentifierResolver::open(MappingFiles::new(dir.path())).unwrap();
        assert_eq!(reader.resolve_ticker("abc").unwrap(), Some(Cik::new(320193)));
        assert_eq!(reader.resolve_name("Apple Inc").unwrap(), Some(Cik::new(320193)));
        assert!(reader.is_valid_filing_type("10-k"));
        assert_eq!(reader.cross_reference().unwrap().get("abc"), Some("APPLE INC"));
    }

    #[test]
    fn test_open_with_missing_or_corrupt_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("names.json"), "not json").unwrap();

        let resolver = IdentifierResolver::open(MappingFiles::new(dir.path())).unwrap();

        assert!(!resolver.tickers().is_initialized());
        assert!(!resolver.names().is_initialized());
        assert!(!resolver.filing_types().is_initialized());
    }
}
