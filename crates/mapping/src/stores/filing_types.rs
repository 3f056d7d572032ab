use std::sync::{Arc, RwLock};

use indexmap::IndexSet;

use super::store_model::{FilingType, RefreshSummary};
use crate::errors::{MappingError, Result, StoreKind};

/// Cell value the forms page uses for rows without a form number.
pub const NOT_APPLICABLE: &str = "n/a";

#[derive(Debug, Default)]
struct FilingTypeSet {
    codes: IndexSet<String>,
    version: u64,
}

/// Whitelist of valid filing-type codes.
///
/// Codes are kept upper-case in the order they first appeared on the source
/// page. Like the mapping stores, contents are swapped in whole on refresh.
#[derive(Debug, Default)]
pub struct FilingTypeRegistry {
    set: RwLock<Option<Arc<FilingTypeSet>>>,
}

impl FilingTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the registry with the given cell values.
    ///
    /// Values are trimmed; empty values and the `n/a` sentinel are dropped and
    /// counted as skipped. Duplicates collapse into one code.
    pub fn refresh<I, S>(&self, rows: I) -> Result<RefreshSummary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes = IndexSet::new();
        let mut skipped = 0;
        for row in rows {
            let value = row.as_ref().trim();
            if value.is_empty() || value.eq_ignore_ascii_case(NOT_APPLICABLE) {
                skipped += 1;
                continue;
            }
            codes.insert(value.to_uppercase());
        }

        let accepted = codes.len();
        let mut guard = self
            .set
            .write()
            .map_err(|e| MappingError::Cache(e.to_string()))?;
        let version = guard.as_ref().map_or(0, |s| s.version) + 1;
        *guard = Some(Arc::new(FilingTypeSet { codes, version }));
        drop(guard);

        log::info!(
            "Refreshed filing types: {} codes, {} rows dropped (version {})",
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

    /// Case-insensitive membership test. Unknown codes and an uninitialized
    /// registry both answer `false`.
    pub fn contains(&self, code: &str) -> bool {
        match self.current() {
            Ok(Some(set)) => set.codes.contains(FilingType::new(code).as_str()),
            _ => false,
        }
    }

    /// Canonical upper-case code if `code` is valid.
    pub fn get(&self, code: &str) -> Option<FilingType> {
        let candidate = FilingType::new(code);
        if self.contains(candidate.as_str()) {
            Some(candidate)
        } else {
            None
        }
    }

    /// All codes in source order.
    ///
    /// An empty-but-refreshed registry returns an empty list; a registry that
    /// was never refreshed is an [`MappingError::UninitializedStore`].
    pub fn list(&self) -> Result<Vec<FilingType>> {
        let set = self
            .current()?
            .ok_or(MappingError::UninitializedStore(StoreKind::FilingTypes))?;
        Ok(set.codes.iter().map(String::as_str).map(FilingType::new).collect())
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.current(), Ok(Some(_)))
    }

    pub fn version(&self) -> u64 {
        match self.current() {
            Ok(Some(set)) => set.version,
            _ => 0,
        }
    }

    fn current(&self) -> Result<Option<Arc<FilingTypeSet>>> {
        let guard = self
            .set
            .read()
            .map_err(|e| MappingError::Cache(e.to_string()))?;
        Ok(guard.clone())
    }
}
