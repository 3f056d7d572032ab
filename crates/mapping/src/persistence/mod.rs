//! Flat-file persistence for the stores.
//!
//! Layout under the data directory:
//!
//! - `tickers.json`: JSON object, lower-case ticker → CIK as decimal text
//! - `names.json`: JSON object, upper-case name → CIK as decimal text, in feed order
//! - `filetypes.txt`: one filing-type code per line
//!
//! Files carry no version or schema beyond "object of string → string". Each
//! save replaces the whole file.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::errors::Result;
use crate::stores::{FilingType, MappingSnapshot};

pub const TICKERS_FILE: &str = "tickers.json";
pub const NAMES_FILE: &str = "names.json";
pub const FILING_TYPES_FILE: &str = "filetypes.txt";

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "./mapping";

/// Raw key → CIK-text pairs read back from a mapping file, in file order.
pub type PersistedMapping = IndexMap<String, String>;

/// Paths of the persisted store files.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MappingFiles {
    dir: PathBuf,
}

impl MappingFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn tickers_path(&self) -> PathBuf {
        self.dir.join(TICKERS_FILE)
    }

    pub fn names_path(&self) -> PathBuf {
        self.dir.join(NAMES_FILE)
    }

    pub fn filing_types_path(&self) -> PathBuf {
        self.dir.join(FILING_TYPES_FILE)
    }

    pub fn save_tickers(&self, snapshot: &MappingSnapshot) -> Result<()> {
        write_mapping(&self.tickers_path(), snapshot)
    }

    pub fn save_names(&self, snapshot: &MappingSnapshot) -> Result<()> {
        write_mapping(&self.names_path(), snapshot)
    }

    pub fn save_filing_types(&self, codes: &[FilingType]) -> Result<()> {
        let mut body = String::new();
        for code in codes {
            body.push_str(code.as_str());
            body.push('\n');
        }
        replace_file(&self.filing_types_path(), body.as_bytes())
    }

    /// `Ok(None)` when no tickers file has been written yet.
    pub fn load_tickers(&self) -> Result<Option<PersistedMapping>> {
        read_mapping(&self.tickers_path())
    }

    pub fn load_names(&self) -> Result<Option<PersistedMapping>> {
        read_mapping(&self.names_path())
    }

    pub fn load_filing_types(&self) -> Result<Option<Vec<String>>> {
        let path = self.filing_types_path();
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        let codes = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Some(codes))
    }
}

impl Default for MappingFiles {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

fn write_mapping(path: &Path, snapshot: &MappingSnapshot) -> Result<()> {
    let object: PersistedMapping = snapshot
        .iter()
        .map(|(key, cik)| (key.to_string(), cik.to_string()))
        .collect();
    let json = serde_json::to_vec(&object)?;
    replace_file(path, &json)
}

fn read_mapping(path: &Path) -> Result<Option<PersistedMapping>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read(path)?;
    if raw.is_empty() {
        return Ok(Some(PersistedMapping::new()));
    }
    Ok(Some(serde_json::from_slice(&raw)?))
}

/// Writes next to the target and renames over it, so a crash mid-write
/// leaves the previous file in place.
fn replace_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
