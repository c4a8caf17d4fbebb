//! Exchange snapshot sources
//!
//! The allocator never reads storage itself. A `SnapshotSource` hands it an
//! owned, request-scoped copy of every venue; balances consumed by one plan
//! are never visible to the next.

mod format;

use crate::core::Venue;
use std::path::{Path, PathBuf};
use thiserror::Error;

use format::ExchangeFile;

/// Snapshot loading errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid snapshot for {venue}: {reason}")]
    Invalid { venue: String, reason: String },
}

/// Provider of venue snapshots
///
/// Every `load` returns fresh values the caller owns.
pub trait SnapshotSource: Send + Sync {
    /// Load every venue, in a stable order
    fn load(&self) -> Result<Vec<Venue>, SnapshotError>;

    /// Human-readable origin (for logs)
    fn describe(&self) -> String;
}

/// Reads one `*.json` document per exchange from a directory
///
/// Files are loaded in file-name order so venue order (and therefore
/// tie-breaking between equal prices) is deterministic.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    directory: PathBuf,
}

impl DirectorySource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn snapshot_files(&self) -> Result<Vec<PathBuf>, SnapshotError> {
        let io_err = |source| SnapshotError::Io {
            path: self.directory.clone(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.directory).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_json && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Parse a single exchange document
pub fn load_file(path: &Path) -> Result<Venue, SnapshotError> {
    let contents = std::fs::read(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: ExchangeFile =
        serde_json::from_slice(&contents).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    file.into_venue()
}

impl SnapshotSource for DirectorySource {
    fn load(&self) -> Result<Vec<Venue>, SnapshotError> {
        if !self.directory.is_dir() {
            return Err(SnapshotError::DirectoryNotFound(self.directory.clone()));
        }

        let venues = self
            .snapshot_files()?
            .iter()
            .map(|path| load_file(path))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            target: "snapshot",
            directory = %self.directory.display(),
            venues = venues.len(),
            "Loaded exchange snapshots"
        );
        Ok(venues)
    }

    fn describe(&self) -> String {
        format!("directory {}", self.directory.display())
    }
}

/// Fixed in-memory venues, cloned on every load
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    venues: Vec<Venue>,
}

impl StaticSource {
    pub fn new(venues: Vec<Venue>) -> Self {
        Self { venues }
    }
}

impl SnapshotSource for StaticSource {
    fn load(&self) -> Result<Vec<Venue>, SnapshotError> {
        Ok(self.venues.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory venues", self.venues.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedPoint8;
    use crate::test_utils::{ask, venue};
    use std::fs;

    const EXCHANGE_A: &str = r#"{
        "Id": "exchange-a",
        "AvailableFunds": { "Crypto": 1, "Euro": 50000 },
        "OrderBook": { "Bids": [], "Asks": [{ "Order": { "Id": "a1", "Type": "Sell", "Kind": "Limit", "Amount": 1, "Price": 50000 } }] }
    }"#;

    const EXCHANGE_B: &str = r#"{
        "Id": "exchange-b",
        "AvailableFunds": { "Crypto": 2, "Euro": 0 },
        "OrderBook": { "Bids": [{ "Order": { "Id": "b1", "Type": "Buy", "Kind": "Limit", "Amount": 1, "Price": 49000 } }], "Asks": [] }
    }"#;

    #[test]
    fn test_directory_loads_json_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("02-b.json"), EXCHANGE_B).unwrap();
        fs::write(dir.path().join("01-a.json"), EXCHANGE_A).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a snapshot").unwrap();

        let venues = DirectorySource::new(dir.path()).load().unwrap();

        let ids: Vec<&str> = venues.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["exchange-a", "exchange-b"]);
        assert_eq!(venues[0].book.asks[0].id, "a1");
        assert_eq!(venues[1].funds.crypto, FixedPoint8::from_units(2).unwrap());
    }

    #[test]
    fn test_empty_directory_has_no_venues() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DirectorySource::new(dir.path()).load().unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = DirectorySource::new(&missing).load().unwrap_err();
        assert!(matches!(err, SnapshotError::DirectoryNotFound(path) if path == missing));
    }

    #[test]
    fn test_malformed_file_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let err = DirectorySource::new(dir.path()).load().unwrap_err();

        assert!(matches!(err, SnapshotError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_static_source_hands_out_copies() {
        let source = StaticSource::new(vec![venue("x", 1, 100, vec![], vec![ask("a", 1, 10)])]);

        let mut first = source.load().unwrap();
        first[0].funds.euro = FixedPoint8::ZERO;

        let second = source.load().unwrap();
        assert_eq!(second[0].funds.euro, FixedPoint8::from_units(100).unwrap());
    }
}
