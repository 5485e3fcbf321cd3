//! Best-score persistence
//!
//! Backends:
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//! - `FileStore`: JSON file next to the binary (native)
//! - `MemoryStore`: in-process, with an optional simulated outage for tests
//!
//! A missing value reads as zero. Callers treat every error as non-fatal.

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use thiserror::Error;

/// Why a store could not be read or written
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("stored best score is corrupt: {0:?}")]
    Corrupt(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage JSON invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable home of the single best score
pub trait ScoreStore {
    /// Stored best, or 0 when nothing was saved yet
    fn read_best(&self) -> Result<u64, StoreError>;
    fn write_best(&mut self, best: u64) -> Result<(), StoreError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Option<u64>,
    offline: bool,
    /// Number of successful writes
    pub writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds a best score
    pub fn with_best(best: u64) -> Self {
        Self {
            best: Some(best),
            ..Self::default()
        }
    }

    /// Store whose every call fails
    pub fn unavailable() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Option<u64> {
        self.best
    }
}

impl ScoreStore for MemoryStore {
    fn read_best(&self) -> Result<u64, StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable);
        }
        Ok(self.best.unwrap_or(0))
    }

    fn write_best(&mut self, best: u64) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable);
        }
        self.best = Some(best);
        self.writes += 1;
        Ok(())
    }
}

/// Parse the plain decimal form used in LocalStorage
///
/// Empty means nothing saved yet.
pub fn parse_best(raw: &str) -> Result<u64, StoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| StoreError::Corrupt(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_defaults_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(store.read_best().unwrap(), 0);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        store.write_best(12).unwrap();
        assert_eq!(store.read_best().unwrap(), 12);
        assert_eq!(store.writes, 1);
    }

    #[test]
    fn test_unavailable_store_errors() {
        let mut store = MemoryStore::unavailable();
        assert!(matches!(store.read_best(), Err(StoreError::Unavailable)));
        assert!(store.write_best(3).is_err());
        assert_eq!(store.stored(), None);
    }

    #[test]
    fn test_parse_best() {
        assert_eq!(parse_best("17").unwrap(), 17);
        assert_eq!(parse_best(" 4 \n").unwrap(), 4);
        assert_eq!(parse_best("").unwrap(), 0);
        assert!(matches!(parse_best("-3"), Err(StoreError::Corrupt(_))));
        assert!(matches!(parse_best("NaN"), Err(StoreError::Corrupt(_))));
    }
}
