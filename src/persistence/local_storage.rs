//! Browser LocalStorage store
//!
//! The value is a plain decimal string under `flappy_high`, the same format
//! the JavaScript build wrote, so existing best scores carry over.

use web_sys::Storage;

use super::{ScoreStore, StoreError, parse_best};

/// LocalStorage-backed best score
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "flappy_high";

    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

impl ScoreStore for LocalStorageStore {
    fn read_best(&self) -> Result<u64, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(raw)) => parse_best(&raw),
            Ok(None) => Ok(0),
            Err(_) => Err(StoreError::Unavailable),
        }
    }

    fn write_best(&mut self, best: u64) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        storage
            .set_item(Self::STORAGE_KEY, &best.to_string())
            .map_err(|_| StoreError::Unavailable)?;
        log::info!("Best score {} saved", best);
        Ok(())
    }
}
