//! JSON file store for native builds

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{ScoreStore, StoreError};

/// On-disk document
#[derive(Debug, Serialize, Deserialize)]
struct BestDocument {
    best: u64,
}

/// Best score kept in a small JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl ScoreStore for FileStore {
    fn read_best(&self) -> Result<u64, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let doc: BestDocument = serde_json::from_str(&json)?;
        Ok(doc.best)
    }

    fn write_best(&mut self, best: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string(&BestDocument { best })?;
        // Write then rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("Best score {} saved to {}", best, self.path.display());
        Ok(())
    }
}
