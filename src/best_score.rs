//! Best score tracking
//!
//! A single number that only ever goes up. The in-memory value is the
//! source of truth for the HUD; the store is written when it improves.

use crate::persistence::ScoreStore;

/// Best score across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestScore {
    value: u64,
}

impl BestScore {
    /// Read the stored best; an unreadable store counts as no best yet
    pub fn load(store: &impl ScoreStore) -> Self {
        match store.read_best() {
            Ok(value) => {
                log::info!("Loaded best score {}", value);
                Self { value }
            }
            Err(e) => {
                log::warn!("Best score unavailable, starting from 0: {}", e);
                Self::default()
            }
        }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Would this score beat the current best?
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.value
    }

    /// Record a finished session's score
    ///
    /// Returns true when it set a new best. A failed write is logged and
    /// dropped; the in-memory best still advances.
    pub fn record(&mut self, score: u64, store: &mut impl ScoreStore) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.value = score;
        if let Err(e) = store.write_best(score) {
            log::warn!("Could not save best score {}: {}", score, e);
        }
        true
    }
}
