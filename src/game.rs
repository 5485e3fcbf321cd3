//! Session driver
//!
//! Owns the simulation state and its collaborators. The host feeds it
//! triggers as they arrive and calls [`Game::frame`] once per display
//! refresh while [`Game::wants_frames`] is true.

use crate::best_score::BestScore;
use crate::persistence::ScoreStore;
use crate::renderer::{FrameSink, RenderError, Snapshot};
use crate::sim::{self, GamePhase, GameState, TickOutcome, Transition, Trigger};
use crate::tuning::Tuning;

/// A playable game: session state plus best-score persistence
pub struct Game<S: ScoreStore> {
    state: GameState,
    best: BestScore,
    store: S,
}

impl<S: ScoreStore> Game<S> {
    /// New game on the menu (Idle)
    pub fn new(seed: u64, tuning: Tuning, store: S) -> Self {
        let best = BestScore::load(&store);
        Self {
            state: GameState::new(seed, tuning),
            best,
            store,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn best(&self) -> u64 {
        self.best.value()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply an input trigger
    pub fn trigger(&mut self, trigger: Trigger) -> Transition {
        sim::apply(&mut self.state, trigger)
    }

    /// Advance one tick, recording the best score if the run just ended
    pub fn step(&mut self) -> TickOutcome {
        let outcome = sim::tick(&mut self.state);
        if let TickOutcome::Ended { score, .. } = outcome {
            if self.best.record(score, &mut self.store) {
                log::info!("New best score: {}", score);
            }
        }
        outcome
    }

    /// One display frame: a tick, then a draw of the result
    ///
    /// A failed draw is logged and skipped; the tick has already happened.
    pub fn frame(&mut self, sink: &mut impl FrameSink) -> TickOutcome {
        let outcome = self.step();
        if let Err(e) = sink.present(&self.snapshot()) {
            if matches!(e, RenderError::NotReady) {
                log::debug!("Frame {} skipped: {}", self.state.frame, e);
            } else {
                log::warn!("Frame {} skipped: {}", self.state.frame, e);
            }
        }
        outcome
    }

    /// Run frames while the game is Running, up to `budget`
    ///
    /// Returns the number of ticks executed. Stopping early means the
    /// session left Running and is waiting on the next trigger.
    pub fn run(&mut self, budget: u32, sink: &mut impl FrameSink) -> u32 {
        let mut ticks = 0;
        while self.wants_frames() && ticks < budget {
            self.frame(sink);
            ticks += 1;
        }
        ticks
    }

    /// Should the host schedule another frame?
    pub fn wants_frames(&self) -> bool {
        self.state.phase == GamePhase::Running
    }

    /// Read-only view for renderers and the HUD
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            flyer: &self.state.flyer,
            obstacles: &self.state.obstacles,
            score: self.state.score,
            best: self.best.value(),
            phase: self.state.phase,
            frame: self.state.frame,
            speed: self.state.speed,
            tuning: &self.state.tuning,
        }
    }
}
