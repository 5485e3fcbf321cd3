//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`GameState`]; nothing is global.

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Menu shown, waiting for the first start/flap
    Idle,
    /// Simulation advances every tick
    Running,
    /// Simulation frozen until resumed
    Paused,
    /// Run over, waiting for reset
    Ended,
}

/// The player-controlled falling object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flyer {
    /// Fixed horizontal position
    pub x: f32,
    pub y: f32,
    /// Vertical velocity (positive is down)
    pub vy: f32,
    pub radius: f32,
}

impl Flyer {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            x: tuning.flyer_x,
            y: tuning.flyer_start_y,
            vy: 0.0,
            radius: tuning.flyer_radius,
        }
    }

    /// Apply one tick of gravity, clamped to terminal velocity, then move
    pub fn integrate(&mut self, gravity: f32, max_fall_speed: f32) {
        self.vy = (self.vy + gravity).min(max_fall_speed);
        self.y += self.vy;
    }

    /// Overwrite the vertical velocity with the upward impulse
    pub fn flap(&mut self, impulse: f32) {
        self.vy = impulse;
    }

    /// Left-most point of the collision circle
    pub fn leading_edge(&self) -> f32 {
        self.x - self.radius
    }
}

/// A scrolling pair of solid regions with a passable gap between them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left (leading) edge
    pub x: f32,
    /// Vertical centre of the gap
    pub gap_center: f32,
    /// Set once the flyer has cleared it
    pub scored: bool,
}

impl Obstacle {
    /// Right edge
    pub fn trailing_edge(&self, width: f32) -> f32 {
        self.x + width
    }

    pub fn gap_top(&self, gap_size: f32) -> f32 {
        self.gap_center - gap_size / 2.0
    }

    pub fn gap_bottom(&self, gap_size: f32) -> f32 {
        self.gap_center + gap_size / 2.0
    }

    /// Solid region above the gap
    pub fn upper_rect(&self, tuning: &Tuning) -> Rect {
        Rect::new(
            self.x,
            0.0,
            tuning.obstacle_width,
            self.gap_top(tuning.gap_size),
        )
    }

    /// Solid region below the gap (extends past the bottom of the world)
    pub fn lower_rect(&self, tuning: &Tuning) -> Rect {
        Rect::new(
            self.x,
            self.gap_bottom(tuning.gap_size),
            tuning.obstacle_width,
            tuning.world_height,
        )
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed this session's RNG was built from
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub flyer: Flyer,
    /// Spawn order, which is also left-to-right order
    pub obstacles: Vec<Obstacle>,
    pub score: u64,
    /// Ticks simulated this session
    pub frame: u64,
    /// Current obstacle scroll speed (ramps up as obstacles are cleared)
    pub speed: f32,
    /// Ticks since the last spawn
    pub spawn_timer: u32,
    rng: Pcg32,
}

impl GameState {
    /// Create a fresh session in the Idle phase
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            tuning,
            phase: GamePhase::Idle,
            flyer: Flyer::new(&tuning),
            obstacles: Vec::new(),
            score: 0,
            frame: 0,
            speed: tuning.start_speed,
            spawn_timer: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Build the replacement session used on reset
    ///
    /// The new seed is drawn from this session's RNG so consecutive runs see
    /// different gap sequences while staying reproducible from the first seed.
    pub fn next_session(&mut self) -> Self {
        let seed = self.rng.next_u64();
        Self::new(seed, self.tuning)
    }

    /// Spawn an obstacle at the right edge with a gap inside the safe band
    pub fn spawn_obstacle(&mut self) {
        let (lo, hi) = self.tuning.safe_band();
        let u: f32 = self.rng.random();
        let gap_center = lo + u * (hi - lo);
        self.obstacles.push(Obstacle {
            x: self.tuning.world_width + self.tuning.obstacle_width,
            gap_center,
            scored: false,
        });
        log::debug!("Spawned obstacle with gap at {:.1}", gap_center);
    }
}
