//! Flappy PWA - a gap-flying arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, state machine)
//! - `game`: Session driver that owns the state and its collaborators
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Input mapping and viewport scaling
//! - `persistence`: Best-score storage backends
//! - `offline`: Cache-first asset strategy for offline play
//! - `tuning`: Data-driven game balance

pub mod best_score;
pub mod game;
pub mod offline;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use best_score::BestScore;
pub use game::Game;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
///
/// Logical units are based on a 600x800 design space; drawing is scaled to
/// the canvas.
pub mod consts {
    /// Design space dimensions
    pub const DESIGN_W: f32 = 600.0;
    pub const DESIGN_H: f32 = 800.0;
    /// Top of the ground strip
    pub const GROUND_Y: f32 = 740.0;

    /// Flyer defaults
    pub const FLYER_X: f32 = 140.0;
    pub const FLYER_START_Y: f32 = DESIGN_H * 0.45;
    pub const FLYER_RADIUS: f32 = 18.0;

    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.38;
    /// Velocity set (not added) by a flap
    pub const FLAP_IMPULSE: f32 = -7.2;
    /// Terminal fall velocity
    pub const MAX_FALL_SPEED: f32 = 11.0;

    /// Obstacle defaults
    pub const GAP_SIZE: f32 = 190.0;
    pub const OBSTACLE_WIDTH: f32 = 80.0;
    pub const START_SPEED: f32 = 2.8;
    /// Speed added per scored obstacle
    pub const SPEED_RAMP: f32 = 0.05;
    /// Ticks between spawns
    pub const SPAWN_INTERVAL: u32 = 95;
    /// How far past the left edge an obstacle's trailing edge travels before removal
    pub const REMOVAL_MARGIN: f32 = 40.0;
    /// Clearance kept between a gap and the ceiling / ground
    pub const CEILING_MARGIN: f32 = 120.0;
    pub const GROUND_MARGIN: f32 = 120.0;
}
