//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per call, no delta time
//! - Seeded RNG only
//! - Obstacles kept in spawn (left-to-right) order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod control;
pub mod state;
pub mod tick;

pub use collision::{Rect, circle_rect_overlap, flyer_hits_obstacle};
pub use control::{Transition, Trigger, apply};
pub use state::{Flyer, GamePhase, GameState, Obstacle};
pub use tick::{EndCause, TickOutcome, tick};
