//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so it can be
//! overridden (LocalStorage JSON on the web) and bent for tests. Defaults
//! come from [`crate::consts`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected tuning override
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("safe band is empty: margins {ceiling} + {ground} and gap {gap} do not fit above ground at {ground_y}")]
    EmptySafeBand {
        ceiling: f32,
        ground: f32,
        gap: f32,
        ground_y: f32,
    },
    #[error("{0} must be positive")]
    NotPositive(&'static str),
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("flyer start {y} lies outside the playable band ({min}, {max})")]
    StartOutsidePlayfield { y: f32, min: f32, max: f32 },
    #[error("ground at {ground_y} lies outside world height {world_height}")]
    GroundOutsideWorld { ground_y: f32, world_height: f32 },
}

/// Gameplay tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world_width: f32,
    pub world_height: f32,
    pub ground_y: f32,

    pub flyer_x: f32,
    pub flyer_start_y: f32,
    pub flyer_radius: f32,

    pub gravity: f32,
    pub flap_impulse: f32,
    pub max_fall_speed: f32,

    pub gap_size: f32,
    pub obstacle_width: f32,
    pub start_speed: f32,
    pub speed_ramp: f32,
    pub spawn_interval: u32,
    pub removal_margin: f32,
    pub ceiling_margin: f32,
    pub ground_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: DESIGN_W,
            world_height: DESIGN_H,
            ground_y: GROUND_Y,

            flyer_x: FLYER_X,
            flyer_start_y: FLYER_START_Y,
            flyer_radius: FLYER_RADIUS,

            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,
            max_fall_speed: MAX_FALL_SPEED,

            gap_size: GAP_SIZE,
            obstacle_width: OBSTACLE_WIDTH,
            start_speed: START_SPEED,
            speed_ramp: SPEED_RAMP,
            spawn_interval: SPAWN_INTERVAL,
            removal_margin: REMOVAL_MARGIN,
            ceiling_margin: CEILING_MARGIN,
            ground_margin: GROUND_MARGIN,
        }
    }
}

impl Tuning {
    /// Parse a JSON override; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Range of gap centres that keeps the whole gap clear of ceiling and ground
    pub fn safe_band(&self) -> (f32, f32) {
        let half_gap = self.gap_size / 2.0;
        (
            self.ceiling_margin + half_gap,
            self.ground_y - self.ground_margin - half_gap,
        )
    }

    /// Check the configuration invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("flyer_radius", self.flyer_radius),
            ("max_fall_speed", self.max_fall_speed),
            ("gap_size", self.gap_size),
            ("obstacle_width", self.obstacle_width),
            ("start_speed", self.start_speed),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::NotPositive(name));
            }
        }
        if self.spawn_interval == 0 {
            return Err(TuningError::NotPositive("spawn_interval"));
        }
        let non_negative = [
            ("speed_ramp", self.speed_ramp),
            ("removal_margin", self.removal_margin),
            ("ceiling_margin", self.ceiling_margin),
            ("ground_margin", self.ground_margin),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(TuningError::Negative(name));
            }
        }
        if self.ground_y > self.world_height {
            return Err(TuningError::GroundOutsideWorld {
                ground_y: self.ground_y,
                world_height: self.world_height,
            });
        }
        if self.ceiling_margin + self.gap_size + self.ground_margin >= self.ground_y {
            return Err(TuningError::EmptySafeBand {
                ceiling: self.ceiling_margin,
                ground: self.ground_margin,
                gap: self.gap_size,
                ground_y: self.ground_y,
            });
        }
        // The flyer must not start touching the ceiling or the ground
        let (min, max) = (self.flyer_radius, self.ground_y - self.flyer_radius);
        if !(self.flyer_start_y > min && self.flyer_start_y < max) {
            return Err(TuningError::StartOutsidePlayfield {
                y: self.flyer_start_y,
                min,
                max,
            });
        }
        Ok(())
    }

    /// LocalStorage key for a developer override
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "flappy_tuning";

    /// Load a tuning override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning override from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring tuning override: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
