//! Scene layout in design space
//!
//! Turns a snapshot into the handful of numbers the shader needs. Kept
//! separate from the GPU code so the math can be tested natively.

use super::Snapshot;
use crate::settings::Settings;

/// Most obstacles drawn at once (the spawn spacing keeps about four on screen)
pub const MAX_PIPES: usize = 8;
/// Most clouds drawn at once
pub const MAX_CLOUDS: usize = 8;

/// Rim drawn at each gap edge
pub const RIM_HEIGHT: f32 = 22.0;
pub const RIM_OVERHANG: f32 = 4.0;

/// Ground stripe pattern
pub const STRIPE_PERIOD: f32 = 80.0;
pub const STRIPE_WIDTH: f32 = 40.0;
pub const STRIPE_HEIGHT: f32 = 10.0;

/// Tilt limits (radians)
const TILT_UP: f32 = -0.35;
const TILT_DOWN: f32 = 0.45;

/// Flyer rotation for a given vertical velocity
pub fn flyer_tilt(vy: f32) -> f32 {
    (vy / 12.0).clamp(TILT_UP, TILT_DOWN)
}

/// Cloud `index` at `frame`: (centre x, centre y, radius)
///
/// Clouds drift left slowly and wrap 100 units past either side.
pub fn cloud(frame: u64, index: usize, world_width: f32) -> (f32, f32, f32) {
    let wrap = (world_width + 200.0) as f64;
    let cx = (frame as f64 * 0.2 + index as f64 * 220.0) % wrap - 100.0;
    let cy = 120.0 + 80.0 * index as f32;
    let r = 40.0 + 6.0 * index as f32;
    (cx as f32, cy, r)
}

/// Horizontal scroll of the ground stripes
pub fn stripe_offset(frame: u64, speed: f32) -> f32 {
    ((frame as f64 * speed as f64 * 2.0) % STRIPE_PERIOD as f64) as f32
}

/// Everything the shader draws, in design units
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    /// x, y, radius, tilt
    pub flyer: [f32; 4],
    /// left x, gap top, gap bottom, unused
    pub pipes: Vec<[f32; 4]>,
    /// x, y, radius, unused
    pub clouds: Vec<[f32; 4]>,
    pub stripe_offset: f32,
}

impl SceneLayout {
    pub fn build(snapshot: &Snapshot<'_>, settings: &Settings) -> Self {
        let tuning = snapshot.tuning;
        let flyer = snapshot.flyer;
        let tilt = if settings.effective_tilt() {
            flyer_tilt(flyer.vy)
        } else {
            0.0
        };

        // Only obstacles that overlap the screen
        let pipes = snapshot
            .obstacles
            .iter()
            .filter(|o| {
                o.x - RIM_OVERHANG < tuning.world_width
                    && o.trailing_edge(tuning.obstacle_width) + RIM_OVERHANG > 0.0
            })
            .take(MAX_PIPES)
            .map(|o| {
                [
                    o.x,
                    o.gap_top(tuning.gap_size),
                    o.gap_bottom(tuning.gap_size),
                    0.0,
                ]
            })
            .collect();

        let scroll_frame = if settings.effective_scroll() {
            snapshot.frame
        } else {
            0
        };
        let clouds = (0..settings.cloud_count().min(MAX_CLOUDS))
            .map(|i| {
                let (x, y, r) = cloud(scroll_frame, i, tuning.world_width);
                [x, y, r, 0.0]
            })
            .collect();

        Self {
            flyer: [flyer.x, flyer.y, flyer.radius, tilt],
            pipes,
            clouds,
            stripe_offset: stripe_offset(scroll_frame, snapshot.speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Flyer, GamePhase, Obstacle};
    use crate::tuning::Tuning;

    fn snapshot<'a>(
        flyer: &'a Flyer,
        obstacles: &'a [Obstacle],
        tuning: &'a Tuning,
        frame: u64,
    ) -> Snapshot<'a> {
        Snapshot {
            flyer,
            obstacles,
            score: 0,
            best: 0,
            phase: GamePhase::Running,
            frame,
            speed: 2.8,
            tuning,
        }
    }

    #[test]
    fn test_tilt_clamps() {
        assert_eq!(flyer_tilt(0.0), 0.0);
        assert_eq!(flyer_tilt(-7.2), -0.35);
        assert_eq!(flyer_tilt(11.0), 0.45);
        assert!((flyer_tilt(3.0) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_clouds_wrap() {
        assert_eq!(cloud(0, 0, 600.0), (-100.0, 120.0, 40.0));
        assert_eq!(cloud(0, 2, 600.0), (340.0, 280.0, 52.0));
        // 4000 * 0.2 = 800 wraps to 0
        assert_eq!(cloud(4000, 0, 600.0).0, -100.0);
    }

    #[test]
    fn test_stripe_offset_wraps() {
        assert_eq!(stripe_offset(0, 2.8), 0.0);
        assert!((stripe_offset(10, 3.0) - 60.0).abs() < 1e-4);
        assert!((stripe_offset(20, 3.0) - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_layout_culls_offscreen_pipes() {
        let tuning = Tuning::default();
        let flyer = Flyer::new(&tuning);
        let obstacles = [
            Obstacle {
                x: -90.0,
                gap_center: 300.0,
                scored: true,
            },
            Obstacle {
                x: 200.0,
                gap_center: 300.0,
                scored: false,
            },
            Obstacle {
                x: 680.0,
                gap_center: 400.0,
                scored: false,
            },
        ];
        let layout = SceneLayout::build(&snapshot(&flyer, &obstacles, &tuning, 0), &Settings::default());
        assert_eq!(layout.pipes, vec![[200.0, 205.0, 395.0, 0.0]]);
        assert_eq!(layout.clouds.len(), 3);
        assert_eq!(layout.flyer, [140.0, 360.0, 18.0, 0.0]);
    }

    #[test]
    fn test_reduced_motion_freezes_background() {
        let tuning = Tuning::default();
        let mut flyer = Flyer::new(&tuning);
        flyer.vy = 6.0;
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let layout = SceneLayout::build(&snapshot(&flyer, &[], &tuning, 500), &settings);
        assert_eq!(layout.flyer[3], 0.0);
        assert_eq!(layout.stripe_offset, 0.0);
        assert_eq!(layout.clouds[0][0], -100.0);
    }
}
