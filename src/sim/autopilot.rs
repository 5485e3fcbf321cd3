//! Demo autopilot
//!
//! Plays the game for the attract loop and the native headless build. It
//! only reads state; the caller turns its decision into a Flap trigger.

use super::state::{GamePhase, GameState};

/// How far below the aim point the flyer may sink before flapping
const DEAD_ZONE: f32 = 25.0;

/// Vertical position the autopilot is steering toward
pub fn aim_point(state: &GameState) -> f32 {
    let tuning = &state.tuning;
    let leading_edge = state.flyer.leading_edge();
    state
        .obstacles
        .iter()
        .find(|o| o.trailing_edge(tuning.obstacle_width) >= leading_edge)
        .map(|o| o.gap_center)
        .unwrap_or_else(|| {
            let (lo, hi) = tuning.safe_band();
            (lo + hi) / 2.0
        })
}

/// Should the flyer flap this tick?
pub fn wants_flap(state: &GameState) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }
    let flyer = &state.flyer;
    flyer.vy >= 0.0 && flyer.y > aim_point(state) + DEAD_ZONE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;
    use crate::tuning::Tuning;

    fn running() -> GameState {
        let mut state = GameState::new(11, Tuning::default());
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_aims_at_band_middle_without_obstacles() {
        let state = running();
        assert_eq!(aim_point(&state), 370.0);
    }

    #[test]
    fn test_aims_at_next_uncleared_gap() {
        let mut state = running();
        state.obstacles.push(Obstacle {
            x: 0.0,
            gap_center: 250.0,
            scored: true,
        });
        state.obstacles.push(Obstacle {
            x: 400.0,
            gap_center: 500.0,
            scored: false,
        });
        assert_eq!(aim_point(&state), 500.0);
    }

    #[test]
    fn test_flaps_when_sinking_below_aim() {
        let mut state = running();
        state.flyer.y = 420.0;
        state.flyer.vy = 2.0;
        assert!(wants_flap(&state));
    }

    #[test]
    fn test_holds_when_rising_or_above_aim() {
        let mut state = running();
        state.flyer.y = 420.0;
        state.flyer.vy = -3.0;
        assert!(!wants_flap(&state));
        state.flyer.y = 300.0;
        state.flyer.vy = 4.0;
        assert!(!wants_flap(&state));
    }

    #[test]
    fn test_never_flaps_outside_running() {
        let mut state = running();
        state.flyer.y = 700.0;
        state.flyer.vy = 5.0;
        state.phase = GamePhase::Paused;
        assert!(!wants_flap(&state));
    }
}
