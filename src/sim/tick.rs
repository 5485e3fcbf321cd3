//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one display frame. There is no
//! delta time: the host calls this once per refresh.

use super::collision::flyer_hits_obstacle;
use super::state::{GamePhase, GameState};

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    Ground,
    Ceiling,
    Obstacle,
}

/// Result of advancing one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running (idle, paused or ended); nothing changed
    Frozen,
    /// State advanced, run continues
    Continue,
    /// This tick ended the run
    Ended { score: u64, cause: EndCause },
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState) -> TickOutcome {
    if state.phase != GamePhase::Running {
        return TickOutcome::Frozen;
    }

    let tuning = state.tuning;
    state.frame += 1;

    // Physics
    state
        .flyer
        .integrate(tuning.gravity, tuning.max_fall_speed);

    // Spawning
    state.spawn_timer += 1;
    if state.spawn_timer >= tuning.spawn_interval {
        state.spawn_timer = 0;
        state.spawn_obstacle();
    }

    // Scroll and score
    let leading_edge = state.flyer.leading_edge();
    for obstacle in &mut state.obstacles {
        obstacle.x -= state.speed;
        if !obstacle.scored && obstacle.trailing_edge(tuning.obstacle_width) < leading_edge {
            obstacle.scored = true;
            state.score += 1;
            state.speed += tuning.speed_ramp;
            log::debug!("Score {} (speed {:.2})", state.score, state.speed);
        }
    }

    // Drop obstacles that are fully off screen
    state
        .obstacles
        .retain(|o| o.trailing_edge(tuning.obstacle_width) > -tuning.removal_margin);

    // Termination
    let flyer = &state.flyer;
    let cause = if flyer.y + flyer.radius >= tuning.ground_y {
        Some(EndCause::Ground)
    } else if flyer.y - flyer.radius <= 0.0 {
        Some(EndCause::Ceiling)
    } else if state
        .obstacles
        .iter()
        .any(|o| flyer_hits_obstacle(flyer, o, &tuning))
    {
        Some(EndCause::Obstacle)
    } else {
        None
    };

    match cause {
        Some(cause) => {
            state.phase = GamePhase::Ended;
            log::info!("Run ended ({:?}) with score {}", cause, state.score);
            TickOutcome::Ended {
                score: state.score,
                cause,
            }
        }
        None => TickOutcome::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn running(seed: u64, tuning: Tuning) -> GameState {
        let mut state = GameState::new(seed, tuning);
        state.phase = GamePhase::Running;
        state
    }

    /// No gravity and no spawning, so the flyer hovers and only hand-placed
    /// obstacles exist
    fn hover_tuning() -> Tuning {
        Tuning {
            gravity: 0.0,
            spawn_interval: 10_000,
            ..Tuning::default()
        }
    }

    #[test]
    fn test_tick_frozen_unless_running() {
        for phase in [GamePhase::Idle, GamePhase::Paused, GamePhase::Ended] {
            let mut state = GameState::new(3, Tuning::default());
            state.phase = phase;
            let before = state.flyer;
            assert_eq!(tick(&mut state), TickOutcome::Frozen);
            assert_eq!(state.flyer, before);
            assert_eq!(state.frame, 0);
        }
    }

    #[test]
    fn test_first_tick_applies_gravity() {
        let mut state = running(3, Tuning::default());
        assert_eq!(tick(&mut state), TickOutcome::Continue);
        assert_eq!(state.frame, 1);
        assert_eq!(state.flyer.vy, 0.38);
        assert_eq!(state.flyer.y, 360.0 + 0.38);
    }

    #[test]
    fn test_spawn_on_interval() {
        let tuning = Tuning {
            gravity: 0.0,
            ..Tuning::default()
        };
        let mut state = running(5, tuning);
        for _ in 0..94 {
            tick(&mut state);
        }
        assert!(state.obstacles.is_empty());
        tick(&mut state);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.spawn_timer, 0);
        // Spawned then scrolled once in the same tick
        assert_eq!(state.obstacles[0].x, 680.0 - 2.8);
    }

    #[test]
    fn test_score_exactly_once() {
        let mut state = running(5, hover_tuning());
        // Trailing edge starts at 130, flyer leading edge is 122
        state.obstacles.push(Obstacle {
            x: 50.0,
            gap_center: 360.0,
            scored: false,
        });

        let mut scored_at = Vec::new();
        for i in 1..=40 {
            let before = state.score;
            assert_eq!(tick(&mut state), TickOutcome::Continue);
            if state.score > before {
                scored_at.push(i);
            }
        }
        assert_eq!(state.score, 1);
        // 130 - 2.8 * 3 = 121.6 is the first position left of 122
        assert_eq!(scored_at, vec![3]);
        assert!(state.obstacles.iter().all(|o| o.scored));
    }

    #[test]
    fn test_scoring_ramps_speed() {
        let mut state = running(5, hover_tuning());
        state.obstacles.push(Obstacle {
            x: 40.0,
            gap_center: 360.0,
            scored: false,
        });
        tick(&mut state);
        assert_eq!(state.score, 1);
        assert!((state.speed - 2.85).abs() < 1e-6);
    }

    #[test]
    fn test_offscreen_obstacles_removed() {
        let mut state = running(5, hover_tuning());
        state.obstacles.push(Obstacle {
            x: -118.0,
            gap_center: 360.0,
            scored: true,
        });
        state.obstacles.push(Obstacle {
            x: 300.0,
            gap_center: 360.0,
            scored: false,
        });
        tick(&mut state);
        // Trailing edge moved from -38 to -40.8
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].x, 300.0 - 2.8);
    }

    #[test]
    fn test_ground_ends_run() {
        let mut state = running(5, Tuning::default());
        state.flyer.y = 722.0;
        state.flyer.vy = 0.0;
        let outcome = tick(&mut state);
        assert_eq!(
            outcome,
            TickOutcome::Ended {
                score: 0,
                cause: EndCause::Ground
            }
        );
        assert_eq!(state.phase, GamePhase::Ended);
    }

    #[test]
    fn test_ceiling_ends_run() {
        let mut state = running(5, Tuning::default());
        state.flyer.y = 20.0;
        state.flyer.vy = -7.2;
        let outcome = tick(&mut state);
        assert!(matches!(
            outcome,
            TickOutcome::Ended {
                cause: EndCause::Ceiling,
                ..
            }
        ));
    }

    #[test]
    fn test_obstacle_collision_ends_run() {
        let mut state = running(5, hover_tuning());
        state.obstacles.push(Obstacle {
            x: 120.0,
            gap_center: 600.0,
            scored: false,
        });
        let outcome = tick(&mut state);
        assert!(matches!(
            outcome,
            TickOutcome::Ended {
                cause: EndCause::Obstacle,
                ..
            }
        ));
    }

    #[test]
    fn test_ended_reports_obstacles_passed() {
        let mut state = running(5, hover_tuning());
        state.obstacles.push(Obstacle {
            x: 40.0,
            gap_center: 360.0,
            scored: false,
        });
        state.obstacles.push(Obstacle {
            x: 200.0,
            gap_center: 600.0,
            scored: false,
        });
        let outcome = loop {
            match tick(&mut state) {
                TickOutcome::Continue => continue,
                other => break other,
            }
        };
        assert_eq!(
            outcome,
            TickOutcome::Ended {
                score: 1,
                cause: EndCause::Obstacle
            }
        );
    }

    proptest! {
        #[test]
        fn prop_speed_and_score_monotonic(
            seed in any::<u64>(),
            flaps in proptest::collection::vec(any::<bool>(), 1..600),
        ) {
            let mut state = running(seed, Tuning::default());
            for flap in flaps {
                if flap {
                    state.flyer.flap(state.tuning.flap_impulse);
                }
                let speed = state.speed;
                let score = state.score;
                let outcome = tick(&mut state);
                prop_assert!(state.speed >= speed);
                prop_assert!(state.score >= score);
                prop_assert!(state.flyer.vy <= state.tuning.max_fall_speed);
                if outcome != TickOutcome::Continue {
                    break;
                }
            }
        }
    }
}
