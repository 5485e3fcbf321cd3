//! Session state machine
//!
//! Idle -> Running <-> Paused, Running -> Ended (from the tick),
//! Ended -> Running (reset). Anything else is ignored.

use super::state::{GamePhase, GameState};

/// Discrete input trigger; carries no payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Flap,
    Start,
    PauseToggle,
    Reset,
}

/// Transition taken in response to a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    Flapped,
    Paused,
    Resumed,
    Restarted,
    /// Trigger not valid in the current phase
    Ignored,
}

impl Transition {
    /// Whether this transition (re)entered the Running phase
    pub fn resumes_play(&self) -> bool {
        matches!(
            self,
            Transition::Started | Transition::Resumed | Transition::Restarted
        )
    }
}

/// Apply a trigger to the session
pub fn apply(state: &mut GameState, trigger: Trigger) -> Transition {
    match (state.phase, trigger) {
        // A flap on the menu starts the game without an impulse
        (GamePhase::Idle, Trigger::Start | Trigger::Flap) => {
            state.phase = GamePhase::Running;
            log::info!("Game started (seed {})", state.seed);
            Transition::Started
        }
        (GamePhase::Running, Trigger::Flap) => {
            state.flyer.flap(state.tuning.flap_impulse);
            Transition::Flapped
        }
        (GamePhase::Running, Trigger::PauseToggle) => {
            state.phase = GamePhase::Paused;
            log::info!("Paused at frame {}", state.frame);
            Transition::Paused
        }
        (GamePhase::Paused, Trigger::PauseToggle) => {
            state.phase = GamePhase::Running;
            log::info!("Resumed at frame {}", state.frame);
            Transition::Resumed
        }
        (GamePhase::Ended, Trigger::Reset) => {
            let mut next = state.next_session();
            next.phase = GamePhase::Running;
            *state = next;
            log::info!("Game reset (seed {})", state.seed);
            Transition::Restarted
        }
        _ => Transition::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Flyer, Obstacle};
    use crate::sim::tick::{TickOutcome, tick};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn state_in(phase: GamePhase) -> GameState {
        let mut state = GameState::new(42, Tuning::default());
        state.phase = phase;
        state
    }

    #[test]
    fn test_start_from_idle() {
        let mut state = state_in(GamePhase::Idle);
        assert_eq!(apply(&mut state, Trigger::Start), Transition::Started);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.frame, 0);
    }

    #[test]
    fn test_flap_from_idle_starts_without_impulse() {
        let mut state = state_in(GamePhase::Idle);
        assert_eq!(apply(&mut state, Trigger::Flap), Transition::Started);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.flyer.vy, 0.0);
    }

    #[test]
    fn test_flap_while_running_overwrites_velocity() {
        let mut state = state_in(GamePhase::Running);
        state.flyer.vy = 10.0;
        assert_eq!(apply(&mut state, Trigger::Flap), Transition::Flapped);
        assert_eq!(state.flyer.vy, -7.2);
        assert_eq!(apply(&mut state, Trigger::Flap), Transition::Flapped);
        assert_eq!(state.flyer.vy, -7.2);
    }

    #[test]
    fn test_ignored_triggers() {
        let table = [
            (GamePhase::Idle, Trigger::PauseToggle),
            (GamePhase::Idle, Trigger::Reset),
            (GamePhase::Running, Trigger::Start),
            (GamePhase::Running, Trigger::Reset),
            (GamePhase::Paused, Trigger::Flap),
            (GamePhase::Paused, Trigger::Start),
            (GamePhase::Paused, Trigger::Reset),
            (GamePhase::Ended, Trigger::Flap),
            (GamePhase::Ended, Trigger::Start),
            (GamePhase::Ended, Trigger::PauseToggle),
        ];
        for (phase, trigger) in table {
            let mut state = state_in(phase);
            state.flyer.vy = 3.0;
            assert_eq!(
                apply(&mut state, trigger),
                Transition::Ignored,
                "{:?} in {:?}",
                trigger,
                phase
            );
            assert_eq!(state.phase, phase);
            assert_eq!(state.flyer.vy, 3.0);
        }
    }

    #[test]
    fn test_pause_freezes_and_resume_restores() {
        let mut state = state_in(GamePhase::Idle);
        apply(&mut state, Trigger::Start);
        for _ in 0..10 {
            tick(&mut state);
        }
        apply(&mut state, Trigger::Flap);
        tick(&mut state);

        assert_eq!(apply(&mut state, Trigger::PauseToggle), Transition::Paused);
        let flyer: Flyer = state.flyer;
        let frame = state.frame;
        let obstacles: Vec<Obstacle> = state.obstacles.clone();
        let (score, speed, timer) = (state.score, state.speed, state.spawn_timer);

        for _ in 0..50 {
            assert_eq!(tick(&mut state), TickOutcome::Frozen);
        }
        assert_eq!(state.flyer, flyer);
        assert_eq!(state.frame, frame);

        assert_eq!(apply(&mut state, Trigger::PauseToggle), Transition::Resumed);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.flyer, flyer);
        assert_eq!(state.obstacles, obstacles);
        assert_eq!((state.score, state.speed, state.spawn_timer), (score, speed, timer));

        assert_eq!(tick(&mut state), TickOutcome::Continue);
        assert_eq!(state.frame, frame + 1);
        assert_ne!(state.flyer.y, flyer.y);
    }

    #[test]
    fn test_start_tick_then_fall_to_ground() {
        let mut state = state_in(GamePhase::Idle);
        apply(&mut state, Trigger::Start);
        assert_eq!(state.frame, 0);

        let y0 = state.flyer.y;
        assert_eq!(tick(&mut state), TickOutcome::Continue);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.flyer.y, y0 + state.flyer.vy);

        let outcome = loop {
            match tick(&mut state) {
                TickOutcome::Continue => continue,
                other => break other,
            }
        };
        assert!(state.flyer.y + state.flyer.radius >= state.tuning.ground_y);
        assert_eq!(state.phase, GamePhase::Ended);
        match outcome {
            TickOutcome::Ended { score, .. } => assert_eq!(score, 0),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn prop_reset_is_idempotent(
            seed in any::<u64>(),
            flaps in proptest::collection::vec(any::<bool>(), 0..800),
        ) {
            let tuning = Tuning::default();
            let mut state = GameState::new(seed, tuning);
            apply(&mut state, Trigger::Start);
            for flap in flaps {
                if flap {
                    apply(&mut state, Trigger::Flap);
                }
                if tick(&mut state) != TickOutcome::Continue {
                    break;
                }
            }
            // Force the end if the sequence ran out first
            state.phase = GamePhase::Ended;

            prop_assert_eq!(apply(&mut state, Trigger::Reset), Transition::Restarted);
            prop_assert_eq!(state.phase, GamePhase::Running);
            prop_assert_eq!(state.flyer, Flyer::new(&tuning));
            prop_assert!(state.obstacles.is_empty());
            prop_assert_eq!(state.score, 0);
            prop_assert_eq!(state.frame, 0);
            prop_assert_eq!(state.spawn_timer, 0);
            prop_assert_eq!(state.speed, tuning.start_speed);
        }
    }
}
