//! Input mapping
//!
//! The host forwards raw browser events as [`InputEvent`]s; this module
//! decides which simulation [`Trigger`] (if any) each one becomes.

use crate::sim::{GamePhase, Trigger};

/// Buttons in the page overlay, by element id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// `playBtn` on the start menu
    Play,
    /// `retryBtn` on the game-over panel
    Retry,
    /// `tapBtn`, the on-screen flap button
    Tap,
}

impl UiAction {
    pub const ALL: [UiAction; 3] = [UiAction::Play, UiAction::Retry, UiAction::Tap];

    pub fn element_id(&self) -> &'static str {
        match self {
            UiAction::Play => "playBtn",
            UiAction::Retry => "retryBtn",
            UiAction::Tap => "tapBtn",
        }
    }

    pub fn trigger(&self) -> Trigger {
        match self {
            UiAction::Play => Trigger::Start,
            UiAction::Retry => Trigger::Reset,
            UiAction::Tap => Trigger::Flap,
        }
    }
}

/// Browser events the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent<'a> {
    /// `keydown`, carrying `KeyboardEvent.code`
    Key(&'a str),
    /// `pointerdown` on the canvas
    PointerDown,
    /// Click on an overlay button
    Button(UiAction),
    /// Document became hidden
    Hidden,
    /// Window lost focus
    Blur,
}

/// Keys handled by the host itself rather than the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    ToggleAutopilot,
    ToggleFps,
    ToggleReducedMotion,
    CycleQuality,
}

impl HostCommand {
    pub fn from_key(code: &str) -> Option<Self> {
        match code {
            "KeyI" => Some(HostCommand::ToggleAutopilot),
            "KeyF" => Some(HostCommand::ToggleFps),
            "KeyM" => Some(HostCommand::ToggleReducedMotion),
            "KeyQ" => Some(HostCommand::CycleQuality),
            _ => None,
        }
    }
}

/// Keys that flap; their default action (page scroll) is suppressed
pub fn is_flap_key(code: &str) -> bool {
    matches!(code, "Space" | "ArrowUp")
}

/// Map an event to a trigger given the current phase
///
/// Focus loss only produces a pause while a run is live; toggling from any
/// other phase would resume a paused game behind the player's back.
pub fn map_event(event: InputEvent<'_>, phase: GamePhase) -> Option<Trigger> {
    match event {
        InputEvent::Key(code) if is_flap_key(code) => Some(Trigger::Flap),
        InputEvent::Key("KeyP") => Some(Trigger::PauseToggle),
        InputEvent::Key(_) => None,
        InputEvent::PointerDown => Some(Trigger::Flap),
        InputEvent::Button(action) => Some(action.trigger()),
        InputEvent::Hidden | InputEvent::Blur => {
            (phase == GamePhase::Running).then_some(Trigger::PauseToggle)
        }
    }
}
