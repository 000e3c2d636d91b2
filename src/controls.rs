//! Input mapping
//!
//! Translates raw key names and canvas taps into game actions. The browser
//! glue only dispatches; which input does what in which phase lives here.

use crate::sim::GamePhase;

/// Something a key press asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Jump,
    FastDescend,
    /// Start from the menu or restart after game over
    Start,
    Menu,
    ToggleMusic,
    ToggleSfx,
    ToggleFps,
    ToggleReducedMotion,
    ToggleIdle,
    VolumeUp,
    VolumeDown,
}

impl KeyAction {
    /// Keys the page would otherwise scroll on
    pub fn blocks_default(&self) -> bool {
        matches!(self, KeyAction::Jump | KeyAction::FastDescend)
    }
}

/// Map a `KeyboardEvent.key` value to an action
///
/// Auto-repeat events only keep fast-descend alive; every other action
/// needs a fresh press, so holding Space cannot burn the double jump.
pub fn key_action(key: &str, repeat: bool) -> Option<KeyAction> {
    let action = match key {
        " " | "ArrowUp" | "w" | "W" => KeyAction::Jump,
        "ArrowDown" | "s" | "S" => KeyAction::FastDescend,
        "Enter" => KeyAction::Start,
        "Escape" => KeyAction::Menu,
        "m" | "M" => KeyAction::ToggleMusic,
        "x" | "X" => KeyAction::ToggleSfx,
        "f" | "F" => KeyAction::ToggleFps,
        "r" | "R" => KeyAction::ToggleReducedMotion,
        "i" | "I" => KeyAction::ToggleIdle,
        "+" | "=" => KeyAction::VolumeUp,
        "-" | "_" => KeyAction::VolumeDown,
        _ => return None,
    };

    if repeat && action != KeyAction::FastDescend {
        return None;
    }
    Some(action)
}

/// What a tap or click on the canvas does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction {
    Jump,
    Start,
    Ignore,
}

/// Canvas taps jump during a run and start one from the menu
///
/// They are ignored on the game over screen so a late tap does not skip
/// the final score; restarting there takes the button or Enter.
pub fn tap_action(phase: GamePhase) -> TapAction {
    match phase {
        GamePhase::Playing => TapAction::Jump,
        GamePhase::Menu => TapAction::Start,
        GamePhase::GameOver => TapAction::Ignore,
    }
}
