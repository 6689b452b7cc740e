//! Input event protocol

use crate::driver::Orrery;
use crate::focus::FocusOutcome;
use serde::{Deserialize, Serialize};

/// Input event from the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputEvent {
    /// Pointer drag (delta)
    MouseMove { dx: f64, dy: f64 },

    /// Mouse scroll (for zoom)
    Scroll { delta: f64 },

    /// Key press/release
    Key { code: String, pressed: bool },

    /// Set simulated days per real second
    SetTimeScale { scale: f64 },

    /// Focus on a body, or the overview when `target` is absent
    Focus {
        #[serde(default)]
        target: Option<String>,
    },

    FocusNext,

    FocusPrevious,

    TogglePause,
}

/// Parse input event from JSON
pub fn parse_input(json: &str) -> Result<InputEvent, serde_json::Error> {
    serde_json::from_str(json)
}

/// Apply an input event. Pointer input is queued for the next frame; focus
/// changes report their outcome.
pub fn apply_input(orrery: &mut Orrery, event: InputEvent) -> Option<FocusOutcome> {
    match event {
        InputEvent::MouseMove { dx, dy } => {
            orrery.camera_mut().controls_mut().rotate(dx, dy);
            None
        }

        InputEvent::Scroll { delta } => {
            orrery.camera_mut().controls_mut().zoom(delta);
            None
        }

        InputEvent::Key { code, pressed } => {
            if !pressed {
                return None;
            }
            match code.as_str() {
                "KeyP" | "Space" => {
                    orrery.toggle_pause();
                    None
                }
                "Comma" => {
                    orrery.set_time_scale(orrery.time_scale() * 0.5);
                    None
                }
                "Period" => {
                    orrery.set_time_scale(orrery.time_scale() * 2.0);
                    None
                }
                "BracketLeft" => Some(orrery.focus_previous()),
                "BracketRight" => Some(orrery.focus_next()),
                "Escape" => Some(orrery.set_focus_target(None)),
                _ => None,
            }
        }

        InputEvent::SetTimeScale { scale } => {
            orrery.set_time_scale(scale);
            None
        }

        InputEvent::Focus { target } => Some(orrery.set_focus_target(target.as_deref())),

        InputEvent::FocusNext => Some(orrery.focus_next()),

        InputEvent::FocusPrevious => Some(orrery.focus_previous()),

        InputEvent::TogglePause => {
            orrery.toggle_pause();
            None
        }
    }
}
