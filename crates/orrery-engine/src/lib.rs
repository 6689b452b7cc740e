//! Camera focus controller and frame driver for the orrery
//!
//! The renderer is not part of this crate. It receives a [`FrameSnapshot`]
//! per frame through the [`RenderSink`] trait and sends user input back as
//! [`InputEvent`] values.

pub mod camera;
pub mod config;
pub mod cycle;
pub mod driver;
pub mod error;
pub mod focus;
pub mod frame;
pub mod input;

pub use camera::{CameraPose, OrbitControls};
pub use config::{CameraConfig, ClockConfig, OrreryConfig, FOCUS_TIME_SCALE};
pub use cycle::{FocusCycle, OVERVIEW_LABEL};
pub use driver::Orrery;
pub use error::{EngineError, EngineResult};
pub use focus::{CameraController, CameraMode, FocusFrame, FocusLookup, FocusOutcome, FocusState, Lock, Transition};
pub use frame::{CameraSnapshot, FocusSnapshot, FrameSnapshot, JsonLinesSink, RenderSink};
pub use input::{apply_input, parse_input, InputEvent};
