//! Runtime configuration
//!
//! Every section defaults to the values the orrery ships with, so a config
//! file only needs the fields it changes.

use crate::error::{EngineError, EngineResult};
use glam::DVec3;
use hifitime::Epoch;
use orrery_sim::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    pub clock: ClockConfig,
    pub camera: CameraConfig,
    pub layout: LayoutConfig,
}

impl OrreryConfig {
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> EngineResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Days per second slow enough for the focus lerp to catch a spinning
/// planet's goal. At the default of 1.0 fast rotators like Jupiter carry the
/// goal away faster than the camera closes in, so the lock never happens.
pub const FOCUS_TIME_SCALE: f64 = 0.01;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Simulated days per real second
    pub time_scale: f64,
    /// Calendar date of day zero, in any format hifitime parses
    pub start_epoch: String,
    pub paused: bool,
}

impl ClockConfig {
    pub fn epoch(&self) -> EngineResult<Epoch> {
        Epoch::from_str(self.start_epoch.trim()).map_err(|e| EngineError::InvalidEpoch {
            value: self.start_epoch.clone(),
            reason: e.to_string(),
        })
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            start_epoch: "2000-01-01T12:00:00 UTC".to_string(),
            paused: false,
        }
    }
}

/// Focus controller tuning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Per-frame interpolation factor towards a body
    pub focus_lerp: f64,
    /// Per-frame interpolation factor back to the overview
    pub unfocus_lerp: f64,
    /// Distance under which a transition snaps and completes
    pub completion_threshold: f64,
    pub default_position: DVec3,
    pub default_target: DVec3,
    /// Share of a locked body's spin the camera follows
    pub follow_factor: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pub rotate_speed: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            focus_lerp: 0.08,
            unfocus_lerp: 0.05,
            completion_threshold: 0.1,
            default_position: DVec3::new(0.0, 10.0, 25.0),
            default_target: DVec3::ZERO,
            follow_factor: 0.1,
            min_distance: 0.1,
            max_distance: 200.0,
            rotate_speed: 0.005,
        }
    }
}
