//! Camera pose and user orbit controls
//!
//! The pose is a position looking at a pivot. Orbit controls turn and dolly
//! the position around that pivot; the focus controller owns the `enabled`
//! flag while it is steering the camera itself.

use crate::config::CameraConfig;
use glam::{DQuat, DVec3};
use serde::Serialize;
use std::f64::consts::PI;

/// Camera position and the pivot it looks at
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CameraPose {
    pub position: DVec3,
    pub target: DVec3,
}

impl CameraPose {
    pub fn new(position: DVec3, target: DVec3) -> Self {
        Self { position, target }
    }

    /// Vector from the pivot to the camera
    pub fn offset(&self) -> DVec3 {
        self.position - self.target
    }

    pub fn distance(&self) -> f64 {
        self.offset().length()
    }

    /// Move the pivot, carrying the camera along by the same displacement
    pub fn carry_to(&mut self, target: DVec3) {
        self.position += target - self.target;
        self.target = target;
    }

    /// Turn the camera about the world Y axis through the pivot
    pub fn orbit_y(&mut self, angle: f64) {
        self.position = self.target + DQuat::from_rotation_y(angle) * self.offset();
    }
}

/// The configured default view
impl Default for CameraPose {
    fn default() -> Self {
        let config = CameraConfig::default();
        Self::new(config.default_position, config.default_target)
    }
}

/// Orbit-style user controls around the pose pivot
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub enabled: bool,
    /// Radians per unit of pointer movement
    pub rotate_speed: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pending_yaw: f64,
    pending_pitch: f64,
    pending_zoom: f64,
}

impl OrbitControls {
    pub fn new() -> Self {
        Self {
            enabled: true,
            rotate_speed: 0.005,
            min_distance: 0.1,
            max_distance: 200.0,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 1.0,
        }
    }

    pub fn with_distance_limits(mut self, min_distance: f64, max_distance: f64) -> Self {
        self.min_distance = min_distance;
        self.max_distance = max_distance;
        self
    }

    /// Queue a pointer drag
    pub fn rotate(&mut self, dx: f64, dy: f64) {
        self.pending_yaw -= dx * self.rotate_speed;
        self.pending_pitch -= dy * self.rotate_speed;
    }

    /// Queue a scroll step; positive deltas zoom in
    pub fn zoom(&mut self, delta: f64) {
        if delta == 0.0 {
            return;
        }
        // Exponential zoom - multiply distance by factor
        let factor = if delta > 0.0 { 0.85 } else { 1.18 };
        self.pending_zoom *= factor;
    }

    pub fn has_pending(&self) -> bool {
        self.pending_yaw != 0.0 || self.pending_pitch != 0.0 || self.pending_zoom != 1.0
    }

    /// Apply queued input to `pose`. Input queued while disabled is dropped.
    /// Returns whether the pose changed.
    pub fn apply(&mut self, pose: &mut CameraPose) -> bool {
        let (yaw, pitch, zoom) = (self.pending_yaw, self.pending_pitch, self.pending_zoom);
        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
        self.pending_zoom = 1.0;

        if !self.enabled || (yaw == 0.0 && pitch == 0.0 && zoom == 1.0) {
            return false;
        }

        let offset = pose.offset();
        let radius = offset.length();
        if radius <= f64::EPSILON {
            return false;
        }

        // Spherical coordinates about +Y, polar angle kept off the poles
        let mut azimuth = offset.x.atan2(offset.z);
        let mut polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
        azimuth += yaw;
        polar = (polar + pitch).clamp(0.01, PI - 0.01);
        let radius = (radius * zoom).clamp(self.min_distance, self.max_distance);

        pose.position = pose.target
            + DVec3::new(
                radius * polar.sin() * azimuth.sin(),
                radius * polar.cos(),
                radius * polar.sin() * azimuth.cos(),
            );
        true
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}
