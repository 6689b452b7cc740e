//! Camera focus controller
//!
//! A per-frame state machine that eases the camera onto a moving body,
//! rides along with it once there, and eases back to the overview pose.
//!
//! ```text
//!   Idle ──set(Some)──▶ Transitioning(Some) ──arrive──▶ Locked
//!    ▲                     │  ▲                          │
//!    └──arrive── Transitioning(None) ◀──set(None)────────┘
//! ```
//!
//! Any target change restarts the transition from wherever the camera is, so
//! setting a new target is the only cancellation there is.

use crate::camera::{CameraPose, OrbitControls};
use crate::config::CameraConfig;
use glam::{DQuat, DVec3};
use orrery_sim::{shortest_delta, SolarSystem};
use serde::Serialize;

/// What the controller needs to know about a body in the current frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusFrame {
    pub position: DVec3,
    pub orientation: DQuat,
    pub bounding_radius: f64,
    /// Spin angle wrapped into (-π, π], `None` for bodies that do not spin
    pub self_rotation: Option<f64>,
}

/// Body lookup used by the controller
pub trait FocusLookup {
    /// Whether the camera may focus on `name` at all
    fn is_traversable(&self, name: &str) -> bool;

    /// The body's world state as of the last hierarchy update
    fn focus_frame(&self, name: &str) -> Option<FocusFrame>;
}

impl FocusLookup for SolarSystem {
    fn is_traversable(&self, name: &str) -> bool {
        self.catalog().is_traversable(name)
    }

    fn focus_frame(&self, name: &str) -> Option<FocusFrame> {
        self.body_state(name).map(|s| FocusFrame {
            position: s.position,
            orientation: s.orientation,
            bounding_radius: s.bounding_radius,
            self_rotation: s.self_rotation,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// `None` when heading back to the overview
    pub target: Option<String>,
    pub goal_target: DVec3,
    pub goal_camera: DVec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Lock {
    pub target: String,
    pub previous_spin: Option<f64>,
    /// The body stopped resolving; reported once
    lost: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FocusState {
    Idle,
    Transitioning(Transition),
    Locked(Lock),
}

/// Coarse view of [`FocusState`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraMode {
    Idle,
    Transitioning,
    Locked,
}

/// Result of a target request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusOutcome {
    /// A transition began from rest
    Started,
    /// An in-flight transition was replaced
    Retargeted,
    /// Already heading to or locked on that target
    Unchanged,
    /// Unknown or non-traversable body; nothing changed
    Rejected,
}

pub struct CameraController {
    config: CameraConfig,
    state: FocusState,
    pose: CameraPose,
    controls: OrbitControls,
}

impl CameraController {
    pub fn new(config: CameraConfig) -> Self {
        let pose = CameraPose::new(config.default_position, config.default_target);
        let mut controls = OrbitControls::new()
            .with_distance_limits(config.min_distance, config.max_distance);
        controls.rotate_speed = config.rotate_speed;

        Self {
            config,
            state: FocusState::Idle,
            pose,
            controls,
        }
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    pub fn mode(&self) -> CameraMode {
        match self.state {
            FocusState::Idle => CameraMode::Idle,
            FocusState::Transitioning(_) => CameraMode::Transitioning,
            FocusState::Locked(_) => CameraMode::Locked,
        }
    }

    /// Body the camera is heading to or locked on
    pub fn target(&self) -> Option<&str> {
        match &self.state {
            FocusState::Idle => None,
            FocusState::Transitioning(t) => t.target.as_deref(),
            FocusState::Locked(l) => Some(&l.target),
        }
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Whether user input currently reaches the camera
    pub fn controls_enabled(&self) -> bool {
        self.controls.enabled
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    /// Request focus on `target`, or the overview for `None`
    pub fn set_focus_target(&mut self, lookup: &impl FocusLookup, target: Option<&str>) -> FocusOutcome {
        if let Some(name) = target {
            if !lookup.is_traversable(name) {
                tracing::debug!("Focus request for {:?} rejected", name);
                return FocusOutcome::Rejected;
            }
        }

        let unchanged = match &self.state {
            FocusState::Idle => target.is_none(),
            FocusState::Transitioning(t) => t.target.as_deref() == target,
            FocusState::Locked(l) => target == Some(l.target.as_str()),
        };
        if unchanged {
            return FocusOutcome::Unchanged;
        }

        let outcome = match self.state {
            FocusState::Transitioning(_) => FocusOutcome::Retargeted,
            _ => FocusOutcome::Started,
        };

        let (goal_target, goal_camera) = match target {
            Some(name) => lookup
                .focus_frame(name)
                .map(|f| self.focus_goal(&f))
                .unwrap_or((self.pose.target, self.pose.position)),
            None => (self.config.default_target, self.config.default_position),
        };

        tracing::debug!("Focus {:?} -> {:?} ({:?})", self.target(), target, outcome);
        self.state = FocusState::Transitioning(Transition {
            target: target.map(str::to_string),
            goal_target,
            goal_camera,
        });
        self.controls.enabled = false;
        outcome
    }

    /// Advance one frame. Call after the hierarchy has been updated.
    pub fn update(&mut self, lookup: &impl FocusLookup) {
        let state = std::mem::replace(&mut self.state, FocusState::Idle);
        self.state = match state {
            FocusState::Idle => {
                self.controls.apply(&mut self.pose);
                FocusState::Idle
            }
            FocusState::Transitioning(transition) => self.step_transition(lookup, transition),
            FocusState::Locked(lock) => self.step_locked(lookup, lock),
        };
    }

    fn step_transition(&mut self, lookup: &impl FocusLookup, mut transition: Transition) -> FocusState {
        // Controls are disabled here, so this only drops input queued mid-flight
        self.controls.apply(&mut self.pose);

        let factor = match &transition.target {
            Some(name) => {
                if let Some(frame) = lookup.focus_frame(name) {
                    let (goal_target, goal_camera) = self.focus_goal(&frame);
                    transition.goal_target = goal_target;
                    transition.goal_camera = goal_camera;
                }
                self.config.focus_lerp
            }
            None => self.config.unfocus_lerp,
        };

        self.pose.target = self.pose.target.lerp(transition.goal_target, factor);
        self.pose.position = self.pose.position.lerp(transition.goal_camera, factor);

        let threshold = self.config.completion_threshold;
        let arrived = self.pose.target.distance(transition.goal_target) < threshold
            && self.pose.position.distance(transition.goal_camera) < threshold;
        if !arrived {
            return FocusState::Transitioning(transition);
        }

        self.pose = CameraPose::new(transition.goal_camera, transition.goal_target);
        self.controls.enabled = true;

        match transition.target {
            Some(target) => {
                tracing::info!("Camera locked on {}", target);
                let previous_spin = lookup.focus_frame(&target).and_then(|f| f.self_rotation);
                FocusState::Locked(Lock {
                    target,
                    previous_spin,
                    lost: false,
                })
            }
            None => {
                tracing::info!("Camera back at overview");
                FocusState::Idle
            }
        }
    }

    fn step_locked(&mut self, lookup: &impl FocusLookup, mut lock: Lock) -> FocusState {
        let Some(frame) = lookup.focus_frame(&lock.target) else {
            if !lock.lost {
                tracing::warn!("Locked body {} no longer resolves; camera is free", lock.target);
                lock.lost = true;
            }
            self.controls.apply(&mut self.pose);
            return FocusState::Locked(lock);
        };
        lock.lost = false;

        self.pose.carry_to(frame.position);
        self.controls.apply(&mut self.pose);

        if let (Some(previous), Some(current)) = (lock.previous_spin, frame.self_rotation) {
            let delta = shortest_delta(previous, current);
            self.pose.orbit_y(delta * self.config.follow_factor);
        }
        lock.previous_spin = frame.self_rotation;

        FocusState::Locked(lock)
    }

    /// Pivot and camera goal for a body: above and behind it in its own frame
    fn focus_goal(&self, frame: &FocusFrame) -> (DVec3, DVec3) {
        let r = frame.bounding_radius;
        let offset = DVec3::new(0.0, r * 0.5, (r * 3.0).max(1.0));
        (frame.position, frame.position + frame.orientation * offset)
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}
