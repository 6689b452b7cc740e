//! Time, kinematics and the transform hierarchy of the orrery

pub mod clock;
pub mod error;
pub mod kinematics;
pub mod scene_graph;
pub mod system;
pub mod validation;

pub use clock::{j2000, rates, SimulationClock};
pub use error::{SceneError, SceneResult};
pub use kinematics::{revolution_angle, self_rotation_angle, shortest_delta, wrap_angle, BodyAngles};
pub use scene_graph::{NodeId, NodeRole, SceneGraph, Transform, TransformNode};
pub use system::{BodyHandles, BodyState, LayoutConfig, SolarSystem, SystemSnapshot};
pub use validation::{summarize_validation, validate_body, validate_range, ValidationPoint, ValidationSummary};
