//! Cross-check of composed satellite positions
//!
//! The scene graph places a moon purely by concatenating frames. These
//! helpers recompute the same position directly from the kinematics and
//! report the disagreement, which should stay at rounding level.

use crate::error::{SceneError, SceneResult};
use crate::kinematics::revolution_angle;
use crate::system::SolarSystem;
use glam::{DQuat, DVec3};
use orrery_core::normalized_distance;
use std::collections::HashMap;

/// Composed vs. directly computed position for one body at one instant
#[derive(Debug, Clone)]
pub struct ValidationPoint {
    pub body: String,
    pub days: f64,
    pub composed: DVec3,
    pub expected: DVec3,
    pub error: f64,
}

/// Check one moon at `days`.
///
/// Expected position: the parent's world position plus the moon's own
/// offset turned by its own revolution angle, in its own inclined plane,
/// oriented by the parent's orbital frame.
pub fn validate_body(system: &mut SolarSystem, name: &str, days: f64) -> SceneResult<ValidationPoint> {
    let catalog = system.catalog();
    let moon = catalog
        .get(name)
        .ok_or_else(|| SceneError::UnknownBody(name.to_string()))?
        .clone();
    let planet = catalog
        .parent_of(&moon)
        .filter(|p| catalog.depth_of(&p.name) == Some(1))
        .ok_or_else(|| SceneError::NotASatellite(name.to_string()))?
        .clone();
    if !system.revolves(name) {
        return Err(SceneError::Frozen(name.to_string()));
    }

    system.update(days);

    let composed = system
        .body_position(name)
        .ok_or_else(|| SceneError::UnknownBody(name.to_string()))?;
    let planet_pos = system
        .body_position(&planet.name)
        .ok_or_else(|| SceneError::UnknownBody(planet.name.clone()))?;

    let planet_frame = match revolution_angle(&planet, days).filter(|_| system.revolves(&planet.name)) {
        Some(angle) => DQuat::from_rotation_y(angle),
        None => DQuat::IDENTITY,
    };
    let planet_frame = DQuat::from_rotation_x(planet.orbital_inclination.to_radians()) * planet_frame;
    let moon_angle = revolution_angle(&moon, days).unwrap_or(0.0);

    let layout = system.layout();
    let offset = DVec3::new(
        normalized_distance(moon.distance) * layout.moon_distance_scale,
        layout.moon_orbit_lift,
        0.0,
    );
    let in_plane = DQuat::from_rotation_x(moon.orbital_inclination.to_radians())
        * (DQuat::from_rotation_y(moon_angle) * offset);
    let expected = planet_pos + planet_frame * in_plane;

    Ok(ValidationPoint {
        body: name.to_string(),
        days,
        error: (composed - expected).length(),
        composed,
        expected,
    })
}

/// Check every revolving moon at `samples` instants spread over `span_days`
pub fn validate_range(system: &mut SolarSystem, span_days: f64, samples: usize) -> Vec<ValidationPoint> {
    let moons: Vec<String> = system
        .catalog()
        .iter()
        .filter(|b| b.kind.is_focusable() && system.catalog().depth_of(&b.name) == Some(2))
        .map(|b| b.name.clone())
        .collect();

    let mut results = Vec::new();
    let step = if samples > 1 { span_days / (samples - 1) as f64 } else { 0.0 };

    for i in 0..samples {
        let days = step * i as f64;
        for name in &moons {
            match validate_body(system, name, days) {
                Ok(point) => results.push(point),
                Err(e) => tracing::debug!("Skipping {}: {}", name, e),
            }
        }
    }

    results
}

/// Summary statistics for one body
#[derive(Debug)]
pub struct ValidationSummary {
    pub body: String,
    pub num_points: usize,
    pub mean_error: f64,
    pub max_error: f64,
}

/// Compute summary statistics per body, sorted by name
pub fn summarize_validation(results: &[ValidationPoint]) -> Vec<ValidationSummary> {
    let mut by_body: HashMap<&str, Vec<&ValidationPoint>> = HashMap::new();

    for point in results {
        by_body.entry(point.body.as_str()).or_default().push(point);
    }

    let mut summary: Vec<_> = by_body
        .into_iter()
        .map(|(body, points)| {
            let n = points.len();
            let mean_error = points.iter().map(|p| p.error).sum::<f64>() / n as f64;
            let max_error = points.iter().map(|p| p.error).fold(0.0, f64::max);

            ValidationSummary {
                body: body.to_string(),
                num_points: n,
                mean_error,
                max_error,
            }
        })
        .collect();
    summary.sort_by(|a, b| a.body.cmp(&b.body));
    summary
}
