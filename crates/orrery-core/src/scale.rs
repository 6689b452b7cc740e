//! Presentation scale curves
//!
//! Real distances and radii span too many orders of magnitude to draw
//! directly, so they are compressed with fixed power curves. Every curve is
//! monotonic; none is ever inverted.

use crate::constants::*;

/// Orbital distance to scene units: `d^0.4`, or 0 for non-positive input.
pub fn normalized_distance(distance: f64) -> f64 {
    if distance <= 0.0 {
        return 0.0;
    }
    distance.powf(DISTANCE_EXPONENT)
}

/// Physical radius to sphere mesh radius.
pub fn visual_radius(radius: f64) -> f64 {
    if radius <= 0.0 {
        return 0.0;
    }
    radius.sqrt() / MESH_RADIUS_DIVISOR
}

/// Physical radius to the ring/glow scale used around a body.
pub fn normalized_radius(radius: f64) -> f64 {
    if radius <= 0.0 {
        return MIN_NORMALIZED_RADIUS;
    }
    radius.powf(RADIUS_EXPONENT) / RADIUS_DIVISOR
}

/// Inner and outer ring extents around a planet of the given radius.
pub fn ring_extents(planet_radius: f64) -> (f64, f64) {
    let base = normalized_radius(planet_radius);
    (base * RING_INNER_FACTOR, base * RING_OUTER_FACTOR)
}
