//! Static data shared by the simulation and the camera: the body catalog,
//! the presentation scale curves and catalog errors.

pub mod catalog;
pub mod constants;
pub mod error;
pub mod scale;

#[cfg(test)]
mod tests;

pub use catalog::{BodyKind, Catalog, CelestialBody};
pub use error::{CatalogError, CatalogResult};
pub use scale::{normalized_distance, normalized_radius, ring_extents, visual_radius};
