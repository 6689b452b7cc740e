//! Celestial body catalog
//!
//! The catalog is loaded once and never mutated. Structural invariants
//! (a single star, unique names, an acyclic orbit tree no deeper than
//! star -> planet -> moon) are enforced here so that the kinematics and
//! hierarchy code never has to defend against them.

use crate::constants::MAX_ORBIT_DEPTH;
use crate::error::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Catalog shipped with the crate (star, planets, major moons, Saturn's ring)
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Body classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Star,
    Planet,
    Moon,
    Ring,
}

impl BodyKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Star => "star",
            Self::Planet => "planet",
            Self::Moon => "moon",
            Self::Ring => "ring",
        }
    }

    /// Kinds the camera is allowed to focus on
    pub fn is_focusable(&self) -> bool {
        !matches!(self, Self::Ring)
    }
}

/// One catalog record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelestialBody {
    pub name: String,
    #[serde(alias = "type")]
    pub kind: BodyKind,
    /// Physical radius (km), visual scale only
    pub radius: f64,
    /// Distance from the parent (million km)
    #[serde(default)]
    pub distance: f64,
    /// Orbital period (days)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<f64>,
    /// Rotation period (hours), negative for retrograde spin
    #[serde(default, alias = "daylength")]
    pub day_length: f64,
    /// Axial tilt (degrees)
    #[serde(default, alias = "tilt")]
    pub axial_tilt: f64,
    /// Tilt of the orbital plane (degrees)
    #[serde(default)]
    pub orbital_inclination: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbits: Option<String>,
    /// Revolution phase at t = 0 (degrees)
    #[serde(default, alias = "offset")]
    pub phase_offset: f64,
    #[serde(default = "default_traversable")]
    pub traversable: bool,
    #[serde(default, alias = "name_cn", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

fn default_traversable() -> bool {
    true
}

impl CelestialBody {
    /// Minimal record; remaining fields take their catalog defaults
    pub fn new(name: impl Into<String>, kind: BodyKind, radius: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            radius,
            distance: 0.0,
            period: None,
            day_length: 0.0,
            axial_tilt: 0.0,
            orbital_inclination: 0.0,
            orbits: None,
            phase_offset: 0.0,
            traversable: true,
            display_name: None,
        }
    }

    pub fn orbiting(mut self, parent: impl Into<String>, distance: f64, period: f64) -> Self {
        self.orbits = Some(parent.into());
        self.distance = distance;
        self.period = Some(period);
        self
    }

    pub fn with_day_length(mut self, hours: f64) -> Self {
        self.day_length = hours;
        self
    }

    pub fn with_axial_tilt(mut self, degrees: f64) -> Self {
        self.axial_tilt = degrees;
        self
    }

    pub fn with_inclination(mut self, degrees: f64) -> Self {
        self.orbital_inclination = degrees;
        self
    }

    pub fn with_phase_offset(mut self, degrees: f64) -> Self {
        self.phase_offset = degrees;
        self
    }

    pub fn with_traversable(mut self, traversable: bool) -> Self {
        self.traversable = traversable;
        self
    }

    /// Orbital period if the body actually revolves
    pub fn revolution_period(&self) -> Option<f64> {
        self.period.filter(|p| *p > 0.0)
    }

    pub fn spins(&self) -> bool {
        self.day_length != 0.0
    }

    pub fn is_traversable(&self) -> bool {
        self.traversable && self.kind.is_focusable()
    }

    /// Label for UI feedback
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    fn check_fields(&self) -> CatalogResult<()> {
        let invalid = |field: &'static str, value: f64| CatalogError::InvalidField {
            name: self.name.clone(),
            field,
            value,
        };

        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(invalid("radius", self.radius));
        }
        if self.radius == 0.0 && self.kind != BodyKind::Ring {
            return Err(invalid("radius", self.radius));
        }
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(invalid("distance", self.distance));
        }
        if let Some(period) = self.period {
            if !period.is_finite() {
                return Err(invalid("period", period));
            }
        }
        for (field, value) in [
            ("dayLength", self.day_length),
            ("axialTilt", self.axial_tilt),
            ("orbitalInclination", self.orbital_inclination),
            ("phaseOffset", self.phase_offset),
        ] {
            if !value.is_finite() {
                return Err(invalid(field, value));
            }
        }
        Ok(())
    }
}

/// Immutable, validated set of bodies in load order
#[derive(Clone, Debug)]
pub struct Catalog {
    bodies: Vec<CelestialBody>,
    index: HashMap<String, usize>,
    star: usize,
}

impl Catalog {
    /// Validate and index a list of bodies
    pub fn new(bodies: Vec<CelestialBody>) -> CatalogResult<Self> {
        let mut index = HashMap::with_capacity(bodies.len());
        let mut star: Option<usize> = None;

        for (i, body) in bodies.iter().enumerate() {
            body.check_fields()?;

            if index.insert(body.name.clone(), i).is_some() {
                return Err(CatalogError::DuplicateName(body.name.clone()));
            }

            if body.kind == BodyKind::Star {
                if let Some(existing) = star {
                    return Err(CatalogError::MultipleStars(
                        bodies[existing].name.clone(),
                        body.name.clone(),
                    ));
                }
                if body.orbits.is_some() {
                    return Err(CatalogError::OrbitingStar(body.name.clone()));
                }
                star = Some(i);
            }
        }

        let star = star.ok_or(CatalogError::MissingStar)?;
        let catalog = Self { bodies, index, star };

        for body in &catalog.bodies {
            let depth = catalog.walk_depth(body)?;
            if depth > MAX_ORBIT_DEPTH {
                return Err(CatalogError::TooDeep(body.name.clone()));
            }
            if let Some(parent) = body.orbits.as_deref() {
                if !catalog.index.contains_key(parent) {
                    tracing::warn!(
                        "{} orbits unknown body {}; it will not revolve",
                        body.name,
                        parent
                    );
                }
            }
        }

        tracing::debug!("Catalog loaded: {} bodies, star {}", catalog.len(), catalog.star().name);
        Ok(catalog)
    }

    /// Parse a JSON array of body records
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        let bodies: Vec<CelestialBody> = serde_json::from_str(json)?;
        Self::new(bodies)
    }

    pub fn load(path: &Path) -> CatalogResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Catalog embedded in the crate
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn to_json_pretty(&self) -> CatalogResult<String> {
        Ok(serde_json::to_string_pretty(&self.bodies)?)
    }

    pub fn star(&self) -> &CelestialBody {
        &self.bodies[self.star]
    }

    pub fn get(&self, name: &str) -> Option<&CelestialBody> {
        self.index.get(name).map(|&i| &self.bodies[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Known parent of a body; `None` for the star or a dangling reference
    pub fn parent_of(&self, body: &CelestialBody) -> Option<&CelestialBody> {
        body.orbits.as_deref().and_then(|p| self.get(p))
    }

    /// Bodies whose `orbits` names `parent`, in catalog order
    pub fn children_of<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a CelestialBody> + 'a {
        self.bodies
            .iter()
            .filter(move |b| b.orbits.as_deref() == Some(parent))
    }

    /// Levels below the star; bodies with a dangling or missing parent sit at level 1
    pub fn depth_of(&self, name: &str) -> Option<usize> {
        let body = self.get(name)?;
        self.walk_depth(body).ok()
    }

    /// Whether the camera may target `name`
    pub fn is_traversable(&self, name: &str) -> bool {
        self.get(name).map(CelestialBody::is_traversable).unwrap_or(false)
    }

    /// Traversable bodies in catalog order
    pub fn traversable(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter().filter(|b| b.is_traversable())
    }

    fn walk_depth(&self, body: &CelestialBody) -> CatalogResult<usize> {
        if body.kind == BodyKind::Star {
            return Ok(0);
        }

        let mut depth = 1;
        let mut current = body;
        while let Some(parent) = self.parent_of(current) {
            if parent.kind == BodyKind::Star {
                return Ok(depth);
            }
            depth += 1;
            // Any chain longer than the catalog itself must revisit a body
            if depth > self.bodies.len() {
                return Err(CatalogError::Cycle(body.name.clone()));
            }
            current = parent;
        }
        Ok(depth)
    }
}
