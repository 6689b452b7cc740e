//! Solar system transform hierarchy
//!
//! Every body gets a chain of frames in the scene graph, outer to inner:
//!
//! 1. inclination (static, about X)
//! 2. revolution (dynamic, about Y)
//! 3. tilt (static, about Z, offset to the orbital distance)
//! 4. mesh (dynamic self-rotation about Y)
//!
//! Moons build the same chain inside their planet's revolution frame,
//! anchored at the planet's position there, so a moon's world position comes
//! out of the parent-to-child concatenation alone. Nothing here computes a
//! world coordinate by hand.

use crate::error::{SceneError, SceneResult};
use crate::kinematics::{wrap_angle, BodyAngles};
use crate::scene_graph::{NodeId, NodeRole, SceneGraph, Transform};
use glam::{DQuat, DVec3};
use orrery_core::{normalized_distance, ring_extents, visual_radius, BodyKind, Catalog, CelestialBody};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Presentation tweaks for moon orbits
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Extra factor on a moon's normalized distance
    pub moon_distance_scale: f64,
    /// Height of a moon above its planet's orbital plane
    pub moon_orbit_lift: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            moon_distance_scale: 1.0,
            moon_orbit_lift: 0.0,
        }
    }
}

/// Scene graph nodes owned by one body
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BodyHandles {
    pub inclination: Option<NodeId>,
    pub revolution: Option<NodeId>,
    pub tilt: Option<NodeId>,
    /// The body's own node (mesh, or ring plane for rings)
    pub mesh: NodeId,
}

#[derive(Clone, Debug)]
struct BodyEntry {
    body: usize,
    handles: BodyHandles,
    /// Revolution frame is driven by the clock
    revolves: bool,
    spins: bool,
    angles: BodyAngles,
}

/// Resolved world state of one body
#[derive(Clone, Debug, Serialize)]
pub struct BodyState {
    pub name: String,
    pub kind: BodyKind,
    pub position: DVec3,
    pub orientation: DQuat,
    /// Radius of the drawn sphere, or the ring's outer edge
    pub bounding_radius: f64,
    /// Current spin angle wrapped into (-π, π]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revolution: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ring_extents: Option<[f64; 2]>,
}

/// Every body's state at one instant
#[derive(Clone, Debug, Serialize)]
pub struct SystemSnapshot {
    pub days: f64,
    pub bodies: Vec<BodyState>,
}

/// Catalog plus the scene graph that places each body in world space
pub struct SolarSystem {
    catalog: Catalog,
    layout: LayoutConfig,
    graph: SceneGraph,
    root: NodeId,
    entries: Vec<BodyEntry>,
    registry: HashMap<String, usize>,
    days: f64,
}

impl SolarSystem {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_layout(catalog, LayoutConfig::default())
    }

    /// Build the static frames for every body and pose it at t = 0
    pub fn with_layout(catalog: Catalog, layout: LayoutConfig) -> Self {
        let mut graph = SceneGraph::new();
        let root = graph.push(NodeRole::Root, None, Transform::IDENTITY);

        let mut system = Self {
            catalog,
            layout,
            graph,
            root,
            entries: Vec::new(),
            registry: HashMap::new(),
            days: 0.0,
        };
        system.build();
        system.update(0.0);

        tracing::info!(
            "Solar system built: {} bodies, {} transform nodes",
            system.entries.len(),
            system.graph.len()
        );
        system
    }

    fn build(&mut self) {
        let star = self.star_index();
        let mesh = self.graph.push(NodeRole::Mesh, Some(self.root), Transform::IDENTITY);
        self.register(star, BodyHandles {
            inclination: None,
            revolution: None,
            tilt: None,
            mesh,
        }, false);

        // Parents before children: planets, then moons, then rings
        let planets: Vec<usize> = self.indices_where(|c, b| {
            b.kind != BodyKind::Star && b.kind != BodyKind::Ring && c.depth_of(&b.name) == Some(1)
        });
        for i in planets {
            self.build_planet(i);
        }

        let moons: Vec<usize> = self.indices_where(|c, b| {
            b.kind != BodyKind::Ring && c.depth_of(&b.name) == Some(2)
        });
        for i in moons {
            self.build_moon(i);
        }

        let rings: Vec<usize> = self.indices_where(|_, b| b.kind == BodyKind::Ring);
        for i in rings {
            self.build_ring(i);
        }
    }

    fn build_planet(&mut self, i: usize) {
        let body = self.catalog.bodies()[i].clone();
        let parent_known = match body.orbits.as_deref() {
            Some(parent) => self.catalog.contains(parent),
            None => true,
        };
        if !parent_known {
            tracing::warn!(
                "{} orbits unknown body {:?}; revolution frozen",
                body.name,
                body.orbits
            );
        }

        let offset = DVec3::new(normalized_distance(body.distance), 0.0, 0.0);
        let revolves = parent_known && self.check_period(&body);
        let handles = self.push_chain(&body, self.root, DVec3::ZERO, offset);
        self.register(i, handles, revolves);
    }

    fn build_moon(&mut self, i: usize) {
        let body = self.catalog.bodies()[i].clone();
        let parent = self
            .catalog
            .parent_of(&body)
            .and_then(|p| self.registry.get(&p.name).map(|&e| (p.clone(), e)));

        let Some((parent, parent_entry)) = parent else {
            tracing::warn!("{} has no built parent; placing it at the root, frozen", body.name);
            let offset = DVec3::new(normalized_distance(body.distance), 0.0, 0.0);
            let handles = self.push_chain(&body, self.root, DVec3::ZERO, offset);
            self.register(i, handles, false);
            return;
        };

        let Some(frame) = self.entries[parent_entry].handles.revolution else {
            tracing::warn!("{} orbits {}, which has no orbit frame; frozen", body.name, parent.name);
            let anchor = self.graph.world(self.entries[parent_entry].handles.mesh).translation;
            let offset = DVec3::new(normalized_distance(body.distance), 0.0, 0.0);
            let handles = self.push_chain(&body, self.root, anchor, offset);
            self.register(i, handles, false);
            return;
        };

        // The moon's orbit is centred where the planet sits in its own revolution frame
        let anchor = DVec3::new(normalized_distance(parent.distance), 0.0, 0.0);
        let offset = DVec3::new(
            normalized_distance(body.distance) * self.layout.moon_distance_scale,
            self.layout.moon_orbit_lift,
            0.0,
        );
        let revolves = self.check_period(&body);
        let handles = self.push_chain(&body, frame, anchor, offset);
        self.register(i, handles, revolves);
    }

    fn build_ring(&mut self, i: usize) {
        let body = self.catalog.bodies()[i].clone();
        let planet = self
            .catalog
            .parent_of(&body)
            .filter(|p| p.kind != BodyKind::Star)
            .and_then(|p| self.registry.get(&p.name).map(|&e| (p.clone(), e)));

        let (frame, local) = match planet {
            Some((planet, entry)) => {
                let frame = self.entries[entry].handles.revolution.unwrap_or(self.root);
                let local = Transform::new(
                    DVec3::new(normalized_distance(planet.distance), 0.0, 0.0),
                    DQuat::from_rotation_z(planet.axial_tilt.to_radians()),
                );
                (frame, local)
            }
            None => (self.root, Transform::IDENTITY),
        };

        let mesh = self.graph.push(NodeRole::Ring, Some(frame), local);
        self.register(i, BodyHandles {
            inclination: None,
            revolution: None,
            tilt: None,
            mesh,
        }, false);
    }

    /// Inclination -> revolution -> tilt -> mesh under `parent`
    fn push_chain(&mut self, body: &CelestialBody, parent: NodeId, anchor: DVec3, offset: DVec3) -> BodyHandles {
        let inclination = self.graph.push(
            NodeRole::Inclination,
            Some(parent),
            Transform::new(anchor, DQuat::from_rotation_x(body.orbital_inclination.to_radians())),
        );
        let revolution = self.graph.push(NodeRole::Revolution, Some(inclination), Transform::IDENTITY);
        let tilt = self.graph.push(
            NodeRole::Tilt,
            Some(revolution),
            Transform::new(offset, DQuat::from_rotation_z(body.axial_tilt.to_radians())),
        );
        let mesh = self.graph.push(NodeRole::Mesh, Some(tilt), Transform::IDENTITY);

        BodyHandles {
            inclination: Some(inclination),
            revolution: Some(revolution),
            tilt: Some(tilt),
            mesh,
        }
    }

    fn check_period(&self, body: &CelestialBody) -> bool {
        match body.period {
            Some(p) if p > 0.0 => true,
            Some(p) => {
                tracing::warn!("{} declares period {}; revolution frozen", body.name, p);
                false
            }
            None => false,
        }
    }

    fn register(&mut self, body: usize, handles: BodyHandles, revolves: bool) {
        let record = &self.catalog.bodies()[body];
        let spins = record.spins() && record.kind != BodyKind::Ring;
        self.registry.insert(record.name.clone(), self.entries.len());
        self.entries.push(BodyEntry {
            body,
            handles,
            revolves,
            spins,
            angles: BodyAngles::default(),
        });
    }

    fn star_index(&self) -> usize {
        self.catalog
            .bodies()
            .iter()
            .position(|b| b.kind == BodyKind::Star)
            .unwrap_or(0)
    }

    fn indices_where(&self, pred: impl Fn(&Catalog, &CelestialBody) -> bool) -> Vec<usize> {
        self.catalog
            .bodies()
            .iter()
            .enumerate()
            .filter(|(_, b)| pred(&self.catalog, b))
            .map(|(i, _)| i)
            .collect()
    }

    /// Re-derive every dynamic node from `days` and recompose world transforms
    pub fn update(&mut self, days: f64) {
        self.days = days;

        for entry in &mut self.entries {
            let body = &self.catalog.bodies()[entry.body];
            entry.angles = BodyAngles::at(body, days);

            if entry.revolves {
                if let (Some(node), Some(angle)) = (entry.handles.revolution, entry.angles.revolution) {
                    self.graph.set_rotation(node, DQuat::from_rotation_y(angle));
                }
            }
            if entry.spins {
                if let Some(angle) = entry.angles.self_rotation {
                    self.graph.set_rotation(entry.handles.mesh, DQuat::from_rotation_y(angle));
                }
            }
        }

        self.graph.propagate();
    }

    /// Simulated days of the last update
    pub fn days(&self) -> f64 {
        self.days
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Node handles for a body, by value
    pub fn handles(&self, name: &str) -> Option<BodyHandles> {
        self.registry.get(name).map(|&e| self.entries[e].handles)
    }

    /// Whether the body's revolution frame is driven by the clock
    pub fn revolves(&self, name: &str) -> bool {
        self.registry.get(name).map(|&e| self.entries[e].revolves).unwrap_or(false)
    }

    /// World position of a body's own node
    pub fn body_position(&self, name: &str) -> Option<DVec3> {
        self.handles(name).map(|h| self.graph.world(h.mesh).translation)
    }

    /// World transform of a body's own node
    pub fn body_transform(&self, name: &str) -> Option<Transform> {
        self.handles(name).map(|h| *self.graph.world(h.mesh))
    }

    pub fn body_state(&self, name: &str) -> Option<BodyState> {
        self.registry.get(name).map(|&e| self.state_of(&self.entries[e]))
    }

    /// Body state, failing with a typed error for unknown names
    pub fn require_state(&self, name: &str) -> SceneResult<BodyState> {
        self.body_state(name)
            .ok_or_else(|| SceneError::UnknownBody(name.to_string()))
    }

    fn state_of(&self, entry: &BodyEntry) -> BodyState {
        let body = &self.catalog.bodies()[entry.body];
        let world = self.graph.world(entry.handles.mesh);

        let ring = if body.kind == BodyKind::Ring {
            self.catalog.parent_of(body).map(|p| {
                let (inner, outer) = ring_extents(p.radius);
                [inner, outer]
            })
        } else {
            None
        };
        let bounding_radius = match ring {
            Some([_, outer]) => outer,
            None => visual_radius(body.radius),
        };

        BodyState {
            name: body.name.clone(),
            kind: body.kind,
            position: world.translation,
            orientation: world.rotation,
            bounding_radius,
            self_rotation: entry.angles.self_rotation.filter(|_| entry.spins).map(wrap_angle),
            revolution: entry.angles.revolution.filter(|_| entry.revolves),
            ring_extents: ring,
        }
    }

    /// State of every body, in build order
    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot {
            days: self.days,
            bodies: self.entries.iter().map(|e| self.state_of(e)).collect(),
        }
    }
}
