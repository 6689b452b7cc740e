//! Arena-backed transform tree
//!
//! Nodes live in a flat `Vec` and refer to their parent by index. A parent is
//! always pushed before its children, so world transforms can be recomposed
//! with a single forward pass and no recursion.

use glam::{DQuat, DVec3};
use std::ops::{Index, IndexMut};

/// Handle to a node in a [`SceneGraph`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node stands for in a body's frame chain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
    /// The star's frame
    Root,
    /// Static tilt of the orbital plane
    Inclination,
    /// Rotation about the parent, updated every frame
    Revolution,
    /// Static axial tilt, offset to the orbital distance
    Tilt,
    /// The body itself, spinning every frame
    Mesh,
    /// Static ring plane around a planet
    Ring,
}

impl NodeRole {
    pub fn is_dynamic(self) -> bool {
        matches!(self, Self::Revolution | Self::Mesh)
    }
}

/// Rigid transform: rotate, then translate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: DVec3,
    pub rotation: DQuat,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    pub fn from_translation(translation: DVec3) -> Self {
        Self { translation, rotation: DQuat::IDENTITY }
    }

    pub fn from_rotation(rotation: DQuat) -> Self {
        Self { translation: DVec3::ZERO, rotation }
    }

    pub fn new(translation: DVec3, rotation: DQuat) -> Self {
        Self { translation, rotation }
    }

    /// `self` applied after `local`, i.e. the world transform of a child
    pub fn compose(&self, local: &Transform) -> Transform {
        Transform {
            translation: self.translation + self.rotation * local.translation,
            rotation: (self.rotation * local.rotation).normalize(),
        }
    }

    /// Map a point from this transform's local frame to its parent's
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.translation + self.rotation * point
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Clone, Debug)]
pub struct TransformNode {
    pub role: NodeRole,
    pub parent: Option<NodeId>,
    pub local: Transform,
    world: Transform,
}

impl TransformNode {
    pub fn world(&self) -> &Transform {
        &self.world
    }
}

/// Flat tree of transform nodes
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<TransformNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append a node. The parent must already exist.
    pub fn push(&mut self, role: NodeRole, parent: Option<NodeId>, local: Transform) -> NodeId {
        debug_assert!(parent.map_or(true, |p| p.0 < self.nodes.len()));

        let world = match parent {
            Some(p) => self.nodes[p.0].world.compose(&local),
            None => local,
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(TransformNode { role, parent, local, world });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&TransformNode> {
        self.nodes.get(id.0)
    }

    pub fn set_rotation(&mut self, id: NodeId, rotation: DQuat) {
        self.nodes[id.0].local.rotation = rotation;
    }

    /// World transform as of the last [`SceneGraph::propagate`]
    pub fn world(&self, id: NodeId) -> &Transform {
        &self.nodes[id.0].world
    }

    /// Recompose every world transform from the local ones
    pub fn propagate(&mut self) {
        for i in 0..self.nodes.len() {
            let world = match self.nodes[i].parent {
                Some(p) => self.nodes[p.0].world.compose(&self.nodes[i].local),
                None => self.nodes[i].local,
            };
            self.nodes[i].world = world;
        }
    }

    /// Ancestor chain of a node, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id.0].parent, move |p| self.nodes[p.0].parent)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TransformNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}

impl Index<NodeId> for SceneGraph {
    type Output = TransformNode;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl IndexMut<NodeId> for SceneGraph {
    fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
        &mut self.nodes[index.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_child_inherits_parent_rotation() {
        let mut graph = SceneGraph::new();
        let root = graph.push(NodeRole::Root, None, Transform::IDENTITY);
        let spin = graph.push(NodeRole::Revolution, Some(root), Transform::IDENTITY);
        let body = graph.push(
            NodeRole::Tilt,
            Some(spin),
            Transform::from_translation(DVec3::new(2.0, 0.0, 0.0)),
        );

        graph.set_rotation(spin, DQuat::from_rotation_y(FRAC_PI_2));
        graph.propagate();

        let pos = graph.world(body).translation;
        // +X rotated a quarter turn about +Y lands on -Z
        assert!((pos - DVec3::new(0.0, 0.0, -2.0)).length() < 1e-12);
        // Same answer as mapping the local offset through the parent's world
        let via_parent = graph.world(spin).transform_point(DVec3::new(2.0, 0.0, 0.0));
        assert!((via_parent - pos).length() < 1e-12);
    }

    #[test]
    fn test_world_available_before_propagate() {
        let mut graph = SceneGraph::new();
        let root = graph.push(
            NodeRole::Root,
            None,
            Transform::from_translation(DVec3::new(1.0, 2.0, 3.0)),
        );
        let child = graph.push(
            NodeRole::Mesh,
            Some(root),
            Transform::from_translation(DVec3::X),
        );
        assert_eq!(graph.world(child).translation, DVec3::new(2.0, 2.0, 3.0));
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let mut graph = SceneGraph::new();
        let a = graph.push(NodeRole::Root, None, Transform::IDENTITY);
        let b = graph.push(NodeRole::Inclination, Some(a), Transform::IDENTITY);
        let c = graph.push(NodeRole::Revolution, Some(b), Transform::IDENTITY);

        let chain: Vec<_> = graph.ancestors(c).collect();
        assert_eq!(chain, vec![b, a]);
        assert!(graph[c].role.is_dynamic());
        assert!(!graph[b].role.is_dynamic());
    }
}
