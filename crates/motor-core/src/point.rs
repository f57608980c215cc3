//! Reference scene backend: named axis-aligned boxes.
//!
//! Good enough to drive the controller end to end (CLI demo, integration tests). Real hosts bring
//! their own scene graph and implement [`Scene`] for it.

use std::collections::{BTreeMap, BTreeSet};

use crate::{RealVector, Scene, SceneNode, TransformComponent, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointNode {
    pub centroid: Vec3,
    pub half_extents: Vec3,
    /// Roll, pitch, yaw.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotation: Vec3,
}

impl PointNode {
    pub fn new(centroid: Vec3, half_extents: Vec3) -> Self {
        Self {
            centroid,
            half_extents,
            rotation: Vec3::ZERO,
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    fn min_corner(&self) -> Vec3 {
        self.centroid - self.half_extents
    }

    fn max_corner(&self) -> Vec3 {
        self.centroid + self.half_extents
    }

    fn overlaps(&self, other: &PointNode) -> bool {
        let (a0, a1) = (self.min_corner(), self.max_corner());
        let (b0, b1) = (other.min_corner(), other.max_corner());
        a0.x <= b1.x && b0.x <= a1.x && a0.y <= b1.y && b0.y <= a1.y && a0.z <= b1.z && b0.z <= a1.z
    }
}

impl SceneNode for PointNode {
    fn centroid(&self) -> Vec3 {
        self.centroid
    }

    fn bounds_points(&self) -> Vec<Vec3> {
        let h = self.half_extents;
        let mut points = Vec::with_capacity(8);
        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    points.push(self.centroid + Vec3::new(sx * h.x, sy * h.y, sz * h.z));
                }
            }
        }
        points
    }

    fn transform(&self, component: TransformComponent) -> Vec3 {
        match component {
            TransformComponent::Position => self.centroid,
            TransformComponent::Rotation => self.rotation,
            TransformComponent::Scale => self.half_extents * 2.0,
        }
    }
}

/// Property layout: three coordinates per movable node, in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SceneSignature {
    pub movable: Vec<String>,
}

impl SceneSignature {
    pub fn state_len(&self) -> usize {
        3 * self.movable.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Relation {
    pub name: &'static str,
    pub a: String,
    pub b: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationTable {
    facts: BTreeSet<Relation>,
}

impl RelationTable {
    pub fn insert(&mut self, name: &'static str, a: &str, b: &str) {
        self.facts.insert(Relation {
            name,
            a: a.to_string(),
            b: b.to_string(),
        });
    }

    pub fn contains(&self, name: &str, a: &str, b: &str) -> bool {
        self.facts
            .iter()
            .any(|r| r.name == name && r.a == a && r.b == b)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relation> {
        self.facts.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointScene {
    name: String,
    nodes: BTreeMap<String, PointNode>,
    signature: SceneSignature,
}

impl PointScene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: BTreeMap::new(),
            signature: SceneSignature::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_node(mut self, name: impl Into<String>, node: PointNode) -> Self {
        self.add_node(name, node);
        self
    }

    /// Adds a node whose position becomes part of the property vector.
    pub fn with_movable(mut self, name: impl Into<String>, node: PointNode) -> Self {
        let name = name.into();
        self.add_node(name.clone(), node);
        if !self.signature.movable.contains(&name) {
            self.signature.movable.push(name);
        }
        self
    }

    pub fn add_node(&mut self, name: impl Into<String>, node: PointNode) {
        self.nodes.insert(name.into(), node);
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut PointNode> {
        self.nodes.get_mut(name)
    }

    pub fn remove_node(&mut self, name: &str) -> Option<PointNode> {
        self.signature.movable.retain(|m| m != name);
        self.nodes.remove(name)
    }
}

impl Scene for PointScene {
    type Signature = SceneSignature;
    type Relations = RelationTable;
    type Node = PointNode;

    fn clone_named(&self, name: &str) -> Self {
        let mut copy = self.clone();
        copy.name = name.to_string();
        copy
    }

    fn signature(&self) -> &SceneSignature {
        &self.signature
    }

    fn properties(&self) -> RealVector {
        let mut props = Vec::with_capacity(self.signature.state_len());
        for name in &self.signature.movable {
            let c = self.nodes.get(name).map(|n| n.centroid).unwrap_or_default();
            props.extend_from_slice(&c.to_array());
        }
        RealVector::new(props)
    }

    fn set_properties(&mut self, properties: &[f64]) {
        debug_assert_eq!(properties.len(), self.signature.state_len(), "property length mismatch");
        for (name, chunk) in self.signature.movable.iter().zip(properties.chunks_exact(3)) {
            if let Some(node) = self.nodes.get_mut(name) {
                node.centroid = Vec3::new(chunk[0], chunk[1], chunk[2]);
            }
        }
    }

    fn relations(&self) -> RelationTable {
        let mut table = RelationTable::default();
        let nodes: Vec<(&String, &PointNode)> = self.nodes.iter().collect();
        for (i, (a_name, a)) in nodes.iter().enumerate() {
            for (b_name, b) in nodes.iter().skip(i + 1) {
                if a.overlaps(b) {
                    table.insert("intersect", a_name, b_name);
                }
            }
        }
        table
    }

    fn node(&self, name: &str) -> Option<&PointNode> {
        self.nodes.get(name)
    }
}
