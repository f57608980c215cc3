use crate::{RealVector, Vec3};

/// Which component of a node's local transform to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformComponent {
    Position,
    /// Roll, pitch, yaw in radians.
    Rotation,
    Scale,
}

/// Geometry of one named scene object, as seen by objectives.
pub trait SceneNode {
    fn centroid(&self) -> Vec3;

    /// Points enumerating the node's bounding volume.
    fn bounds_points(&self) -> Vec<Vec3>;

    fn transform(&self, component: TransformComponent) -> Vec3;
}

/// The scene-graph collaborator.
///
/// Search never mutates a caller's scene: it works on a copy made with [`Scene::clone_named`] and
/// drives it through [`Scene::set_properties`]. The property vector is the dynamics model's state.
pub trait Scene: Clone {
    /// Describes the layout of the property vector; passed through to the model.
    type Signature;
    /// Relational facts extracted from the current configuration.
    type Relations;
    type Node: SceneNode;

    fn clone_named(&self, name: &str) -> Self;

    fn signature(&self) -> &Self::Signature;

    fn properties(&self) -> RealVector;

    fn set_properties(&mut self, properties: &[f64]);

    fn relations(&self) -> Self::Relations;

    fn node(&self, name: &str) -> Option<&Self::Node>;
}
