use crate::{Axis, RealVector, Scene, SceneNode, TransformComponent, Vec3};

/// Geometric quantity measured between named scene objects. Smaller is better.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectiveKind {
    /// Distance between the two centroids.
    Euclidean { a: String, b: String },
    /// `centroid(a)[axis] - centroid(b)[axis]`.
    AxisDiff { a: String, b: String, axis: Axis },
    /// Absolute value of [`ObjectiveKind::AxisDiff`].
    AbsAxisDiff { a: String, b: String, axis: Axis },
    /// How far `a` is from sitting entirely behind `b` (on its -x side), plus lateral offset.
    Behind { a: String, b: String },
    /// `1 - cos` of the angle between `a`'s facing direction and the direction to `b`.
    AlignFacing { a: String, b: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub kind: ObjectiveKind,
    pub negated: bool,
}

impl Objective {
    pub fn new(kind: ObjectiveKind) -> Self {
        Self {
            kind,
            negated: false,
        }
    }

    pub fn euclidean(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new(ObjectiveKind::Euclidean {
            a: a.into(),
            b: b.into(),
        })
    }

    pub fn axis_diff(a: impl Into<String>, b: impl Into<String>, axis: Axis) -> Self {
        Self::new(ObjectiveKind::AxisDiff {
            a: a.into(),
            b: b.into(),
            axis,
        })
    }

    pub fn abs_axis_diff(a: impl Into<String>, b: impl Into<String>, axis: Axis) -> Self {
        Self::new(ObjectiveKind::AbsAxisDiff {
            a: a.into(),
            b: b.into(),
            axis,
        })
    }

    pub fn behind(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new(ObjectiveKind::Behind {
            a: a.into(),
            b: b.into(),
        })
    }

    pub fn align_facing(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new(ObjectiveKind::AlignFacing {
            a: a.into(),
            b: b.into(),
        })
    }

    pub fn negated(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    /// Value at the scene's current configuration.
    ///
    /// Returns `f64::INFINITY` (never negated) when a referenced object is missing, so search
    /// treats that configuration as maximally undesirable and keeps going.
    pub fn evaluate<S: Scene>(&self, scene: &S) -> f64 {
        let raw = match &self.kind {
            ObjectiveKind::Euclidean { a, b } => {
                pair(scene, a, b).map(|(a, b)| (a.centroid() - b.centroid()).norm())
            }
            ObjectiveKind::AxisDiff { a, b, axis } => {
                pair(scene, a, b).map(|(a, b)| axis_diff(a, b, *axis))
            }
            ObjectiveKind::AbsAxisDiff { a, b, axis } => {
                pair(scene, a, b).map(|(a, b)| axis_diff(a, b, *axis).abs())
            }
            ObjectiveKind::Behind { a, b } => pair(scene, a, b).map(|(a, b)| behind(a, b)),
            ObjectiveKind::AlignFacing { a, b } => {
                pair(scene, a, b).map(|(a, b)| align_facing(a, b))
            }
        };

        match raw {
            None => f64::INFINITY,
            Some(v) if self.negated => -v,
            Some(v) => v,
        }
    }
}

fn pair<'s, S: Scene>(scene: &'s S, a: &str, b: &str) -> Option<(&'s S::Node, &'s S::Node)> {
    Some((scene.node(a)?, scene.node(b)?))
}

fn axis_diff(a: &impl SceneNode, b: &impl SceneNode, axis: Axis) -> f64 {
    a.centroid().get(axis) - b.centroid().get(axis)
}

fn behind(a: &impl SceneNode, b: &impl SceneNode) -> f64 {
    let (ca, cb) = (a.centroid(), b.centroid());
    let front_of_a = a
        .bounds_points()
        .iter()
        .map(|p| p.x)
        .fold(ca.x, f64::max);
    let back_of_b = b
        .bounds_points()
        .iter()
        .map(|p| p.x)
        .fold(cb.x, f64::min);
    (front_of_a - back_of_b).max(0.0) + (ca.y - cb.y).abs()
}

fn align_facing(a: &impl SceneNode, b: &impl SceneNode) -> f64 {
    let rot = a.transform(TransformComponent::Rotation);
    let (pitch, yaw) = (rot.y, rot.z);
    let facing = Vec3::new(pitch.cos() * yaw.cos(), pitch.cos() * yaw.sin(), -pitch.sin());

    let to_b = b.centroid() - a.centroid();
    let dist = to_b.norm();
    if dist == 0.0 {
        return 0.0;
    }
    1.0 - facing.dot(to_b) / dist
}

/// Ordered objective list; position is priority for lexicographic comparison.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiObjective {
    objectives: Vec<Objective>,
}

impl MultiObjective {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, objective: Objective) {
        self.objectives.push(objective);
    }

    pub fn with(mut self, objective: Objective) -> Self {
        self.push(objective);
        self
    }

    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Objective> {
        self.objectives.iter()
    }

    pub fn evaluate<S: Scene>(&self, scene: &S) -> RealVector {
        self.objectives.iter().map(|o| o.evaluate(scene)).collect()
    }
}

impl FromIterator<Objective> for MultiObjective {
    fn from_iter<I: IntoIterator<Item = Objective>>(iter: I) -> Self {
        Self {
            objectives: iter.into_iter().collect(),
        }
    }
}
