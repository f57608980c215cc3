//! Vector, objective and collaborator primitives for learned-model action search.
//!
//! Everything here is deterministic given an injected [`DeterministicRng`]. The search methods
//! themselves live in `motor-search`; this crate only defines what they operate on.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod bounds;
pub mod error;
pub mod math;
pub mod model;
pub mod objective;
pub mod point;
pub mod rng;
pub mod scene;
pub mod vector;

pub use bounds::{random_action, ActionBounds};
pub use error::{Result, SeekError};
pub use math::{Axis, Vec3};
pub use model::{DynamicsModel, IntegratorModel};
pub use objective::{MultiObjective, Objective, ObjectiveKind};
pub use point::{PointNode, PointScene, Relation, RelationTable, SceneSignature};
pub use rng::{DeterministicRng, SplitMix64};
pub use scene::{Scene, SceneNode, TransformComponent};
pub use vector::{argmin_max_min, constrain, lexical_compare, squared_distance, Extremes, RealVector};
