//! Declarative objective descriptions, as they appear in controller config files.
//!
//! ```yaml
//! objectives:
//!   - kind: euclidean
//!     a: gripper
//!     b: block
//!   - kind: abs_axis_diff
//!     a: gripper
//!     b: block
//!     axis: z
//!     sign: negative
//! ```

use std::collections::BTreeMap;

use motor_core::{Axis, MultiObjective, Objective, ObjectiveKind};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveSpec {
    pub kind: String,
    #[serde(flatten)]
    pub params: BTreeMap<String, Value>,
}

impl ObjectiveSpec {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("missing object reference `{0}`")]
    MissingParam(&'static str),

    #[error("parameter `{0}` must be a string")]
    NotAString(&'static str),

    #[error("invalid axis `{0}` (expected x, y, z or 0..=2)")]
    BadAxis(String),

    #[error("invalid sign `{0}` (expected positive or negative)")]
    BadSign(String),
}

/// Build a single objective. `Ok(None)` means the kind is not recognised.
pub fn build_objective(spec: &ObjectiveSpec) -> Result<Option<Objective>, SpecError> {
    let kind = match spec.kind.as_str() {
        "euclidean" => ObjectiveKind::Euclidean {
            a: object(spec, "a")?,
            b: object(spec, "b")?,
        },
        "axis_diff" => ObjectiveKind::AxisDiff {
            a: object(spec, "a")?,
            b: object(spec, "b")?,
            axis: axis(spec)?,
        },
        "abs_axis_diff" => ObjectiveKind::AbsAxisDiff {
            a: object(spec, "a")?,
            b: object(spec, "b")?,
            axis: axis(spec)?,
        },
        "behind" => ObjectiveKind::Behind {
            a: object(spec, "a")?,
            b: object(spec, "b")?,
        },
        "align_facing" => ObjectiveKind::AlignFacing {
            a: object(spec, "a")?,
            b: object(spec, "b")?,
        },
        _ => return Ok(None),
    };

    Ok(Some(Objective::new(kind).negated(negated(spec)?)))
}

/// Build the objective chain in order.
///
/// Unknown kinds are skipped with a warning. A malformed parameter set stops parsing: the
/// objectives before it are kept, the rest of the chain is dropped.
pub fn parse_objectives(specs: &[ObjectiveSpec]) -> MultiObjective {
    let mut out = MultiObjective::new();
    for (index, spec) in specs.iter().enumerate() {
        match build_objective(spec) {
            Ok(Some(objective)) => out.push(objective),
            Ok(None) => warn!(index, kind = %spec.kind, "unknown objective kind, skipping"),
            Err(err) => {
                warn!(
                    index,
                    kind = %spec.kind,
                    %err,
                    "malformed objective, ignoring the rest of the chain"
                );
                break;
            }
        }
    }
    out
}

fn object(spec: &ObjectiveSpec, key: &'static str) -> Result<String, SpecError> {
    match spec.params.get(key) {
        None | Some(Value::Null) => Err(SpecError::MissingParam(key)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SpecError::NotAString(key)),
    }
}

fn axis(spec: &ObjectiveSpec) -> Result<Axis, SpecError> {
    let raw = match spec.params.get("axis") {
        None | Some(Value::Null) => return Err(SpecError::MissingParam("axis")),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => format!("{other:?}"),
    };
    Axis::parse(&raw).ok_or(SpecError::BadAxis(raw))
}

fn negated(spec: &ObjectiveSpec) -> Result<bool, SpecError> {
    match spec.params.get("sign") {
        None | Some(Value::Null) => Ok(false),
        Some(Value::String(s)) if s == "positive" => Ok(false),
        Some(Value::String(s)) if s == "negative" => Ok(true),
        Some(Value::String(s)) => Err(SpecError::BadSign(s.clone())),
        Some(other) => Err(SpecError::BadSign(format!("{other:?}"))),
    }
}
