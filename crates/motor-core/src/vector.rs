use core::cmp::Ordering;
use core::ops::{Add, Deref, DerefMut, Mul, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Owned, fixed-at-use-time-length vector of `f64`.
///
/// Dereferences to `[f64]`, so slicing, indexing and iteration come from the slice API.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RealVector(Vec<f64>);

impl RealVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    /// `len` consecutive elements starting at `start`.
    pub fn segment(&self, start: usize, len: usize) -> RealVector {
        Self(self.0[start..start + len].to_vec())
    }

    /// Concatenate slices in order.
    pub fn concat(parts: &[&[f64]]) -> RealVector {
        let len = parts.iter().map(|p| p.len()).sum();
        let mut out = Vec::with_capacity(len);
        for part in parts {
            out.extend_from_slice(part);
        }
        Self(out)
    }

    pub fn squared_norm(&self) -> f64 {
        self.0.iter().map(|x| x * x).sum()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl Deref for RealVector {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl DerefMut for RealVector {
    fn deref_mut(&mut self) -> &mut [f64] {
        &mut self.0
    }
}

impl AsRef<[f64]> for RealVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for RealVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&[f64]> for RealVector {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}

impl FromIterator<f64> for RealVector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Add for &RealVector {
    type Output = RealVector;

    fn add(self, rhs: &RealVector) -> RealVector {
        debug_assert_eq!(self.len(), rhs.len(), "vector length mismatch");
        self.iter().zip(rhs.iter()).map(|(a, b)| a + b).collect()
    }
}

impl Sub for &RealVector {
    type Output = RealVector;

    fn sub(self, rhs: &RealVector) -> RealVector {
        debug_assert_eq!(self.len(), rhs.len(), "vector length mismatch");
        self.iter().zip(rhs.iter()).map(|(a, b)| a - b).collect()
    }
}

impl Mul<f64> for &RealVector {
    type Output = RealVector;

    fn mul(self, k: f64) -> RealVector {
        self.iter().map(|x| x * k).collect()
    }
}

/// Clamp every `v[i]` into `[min[i], max[i]]`.
pub fn constrain(v: &mut [f64], min: &[f64], max: &[f64]) {
    debug_assert_eq!(v.len(), min.len(), "bounds length mismatch");
    debug_assert_eq!(v.len(), max.len(), "bounds length mismatch");
    for ((x, lo), hi) in v.iter_mut().zip(min).zip(max) {
        if *x < *lo {
            *x = *lo;
        } else if *x > *hi {
            *x = *hi;
        }
    }
}

/// Order equal-length vectors by their first differing coordinate.
///
/// Coordinates that are neither `<` nor `>` (equal, or NaN) do not decide the order.
pub fn lexical_compare(a: &[f64], b: &[f64]) -> Ordering {
    debug_assert_eq!(a.len(), b.len(), "vector length mismatch");
    for (x, y) in a.iter().zip(b) {
        if x < y {
            return Ordering::Less;
        }
        if x > y {
            return Ordering::Greater;
        }
    }
    Ordering::Equal
}

pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "vector length mismatch");
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Indices produced by [`argmin_max_min`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extremes {
    pub worst: usize,
    pub nextworst: usize,
    pub best: usize,
}

/// Single streaming pass locating the lexicographically largest (`worst`), a runner-up
/// (`nextworst`) and the smallest (`best`) element.
///
/// The three tests are an if / else-if / else chain, so an element promoted to `worst` or
/// `nextworst` is never checked against `best` in the same step, and `nextworst` is only an
/// approximation of the true second-largest. Simplex dynamics depend on this exact behaviour.
pub fn argmin_max_min<T: AsRef<[f64]>>(values: &[T]) -> Extremes {
    debug_assert!(!values.is_empty(), "argmin_max_min on empty input");
    let mut out = Extremes {
        worst: 0,
        nextworst: 0,
        best: 0,
    };

    for (i, v) in values.iter().enumerate() {
        let v = v.as_ref();
        if lexical_compare(v, values[out.worst].as_ref()) == Ordering::Greater {
            out.nextworst = out.worst;
            out.worst = i;
        } else if lexical_compare(v, values[out.nextworst].as_ref()) == Ordering::Greater {
            out.nextworst = i;
        } else if lexical_compare(v, values[out.best].as_ref()) == Ordering::Less {
            out.best = i;
        }
    }

    out
}
