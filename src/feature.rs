//! Feature-value pairs, the atomic keys of every count table
//!
//! A pair is `(feature_name, feature_value)`. Pairs are totally ordered by
//! name first and value second; joint counts are keyed by the ordered pair of
//! pairs, so this order must never change.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A scalar categorical level
///
/// Ordering ranks booleans first, then numbers, then strings. Numbers of any
/// variant compare by exact numeric value, so `Int(3)`, `UInt(3)` and
/// `Float(3.0)` are the same level (as are `0.0` and `-0.0`). NaN sorts
/// above every number when positive and below every number when negative;
/// NaNs compare among themselves with `f64::total_cmp`. Booleans are never
/// equal to numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[serde(untagged)]
pub enum FeatureValue {
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`
    UInt(u64),
    Float(f64),
    Str(String),
}

/// 2^127, the first float outside the `i128` range
const I128_BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

impl FeatureValue {
    fn rank(&self) -> u8 {
        match self {
            FeatureValue::Bool(_) => 0,
            FeatureValue::Int(_) | FeatureValue::UInt(_) | FeatureValue::Float(_) => 1,
            FeatureValue::Str(_) => 2,
        }
    }

    fn as_i128(&self) -> Option<i128> {
        match self {
            FeatureValue::Int(i) => Some(i128::from(*i)),
            FeatureValue::UInt(u) => Some(i128::from(*u)),
            FeatureValue::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < I128_BOUND => {
                Some(*x as i128)
            }
            _ => None,
        }
    }
}

/// Where a NaN sits relative to any non-NaN number
fn nan_side(x: f64) -> Ordering {
    if x.is_sign_negative() {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// Exact comparison of a float against an integer
fn cmp_float_int(x: f64, n: i128) -> Ordering {
    if x.is_nan() {
        return nan_side(x);
    }
    if x >= I128_BOUND {
        return Ordering::Greater;
    }
    if x < -I128_BOUND {
        return Ordering::Less;
    }
    let whole = x.trunc();
    match (whole as i128).cmp(&n) {
        Ordering::Equal => x.partial_cmp(&whole).unwrap_or(Ordering::Equal),
        other => other,
    }
}

fn cmp_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, true) => a.total_cmp(&b),
        (true, false) => nan_side(a),
        (false, true) => nan_side(b).reverse(),
    }
}

impl PartialEq for FeatureValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FeatureValue {}

impl PartialOrd for FeatureValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FeatureValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use FeatureValue::{Bool, Float, Str};
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Str(a), Str(b)) => a.cmp(b),
            (Float(a), Float(b)) => cmp_floats(*a, *b),
            (a, b) if a.rank() != b.rank() => a.rank().cmp(&b.rank()),
            // Only numbers remain; integers always have an i128 form
            (Float(x), n) => cmp_float_int(*x, n.as_i128().unwrap_or_default()),
            (n, Float(x)) => cmp_float_int(*x, n.as_i128().unwrap_or_default()).reverse(),
            (a, b) => a.as_i128().cmp(&b.as_i128()),
        }
    }
}

impl Hash for FeatureValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            FeatureValue::Bool(b) => b.hash(state),
            FeatureValue::Str(s) => s.hash(state),
            // Numerically equal values must hash alike across variants
            number => match number.as_i128() {
                Some(n) => n.hash(state),
                None => {
                    if let FeatureValue::Float(x) = number {
                        x.to_bits().hash(state);
                    }
                }
            },
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Bool(b) => write!(f, "{}", b),
            FeatureValue::Int(i) => write!(f, "{}", i),
            FeatureValue::UInt(u) => write!(f, "{}", u),
            FeatureValue::Float(x) => write!(f, "{}", x),
            FeatureValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for FeatureValue {
    fn from(b: bool) -> Self {
        FeatureValue::Bool(b)
    }
}

impl From<i64> for FeatureValue {
    fn from(i: i64) -> Self {
        FeatureValue::Int(i)
    }
}

impl From<u64> for FeatureValue {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => FeatureValue::Int(i),
            Err(_) => FeatureValue::UInt(u),
        }
    }
}

impl From<i32> for FeatureValue {
    fn from(i: i32) -> Self {
        FeatureValue::Int(i64::from(i))
    }
}

impl From<f64> for FeatureValue {
    fn from(x: f64) -> Self {
        FeatureValue::Float(x)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Str(s.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        FeatureValue::Str(s)
    }
}

/// A `(feature_name, feature_value)` key
///
/// Field order matters: the derived `Ord` compares the name first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeaturePair {
    name: String,
    value: FeatureValue,
}

impl FeaturePair {
    pub fn new(name: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Feature name this pair belongs to
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &FeatureValue {
        &self.value
    }
}

impl fmt::Display for FeaturePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

impl<N: Into<String>, V: Into<FeatureValue>> From<(N, V)> for FeaturePair {
    fn from((name, value): (N, V)) -> Self {
        FeaturePair::new(name, value)
    }
}

/// Order two pairs canonically (smaller first)
pub fn canonical(a: FeaturePair, b: FeaturePair) -> (FeaturePair, FeaturePair) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}
