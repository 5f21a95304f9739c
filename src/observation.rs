//! Observations: one sample of categorical features
//!
//! An observation maps feature names to scalar values. Names are unique and
//! entries keep insertion order, which decides the order in which new pairs
//! receive index ids.

use crate::feature::{FeaturePair, FeatureValue};
use fnv::FnvHashMap;
use serde_json::Value;
use thiserror::Error;

/// Malformed dynamic input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObservationError {
    #[error("Invalid argument: expected an observation object or an array of them, got {0}")]
    InvalidArgument(&'static str),

    #[error("Invalid observation at position {position}: {reason}")]
    InvalidObservation { position: usize, reason: String },
}

/// Result type for observation conversion
pub type Result<T> = std::result::Result<T, ObservationError>;

/// Ordered name → value mapping for a single sample
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    pairs: Vec<FeaturePair>,
    /// Feature name → slot in `pairs`
    positions: FnvHashMap<String, usize>,
}

impl Observation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`
    ///
    /// An existing name keeps its position and takes the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FeatureValue>) {
        let pair = FeaturePair::new(name, value);
        match self.positions.get(pair.name()) {
            Some(&slot) => self.pairs[slot] = pair,
            None => {
                self.positions.insert(pair.name().to_string(), self.pairs.len());
                self.pairs.push(pair);
            }
        }
    }

    /// Builder form of [`Observation::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.positions
            .get(name)
            .map(|&slot| self.pairs[slot].value())
    }

    /// Feature-value pairs in insertion order
    pub fn pairs(&self) -> &[FeaturePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Convert one JSON object; `position` is reported in errors
    pub fn from_json(value: &Value, position: usize) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ObservationError::InvalidObservation {
                position,
                reason: format!("expected an object, got {}", json_kind(value)),
            })?;

        let mut observation = Observation::new();
        for (name, raw) in object {
            let feature_value = scalar(raw).ok_or_else(|| ObservationError::InvalidObservation {
                position,
                reason: format!(
                    "feature '{}' must be a scalar value, got {}",
                    name,
                    json_kind(raw)
                ),
            })?;
            observation.insert(name.as_str(), feature_value);
        }
        Ok(observation)
    }
}

impl<N: Into<String>, V: Into<FeatureValue>> FromIterator<(N, V)> for Observation {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut observation = Observation::new();
        for (name, value) in iter {
            observation.insert(name, value);
        }
        observation
    }
}

impl<'a> IntoIterator for &'a Observation {
    type Item = &'a FeaturePair;
    type IntoIter = std::slice::Iter<'a, FeaturePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

fn scalar(value: &Value) -> Option<FeatureValue> {
    match value {
        Value::Bool(b) => Some(FeatureValue::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(FeatureValue::Int)
            .or_else(|| n.as_u64().map(FeatureValue::UInt))
            .or_else(|| n.as_f64().map(FeatureValue::Float)),
        Value::String(s) => Some(FeatureValue::Str(s.clone())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Split a JSON document into per-observation values
///
/// An object is a single observation; an array is a sequence of them.
/// Elements are not validated here.
pub(crate) fn json_batch(value: &Value) -> Result<&[Value]> {
    match value {
        Value::Object(_) => Ok(std::slice::from_ref(value)),
        Value::Array(items) => Ok(items.as_slice()),
        other => Err(ObservationError::InvalidArgument(json_kind(other))),
    }
}

/// Anything `update` accepts: one observation or a sequence of them
pub trait ObservationSource {
    type Iter: Iterator<Item = Observation>;

    fn into_observations(self) -> Self::Iter;
}

impl ObservationSource for Observation {
    type Iter = std::iter::Once<Observation>;

    fn into_observations(self) -> Self::Iter {
        std::iter::once(self)
    }
}

impl ObservationSource for Vec<Observation> {
    type Iter = std::vec::IntoIter<Observation>;

    fn into_observations(self) -> Self::Iter {
        self.into_iter()
    }
}

impl<const N: usize> ObservationSource for [Observation; N] {
    type Iter = std::array::IntoIter<Observation, N>;

    fn into_observations(self) -> Self::Iter {
        self.into_iter()
    }
}

impl<'a> ObservationSource for &'a [Observation] {
    type Iter = std::iter::Cloned<std::slice::Iter<'a, Observation>>;

    fn into_observations(self) -> Self::Iter {
        self.iter().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut obs = Observation::new();
        obs.insert("color", "red");
        obs.insert("shape", "circle");
        obs.insert("color", "blue");

        assert_eq!(obs.len(), 2);
        assert_eq!(obs.pairs()[0], FeaturePair::new("color", "blue"));
        assert_eq!(obs.get("shape"), Some(&FeatureValue::from("circle")));
    }

    #[test]
    fn test_from_iterator_keeps_order() {
        let obs: Observation = vec![("b", 1i64), ("a", 2i64)].into_iter().collect();
        let names: Vec<&str> = obs.pairs().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_from_json_scalars() {
        let obs = Observation::from_json(
            &json!({"color": "red", "size": 3, "weight": 1.5, "ok": true}),
            0,
        )
        .unwrap();

        assert_eq!(obs.len(), 4);
        assert_eq!(obs.get("size"), Some(&FeatureValue::Int(3)));
        assert_eq!(obs.get("weight"), Some(&FeatureValue::Float(1.5)));
        assert_eq!(obs.get("ok"), Some(&FeatureValue::Bool(true)));
    }

    #[test]
    fn test_from_json_large_integers_are_exact() {
        let obs = Observation::from_json(&json!({"id": 18446744073709551615u64}), 0).unwrap();
        assert_eq!(obs.get("id"), Some(&FeatureValue::UInt(u64::MAX)));

        let below = Observation::from_json(&json!({"id": 18446744073709551614u64}), 1).unwrap();
        assert_ne!(obs.get("id"), below.get("id"));
    }

    #[test]
    fn test_many_features_keep_lookup_and_replacement() {
        let mut obs = Observation::new();
        for i in 0..500i64 {
            obs.insert(format!("f{}", i), i);
        }
        obs.insert("f250", "replaced");

        assert_eq!(obs.len(), 500);
        assert_eq!(obs.pairs()[250], FeaturePair::new("f250", "replaced"));
        assert_eq!(obs.get("f499"), Some(&FeatureValue::Int(499)));
        assert_eq!(obs.get("f500"), None);
    }

    #[test]
    fn test_from_json_preserves_key_order() {
        let value: Value = serde_json::from_str(r#"{"zeta": 1, "alpha": 2}"#).unwrap();
        let obs = Observation::from_json(&value, 0).unwrap();
        assert_eq!(obs.pairs()[0].name(), "zeta");
    }

    #[test]
    fn test_from_json_rejects_nested_values() {
        let err = Observation::from_json(&json!({"color": ["red"]}), 4).unwrap_err();
        match err {
            ObservationError::InvalidObservation { position, reason } => {
                assert_eq!(position, 4);
                assert!(reason.contains("color"));
                assert!(reason.contains("an array"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(Observation::from_json(&json!({"color": null}), 0).is_err());
        assert!(Observation::from_json(&json!({"color": {"r": 1}}), 0).is_err());
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = Observation::from_json(&json!("red"), 2).unwrap_err();
        assert!(matches!(
            err,
            ObservationError::InvalidObservation { position: 2, .. }
        ));
    }

    #[test]
    fn test_json_batch_shapes() {
        assert_eq!(json_batch(&json!({"a": 1})).unwrap().len(), 1);
        assert_eq!(json_batch(&json!([{"a": 1}, {"a": 2}])).unwrap().len(), 2);
        assert_eq!(
            json_batch(&json!(42)),
            Err(ObservationError::InvalidArgument("a number"))
        );
    }
}
