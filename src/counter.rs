//! Incremental single and joint occurrence counting
//!
//! [`ObservationCounter`] folds observations into three tables that always
//! move together: per-feature occurrence counts, joint counts for every pair
//! of feature-value pairs seen in the same observation, and the identifier
//! index. Downstream scoring reads these tables; nothing here computes a
//! probability.
//!
//! Joint counts are keyed by `(a, b)` with `a < b` under the [`FeaturePair`]
//! order (name, then value). There is never an entry for `(b, a)`.

use crate::feature::{canonical, FeaturePair};
use crate::index::IdentifierIndex;
use crate::observation::{self, Observation, ObservationSource};
use fnv::FnvHashMap;
use serde_json::Value;

/// Per-feature occurrence counts: feature name → pair → count
pub type FeatureCounts = FnvHashMap<String, FnvHashMap<FeaturePair, u64>>;

/// Joint counts keyed by the canonical (smaller, larger) pair of pairs
pub type JointCounts = FnvHashMap<(FeaturePair, FeaturePair), u64>;

/// Counts single and joint occurrences of feature-value pairs
#[derive(Debug, Clone, Default)]
pub struct ObservationCounter {
    /// Observations counted (not pairs)
    n_obs: u64,
    counts: FeatureCounts,
    joint_counts: JointCounts,
    index: IdentifierIndex<FeaturePair>,
}

impl ObservationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one observation or a sequence of them, in order
    ///
    /// Returns the number of observations counted by this call.
    pub fn update<S: ObservationSource>(&mut self, observations: S) -> usize {
        let mut processed = 0;
        for observation in observations.into_observations() {
            self.count_observation(&observation);
            processed += 1;
        }
        tracing::debug!(processed, n_obs = self.n_obs, "updated observation counts");
        processed
    }

    /// Count observations from a JSON object or array of objects
    ///
    /// Each observation is validated and counted before the next one is
    /// read. On error, observations before the failing one stay counted and
    /// the failing one and the rest are not.
    pub fn update_json(&mut self, value: &Value) -> observation::Result<usize> {
        let batch = observation::json_batch(value)?;
        let mut processed = 0;
        for (position, raw) in batch.iter().enumerate() {
            let observation = match Observation::from_json(raw, position) {
                Ok(observation) => observation,
                Err(e) => {
                    tracing::warn!(position, processed, "rejected observation: {}", e);
                    return Err(e);
                }
            };
            self.count_observation(&observation);
            processed += 1;
        }
        tracing::debug!(processed, n_obs = self.n_obs, "updated observation counts from json");
        Ok(processed)
    }

    fn count_observation(&mut self, observation: &Observation) {
        let pairs = observation.pairs();

        for pair in pairs {
            *self
                .counts
                .entry(pair.name().to_string())
                .or_default()
                .entry(pair.clone())
                .or_insert(0) += 1;
        }

        // Names are unique within an observation, so sorted pairs are
        // strictly increasing and every (i < j) combination is canonical.
        let mut sorted: Vec<&FeaturePair> = pairs.iter().collect();
        sorted.sort();
        for (i, a) in sorted.iter().enumerate() {
            for b in &sorted[i + 1..] {
                *self
                    .joint_counts
                    .entry(((*a).clone(), (*b).clone()))
                    .or_insert(0) += 1;
            }
        }

        for pair in pairs {
            self.index.insert(pair.clone());
        }

        self.n_obs += 1;
        tracing::trace!(pairs = pairs.len(), n_obs = self.n_obs, "counted observation");
    }

    /// Total observations counted
    pub fn n_obs(&self) -> u64 {
        self.n_obs
    }

    pub fn counts(&self) -> &FeatureCounts {
        &self.counts
    }

    pub fn joint_counts(&self) -> &JointCounts {
        &self.joint_counts
    }

    pub fn index(&self) -> &IdentifierIndex<FeaturePair> {
        &self.index
    }

    /// Occurrences of `pair`; 0 for an unseen feature name or value
    ///
    /// Read-only: an unseen feature name does not get a bucket.
    pub fn get_count(&self, pair: &FeaturePair) -> u64 {
        self.counts
            .get(pair.name())
            .and_then(|bucket| bucket.get(pair))
            .copied()
            .unwrap_or(0)
    }

    /// Observations containing both `a` and `b`, in either argument order
    pub fn joint_count(&self, a: &FeaturePair, b: &FeaturePair) -> u64 {
        if a == b {
            return 0;
        }
        let key = canonical(a.clone(), b.clone());
        self.joint_counts.get(&key).copied().unwrap_or(0)
    }

    /// Highest count among the values of `feature_name`
    pub fn mode(&self, feature_name: &str) -> Option<u64> {
        self.counts
            .get(feature_name)
            .and_then(|bucket| bucket.values().copied().max())
    }

    /// Feature names seen so far, in no particular order
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }
}
