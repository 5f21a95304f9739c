//! cbrw - Incremental co-occurrence counting for categorical observations
//!
//! This library keeps the raw statistics that coupled biased random walk
//! anomaly scoring is built on: per-feature-value occurrence counts, joint
//! counts of feature-value pairs seen together, and a stable integer id for
//! every pair ever observed.

pub mod cli;
pub mod counter;
pub mod feature;
pub mod index;
pub mod observation;
pub mod report;

pub use counter::ObservationCounter;
pub use feature::{FeaturePair, FeatureValue};
pub use index::{IdentifierIndex, IndexError};
pub use observation::{Observation, ObservationError, ObservationSource};
