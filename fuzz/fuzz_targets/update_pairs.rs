#![no_main]

use cbrw::{FeatureValue, Observation, ObservationCounter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|raw: Vec<Vec<(String, FeatureValue)>>| {
    let batch: Vec<Observation> = raw.into_iter().map(|o| o.into_iter().collect()).collect();
    let mut counter = ObservationCounter::new();
    counter.update(batch.clone());

    // Joint keys stay canonical and every pair is indexed
    for (a, b) in counter.joint_counts().keys() {
        assert!(a < b);
    }
    for obs in &batch {
        for pair in obs.pairs() {
            assert!(counter.index().contains(pair));
            assert!(counter.get_count(pair) >= 1);
        }
    }
});
