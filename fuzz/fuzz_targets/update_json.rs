#![no_main]

use cbrw::ObservationCounter;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any JSON document must either count or fail cleanly, never panic
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let mut counter = ObservationCounter::new();
        let before = counter.n_obs();
        match counter.update_json(&value) {
            Ok(processed) => assert_eq!(counter.n_obs(), before + processed as u64),
            Err(_) => {
                let len = value.as_array().map_or(0, Vec::len) as u64;
                assert!(counter.n_obs() <= len);
            }
        }
    }
});
