//! Serializable snapshot of an [`ObservationCounter`]
//!
//! Count tables are keyed by composite pairs, which JSON objects cannot use
//! as keys, so the report flattens them into rows.

use crate::counter::ObservationCounter;
use crate::feature::FeatureValue;
use serde::{Deserialize, Serialize};

/// One indexed feature-value pair and its count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRow {
    /// Identifier index id
    pub id: usize,
    pub feature: String,
    pub value: FeatureValue,
    pub count: u64,
}

/// Side of a joint-count row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRef {
    pub feature: String,
    pub value: FeatureValue,
}

/// Joint count of two distinct pairs, `a < b`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointRow {
    pub a: PairRef,
    pub b: PairRef,
    pub count: u64,
}

/// Root report structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountReport {
    /// Format version identifier
    pub version: String,
    pub n_obs: u64,
    /// Pairs in id order
    pub pairs: Vec<PairRow>,
    /// Joint rows sorted by (a, b)
    pub joint: Vec<JointRow>,
}

impl CountReport {
    /// Snapshot the counter as of this call
    pub fn from_counter(counter: &ObservationCounter) -> Self {
        let pairs = counter
            .index()
            .iter()
            .map(|(pair, id)| PairRow {
                id,
                feature: pair.name().to_string(),
                value: pair.value().clone(),
                count: counter.get_count(pair),
            })
            .collect();

        let mut entries: Vec<_> = counter.joint_counts().iter().collect();
        entries.sort_by(|x, y| x.0.cmp(y.0));
        let joint = entries
            .into_iter()
            .map(|((a, b), &count)| JointRow {
                a: PairRef {
                    feature: a.name().to_string(),
                    value: a.value().clone(),
                },
                b: PairRef {
                    feature: b.name().to_string(),
                    value: b.value().clone(),
                },
                count,
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            n_obs: counter.n_obs(),
            pairs,
            joint,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable rendering
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("observations: {}\n", self.n_obs));
        out.push_str(&format!("{:>6}  {:<32} {:>10}\n", "id", "pair", "count"));
        out.push_str(&format!("{}\n", "-".repeat(50)));
        for row in &self.pairs {
            let pair = format!("{}={}", row.feature, row.value);
            out.push_str(&format!("{:>6}  {:<32} {:>10}\n", row.id, pair, row.count));
        }
        if !self.joint.is_empty() {
            out.push_str(&format!("\njoint counts: {}\n", self.joint.len()));
            for row in &self.joint {
                out.push_str(&format!(
                    "  {}={} & {}={}: {}\n",
                    row.a.feature, row.a.value, row.b.feature, row.b.value, row.count
                ));
            }
        }
        out
    }
}

impl ObservationCounter {
    pub fn report(&self) -> CountReport {
        CountReport::from_counter(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::Observation;

    fn counter() -> ObservationCounter {
        let mut counter = ObservationCounter::new();
        counter.update(vec![
            Observation::new().with("shape", "circle").with("color", "red"),
            Observation::new().with("color", "blue").with("shape", "circle"),
        ]);
        counter
    }

    #[test]
    fn test_pairs_in_id_order() {
        let report = counter().report();
        let ids: Vec<usize> = report.pairs.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(report.pairs[0].feature, "shape");
        assert_eq!(report.pairs[0].count, 2);
        assert_eq!(report.n_obs, 2);
    }

    #[test]
    fn test_joint_rows_sorted() {
        let report = counter().report();
        assert_eq!(report.joint.len(), 2);
        assert_eq!(report.joint[0].a.value, FeatureValue::from("blue"));
        assert_eq!(report.joint[1].a.value, FeatureValue::from("red"));
        assert!(report.joint.iter().all(|r| r.b.feature == "shape"));
    }

    #[test]
    fn test_json_serialization() {
        let json = counter().report().to_json().unwrap();
        assert!(json.contains("\"n_obs\": 2"));
        assert!(json.contains("\"feature\": \"color\""));
        assert!(json.contains("\"value\": \"circle\""));
    }

    #[test]
    fn test_text_rendering() {
        let text = counter().report().to_text();
        assert!(text.starts_with("observations: 2"));
        assert!(text.contains("shape=circle"));
        assert!(text.contains("color=blue & shape=circle: 1"));
    }
}
