use std::collections::HashMap;

use serde::Serialize;

use crate::sampler::OutputRecord;
use crate::types::StratumKey;

/// Aggregate skew metrics for per-stratum record counts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StratumSkew {
    /// Total record count across all strata.
    pub total: usize,
    /// Number of distinct strata that produced records.
    pub strata: usize,
    /// Smallest per-stratum count.
    pub min: usize,
    /// Largest per-stratum count.
    pub max: usize,
    /// Mean records per stratum.
    pub mean: f64,
    /// Largest stratum's share of the total.
    pub max_share: f64,
    /// Smallest stratum's share of the total.
    pub min_share: f64,
    /// Max over min count, `INFINITY` when some stratum has zero records.
    pub ratio: f64,
    /// Per-stratum shares, largest count first.
    pub per_stratum: Vec<StratumShare>,
}

/// Per-stratum share of an output sequence for skew inspection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StratumShare {
    /// Stratum key.
    pub stratum: StratumKey,
    /// Records drawn from this stratum.
    pub count: usize,
    /// Fraction of the total drawn from this stratum.
    pub share: f64,
}

/// Count records per stratum.
pub fn stratum_counts(records: &[OutputRecord]) -> HashMap<StratumKey, usize> {
    let mut counts: HashMap<StratumKey, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.stratum.clone()).or_insert(0) += 1;
    }
    counts
}

/// Compute skew metrics from per-stratum counts.
pub fn stratum_skew(counts: &HashMap<StratumKey, usize>) -> Option<StratumSkew> {
    if counts.is_empty() {
        return None;
    }
    let total: usize = counts.values().sum();
    let strata = counts.len();
    let min = *counts.values().min().expect("counts non-empty");
    let max = *counts.values().max().expect("counts non-empty");
    let mean = total as f64 / strata as f64;
    let max_share = if total == 0 {
        0.0
    } else {
        max as f64 / total as f64
    };
    let min_share = if total == 0 {
        0.0
    } else {
        min as f64 / total as f64
    };
    let ratio = if min == 0 {
        f64::INFINITY
    } else {
        max as f64 / min as f64
    };
    let mut per_stratum: Vec<StratumShare> = counts
        .iter()
        .map(|(stratum, count)| StratumShare {
            stratum: stratum.clone(),
            count: *count,
            share: if total == 0 {
                0.0
            } else {
                *count as f64 / total as f64
            },
        })
        .collect();
    per_stratum.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.stratum.cmp(&b.stratum))
    });
    Some(StratumSkew {
        total,
        strata,
        min,
        max,
        mean,
        max_share,
        min_share,
        ratio,
        per_stratum,
    })
}
