use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

use crate::config::SampleSpec;
use crate::copy::{CopySink, FsCopySink};
use crate::errors::SamplerError;
use crate::metrics::{StratumSkew, stratum_counts, stratum_skew};
use crate::progress::TracingProgress;
use crate::sampler::{DeterministicRng, OutputRecord, sample};
use crate::source::{DirectoryLister, build_index};
use crate::transport::fs::FsCorpus;
use crate::types::ClassLabel;

/// Outcome of one complete generate-and-copy run.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    /// Selected records in draw order.
    pub records: Vec<OutputRecord>,
    /// Records counted toward each class, in class order.
    pub per_class_counts: IndexMap<ClassLabel, usize>,
    /// How evenly the draws spread across strata; `None` for an empty run.
    pub stratum_skew: Option<StratumSkew>,
    /// Number of files copied into the destination.
    pub copied: usize,
    /// Wall-clock start of the run.
    pub started_at: DateTime<Utc>,
    /// Wall-clock end of the run.
    pub finished_at: DateTime<Utc>,
}

/// Build the index, sample, then copy every record into `destination`.
///
/// Sampling completes fully before the first copy, so an exhausted or empty
/// corpus fails the run without leaving a half-populated destination behind.
/// A per-record copy failure aborts the remainder of the copies but the
/// returned error carries the offending record.
pub fn generate_test_set(
    corpora: &[FsCorpus],
    spec: &SampleSpec,
    destination: impl Into<PathBuf>,
) -> Result<RunSummary, SamplerError> {
    let started_at = Utc::now();
    let listers: Vec<&dyn DirectoryLister> = corpora
        .iter()
        .map(|corpus| corpus as &dyn DirectoryLister)
        .collect();
    let group = build_index(&listers)?;
    info!(
        strata = group.stratum_count(),
        items = group.item_count(),
        target = spec.total_target,
        seed = spec.seed,
        "index built"
    );
    let mut rng = DeterministicRng::new(spec.seed);
    let records = sample(&group, spec, &mut rng, &TracingProgress)?;
    let sink = FsCopySink::new(corpora, destination)?;
    let mut copied = 0usize;
    for record in &records {
        sink.copy(record)?;
        copied += 1;
    }
    let per_class_counts = class_counts(&records);
    let skew = stratum_skew(&stratum_counts(&records));
    info!(copied, "performance test set generated");
    Ok(RunSummary {
        records,
        per_class_counts,
        stratum_skew: skew,
        copied,
        started_at,
        finished_at: Utc::now(),
    })
}

/// Per-class record counts, in first-seen (draw) order.
pub fn class_counts(records: &[OutputRecord]) -> IndexMap<ClassLabel, usize> {
    let mut counts: IndexMap<ClassLabel, usize> = IndexMap::new();
    for record in records {
        *counts.entry(record.class.clone()).or_insert(0) += 1;
    }
    counts
}
