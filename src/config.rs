use std::collections::BTreeSet;

use crate::constants::sampler::{DEFAULT_SEED, PROPORTION_EPSILON};
use crate::errors::SamplerError;
use crate::types::{ClassLabel, StratumKey};

/// Predicate over stratum keys used to assign strata to a class.
#[derive(Clone, Debug)]
pub enum ClassRule {
    /// Matches every stratum key.
    All,
    /// Matches keys present in the set.
    KeysIn(BTreeSet<StratumKey>),
    /// Matches keys absent from the set.
    KeysNotIn(BTreeSet<StratumKey>),
}

impl ClassRule {
    /// True when `key` belongs to the class described by this rule.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            ClassRule::All => true,
            ClassRule::KeysIn(keys) => keys.contains(key),
            ClassRule::KeysNotIn(keys) => !keys.contains(key),
        }
    }
}

/// One class of a partition: a label, a quota share, and a stratum rule.
#[derive(Clone, Debug)]
pub struct ClassSpec {
    /// Unique label for this class.
    pub label: ClassLabel,
    /// Share of the total target allocated to this class. Every class but
    /// the last receives `floor(total * proportion)`; the last receives the
    /// remainder so per-class counts always sum to the total.
    pub proportion: f64,
    /// Predicate selecting the stratum keys this class may draw from.
    pub rule: ClassRule,
}

/// Ordered class partition of the stratum keys.
///
/// Classes must be disjoint over the keys present in a stratum group; the
/// sampler validates that when it resolves the partition against an index.
#[derive(Clone, Debug)]
pub struct ClassPartition {
    classes: Vec<ClassSpec>,
}

impl ClassPartition {
    /// Build a partition, validating its proportions.
    pub fn new(classes: Vec<ClassSpec>) -> Result<Self, SamplerError> {
        if classes.is_empty() {
            return Err(SamplerError::Configuration(
                "class partition must contain at least one class".into(),
            ));
        }
        for class in &classes {
            if !(0.0..=1.0).contains(&class.proportion) {
                return Err(SamplerError::Configuration(format!(
                    "class '{}' proportion {} is outside [0.0, 1.0]",
                    class.label, class.proportion
                )));
            }
        }
        let total: f64 = classes.iter().map(|class| class.proportion).sum();
        if (total - 1.0).abs() > PROPORTION_EPSILON {
            return Err(SamplerError::Configuration(format!(
                "class proportions must sum to 1.0, got {total:.6}"
            )));
        }
        Ok(Self { classes })
    }

    /// Classes in quota order.
    pub fn classes(&self) -> &[ClassSpec] {
        &self.classes
    }

    /// Split `total_target` into per-class sub-targets.
    ///
    /// Floor-truncates every class but the last; the last class absorbs the
    /// remainder, so the returned counts sum to `total_target` exactly.
    pub fn sub_targets(&self, total_target: usize) -> Vec<usize> {
        let mut targets = Vec::with_capacity(self.classes.len());
        let mut assigned = 0usize;
        for (idx, class) in self.classes.iter().enumerate() {
            if idx + 1 == self.classes.len() {
                targets.push(total_target - assigned);
            } else {
                let share = ((total_target as f64) * class.proportion).floor() as usize;
                let share = share.min(total_target - assigned);
                assigned += share;
                targets.push(share);
            }
        }
        targets
    }
}

/// Top-level sampling request.
#[derive(Clone, Debug)]
pub struct SampleSpec {
    /// RNG seed that controls deterministic draw order.
    pub seed: u64,
    /// Total number of unique items to produce.
    pub total_target: usize,
    /// Optional class partition; `None` samples one implicit all-keys class.
    pub partition: Option<ClassPartition>,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            total_target: 0,
            partition: None,
        }
    }
}
