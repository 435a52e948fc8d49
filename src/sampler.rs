use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::config::{ClassRule, SampleSpec};
use crate::constants::sampler::{REJECTION_ATTEMPT_LIMIT, UNPARTITIONED_CLASS};
use crate::errors::SamplerError;
use crate::pool::StratumGroup;
use crate::progress::Progress;
use crate::types::{ClassLabel, ItemId, StratumKey};

/// One successful draw, in draw order: the class it was counted toward, the
/// stratum it came from, and the selected item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    /// Class whose quota this record filled.
    pub class: ClassLabel,
    /// Stratum the item was drawn from.
    pub stratum: StratumKey,
    /// Selected item identifier, unique across the whole run.
    pub item: ItemId,
}

/// Splitmix64 generator behind every seeded run.
///
/// A run's entire draw sequence is a pure function of the seed and the index
/// contents, so re-running with the same seed against an unchanged corpus
/// selects the same frames. The single `u64` state keeps the seed trivially
/// portable across machines and log lines.
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    /// Start a sequence at `seed`.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    // Standard splitmix64 step (Steele et al., golden-ratio increment).
    fn advance(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl rand::RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        self.advance() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.advance()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.advance().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

struct ResolvedClass<'a> {
    label: ClassLabel,
    sub_target: usize,
    keys: Vec<&'a StratumKey>,
}

/// Produce `spec.total_target` distinct items from `group`.
///
/// Each draw picks a stratum key uniformly at random from the class's
/// restricted key set (with replacement across draws), then an item uniformly
/// from that stratum's pool; draws that hit the global seen set are rejected
/// and retried. The implied per-item probability is therefore uniform over
/// strata first and items second, not uniform over the whole corpus.
///
/// Before the first draw of each class, the number of unique candidates
/// reachable through the class's keys (minus items already selected by
/// earlier classes) is checked against the class sub-target, so an infeasible
/// request fails with [`SamplerError::Exhausted`] instead of retrying
/// forever. Output order is draw order, with all of one class's records
/// preceding the next class's.
pub fn sample<R, P>(
    group: &StratumGroup,
    spec: &SampleSpec,
    rng: &mut R,
    progress: &P,
) -> Result<Vec<OutputRecord>, SamplerError>
where
    R: Rng + ?Sized,
    P: Progress + ?Sized,
{
    let classes = resolve_classes(group, spec)?;
    let mut seen: HashSet<ItemId> = HashSet::new();
    let mut output: Vec<OutputRecord> = Vec::with_capacity(spec.total_target);
    for class in &classes {
        let reachable = group.unique_candidates(&class.keys, &seen);
        if reachable < class.sub_target {
            return Err(SamplerError::Exhausted {
                class: class.label.clone(),
                available: reachable,
                requested: class.sub_target,
            });
        }
        progress.on_class_start(&class.label, class.sub_target);
        let mut produced = 0usize;
        while produced < class.sub_target {
            let remaining = class.sub_target - produced;
            let record = draw_unique(group, class, remaining, &seen, rng, progress)?;
            seen.insert(record.item.clone());
            produced += 1;
            progress.on_draw(output.len() + 1, spec.total_target, &record);
            output.push(record);
        }
    }
    Ok(output)
}

/// Rejection-sample one record not yet in `seen`.
fn draw_unique<R, P>(
    group: &StratumGroup,
    class: &ResolvedClass<'_>,
    remaining: usize,
    seen: &HashSet<ItemId>,
    rng: &mut R,
    progress: &P,
) -> Result<OutputRecord, SamplerError>
where
    R: Rng + ?Sized,
    P: Progress + ?Sized,
{
    for _ in 0..REJECTION_ATTEMPT_LIMIT {
        let Some(stratum) = class.keys.choose(rng) else {
            return Err(SamplerError::EmptyPool {
                scope: class.label.clone(),
            });
        };
        let Some(pool) = group.pool(stratum) else {
            return Err(SamplerError::EmptyPool {
                scope: (*stratum).clone(),
            });
        };
        let Some(item) = pool.items().choose(rng) else {
            return Err(SamplerError::EmptyPool {
                scope: (*stratum).clone(),
            });
        };
        if seen.contains(item) {
            progress.on_reject(stratum, item);
            continue;
        }
        return Ok(OutputRecord {
            class: class.label.clone(),
            stratum: (*stratum).clone(),
            item: item.clone(),
        });
    }
    Err(SamplerError::Exhausted {
        class: class.label.clone(),
        available: group.unique_candidates(&class.keys, seen),
        requested: remaining,
    })
}

/// Resolve the partition (or the implicit all-keys class) against the group.
///
/// A stratum key matched by more than one class would break the disjointness
/// the quota math relies on, so overlap is a configuration error. A class
/// with a positive sub-target but no matching strata can never be satisfied
/// and fails as an empty pool before any draw happens.
fn resolve_classes<'a>(
    group: &'a StratumGroup,
    spec: &SampleSpec,
) -> Result<Vec<ResolvedClass<'a>>, SamplerError> {
    let Some(partition) = &spec.partition else {
        return Ok(vec![ResolvedClass {
            label: UNPARTITIONED_CLASS.into(),
            sub_target: spec.total_target,
            keys: group.restrict(&ClassRule::All),
        }]);
    };
    for key in group.keys() {
        let matches = partition
            .classes()
            .iter()
            .filter(|class| class.rule.matches(key))
            .count();
        if matches > 1 {
            return Err(SamplerError::Configuration(format!(
                "stratum key '{key}' matches more than one class"
            )));
        }
    }
    let sub_targets = partition.sub_targets(spec.total_target);
    let mut resolved = Vec::with_capacity(partition.classes().len());
    for (class, sub_target) in partition.classes().iter().zip(sub_targets) {
        let keys = group.restrict(&class.rule);
        if keys.is_empty() && sub_target > 0 {
            return Err(SamplerError::EmptyPool {
                scope: class.label.clone(),
            });
        }
        resolved.push(ResolvedClass {
            label: class.label.clone(),
            sub_target,
            keys,
        });
    }
    Ok(resolved)
}
