use std::collections::HashSet;

use indexmap::IndexMap;

use crate::config::ClassRule;
use crate::types::{ItemId, StratumKey};

/// Immutable candidate item list for one stratum.
#[derive(Clone, Debug, Default)]
pub struct Pool {
    items: Vec<ItemId>,
}

impl Pool {
    /// Wrap a candidate list.
    pub fn new(items: Vec<ItemId>) -> Self {
        Self { items }
    }

    /// Candidate items in listing order.
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the pool holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Insertion-ordered mapping from stratum key to its pool.
///
/// Built once per run from a directory snapshot and read-only afterwards.
/// Iteration order is the build order, which keeps seeded runs reproducible.
#[derive(Clone, Debug, Default)]
pub struct StratumGroup {
    strata: IndexMap<StratumKey, Pool>,
}

impl StratumGroup {
    pub(crate) fn insert(&mut self, key: StratumKey, pool: Pool) {
        self.strata.insert(key, pool);
    }

    /// Stratum keys in build order.
    pub fn keys(&self) -> impl Iterator<Item = &StratumKey> {
        self.strata.keys()
    }

    /// Pool for one stratum, if present.
    pub fn pool(&self, key: &str) -> Option<&Pool> {
        self.strata.get(key)
    }

    /// True when the group holds no strata.
    pub fn is_empty(&self) -> bool {
        self.strata.is_empty()
    }

    /// Number of strata.
    pub fn stratum_count(&self) -> usize {
        self.strata.len()
    }

    /// Total candidate count across all pools (duplicates included).
    pub fn item_count(&self) -> usize {
        self.strata.values().map(Pool::len).sum()
    }

    /// Stratum keys matching `rule`, in group order.
    pub fn restrict(&self, rule: &ClassRule) -> Vec<&StratumKey> {
        self.strata.keys().filter(|key| rule.matches(key)).collect()
    }

    /// Count of distinct item identifiers reachable through `keys`, excluding
    /// identifiers already in `seen`. Item names can collide across strata,
    /// so this is a set union rather than a pool-length sum.
    pub fn unique_candidates(&self, keys: &[&StratumKey], seen: &HashSet<ItemId>) -> usize {
        let mut distinct: HashSet<&str> = HashSet::new();
        for key in keys {
            if let Some(pool) = self.strata.get(key.as_str()) {
                for item in pool.items() {
                    if !seen.contains(item) {
                        distinct.insert(item.as_str());
                    }
                }
            }
        }
        distinct.len()
    }
}
