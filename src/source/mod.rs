//! Corpus enumeration interfaces and index construction.
//!
//! Ownership model:
//! - `DirectoryLister` is the index-facing boundary over a corpus snapshot.
//! - `build_index` materializes the snapshot into a `StratumGroup` once per
//!   run; the group is read-only for the remainder of the run.

use indexmap::IndexMap;
use tracing::warn;

use crate::errors::SamplerError;
use crate::pool::{Pool, StratumGroup};
use crate::types::{ItemId, StratumKey};

/// Boundary contract for enumerating a corpus snapshot.
///
/// Implementations must present a consistent, static view for the duration
/// of one run; the index is built exactly once and never re-listed.
pub trait DirectoryLister {
    /// Stratum keys available in this corpus.
    fn list_strata(&self) -> Result<Vec<StratumKey>, SamplerError>;
    /// Candidate item identifiers for one stratum.
    fn list_items(&self, stratum: &str) -> Result<Vec<ItemId>, SamplerError>;
}

/// Build the in-memory stratum group from one or more listers.
///
/// Empty strata can never satisfy a draw, so they are excluded here with a
/// warning rather than tripping the sampler later. Duplicate stratum keys
/// across listers are rejected because the copy side could not resolve which
/// corpus a record came from. An index with no remaining stratum is an error.
pub fn build_index(listers: &[&dyn DirectoryLister]) -> Result<StratumGroup, SamplerError> {
    let mut group = StratumGroup::default();
    for lister in listers {
        for key in lister.list_strata()? {
            if group.pool(&key).is_some() {
                return Err(SamplerError::Configuration(format!(
                    "duplicate stratum key '{key}' across corpora"
                )));
            }
            let items = lister.list_items(&key)?;
            if items.is_empty() {
                warn!(stratum = %key, "excluding empty stratum from index");
                continue;
            }
            group.insert(key, Pool::new(items));
        }
    }
    if group.is_empty() {
        return Err(SamplerError::EmptyPool {
            scope: "index".into(),
        });
    }
    Ok(group)
}

/// In-memory lister used by tests and embedders that already hold a listing.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLister {
    strata: IndexMap<StratumKey, Vec<ItemId>>,
}

impl InMemoryLister {
    /// Create an empty lister.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stratum with the given candidate items.
    pub fn with_stratum(mut self, key: impl Into<StratumKey>, items: &[&str]) -> Self {
        self.strata.insert(
            key.into(),
            items.iter().map(|item| (*item).to_string()).collect(),
        );
        self
    }
}

impl DirectoryLister for InMemoryLister {
    fn list_strata(&self) -> Result<Vec<StratumKey>, SamplerError> {
        Ok(self.strata.keys().cloned().collect())
    }

    fn list_items(&self, stratum: &str) -> Result<Vec<ItemId>, SamplerError> {
        Ok(self.strata.get(stratum).cloned().unwrap_or_default())
    }
}
