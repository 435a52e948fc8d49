use std::io;

use thiserror::Error;

use crate::types::{ClassLabel, ItemId, StratumKey};

/// Error type for index construction, sampling, and copy failures.
#[derive(Debug, Error)]
pub enum SamplerError {
    /// No candidate items exist for the named scope (a class, a stratum, or
    /// the whole index).
    #[error("no candidate items available for '{scope}'")]
    EmptyPool {
        /// Class label, stratum key, or `"index"`.
        scope: String,
    },
    /// A class quota cannot be met by the unique candidates still reachable.
    #[error(
        "class '{class}' requested {requested} unique items but only {available} are reachable"
    )]
    Exhausted {
        /// Class whose quota is infeasible.
        class: ClassLabel,
        /// Unique candidates still reachable for this class.
        available: usize,
        /// Items the class still needs.
        requested: usize,
    },
    /// Copying one selected item into the destination failed.
    #[error("copy of '{item}' from stratum '{stratum}' failed: {reason}")]
    CopySink {
        /// Stratum the record was drawn from.
        stratum: StratumKey,
        /// Item that failed to copy.
        item: ItemId,
        /// Underlying failure description.
        reason: String,
    },
    /// Filesystem error while listing a corpus or preparing the destination.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Invalid sampling request or corpus arrangement.
    #[error("configuration error: {0}")]
    Configuration(String),
}
