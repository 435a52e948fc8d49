#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// CLI runners shared by the crate binaries.
pub mod app;
/// Sampling request and class partition types.
pub mod config;
/// Centralized constants used across sampler, CLI, and tests.
pub mod constants;
/// Copy sink trait and filesystem implementation.
pub mod copy;
/// Per-stratum share and skew metrics.
pub mod metrics;
/// Candidate pools and the per-run stratum index.
pub mod pool;
/// Progress side-channel notifications.
pub mod progress;
/// Run orchestration: index, sample, copy.
pub mod run;
/// The stratified unique sampler core.
pub mod sampler;
/// Corpus enumeration interfaces and index construction.
pub mod source;
/// Input transports used by corpora (filesystem today).
pub mod transport;
/// Shared type aliases.
pub mod types;

mod errors;

pub use config::{ClassPartition, ClassRule, ClassSpec, SampleSpec};
pub use copy::{CopySink, FsCopySink};
pub use errors::SamplerError;
pub use pool::{Pool, StratumGroup};
pub use progress::{Progress, TracingProgress};
pub use run::{RunSummary, generate_test_set};
pub use sampler::{DeterministicRng, OutputRecord, sample};
pub use source::{DirectoryLister, InMemoryLister, build_index};
pub use transport::fs::FsCorpus;
pub use types::{ClassLabel, ItemId, StratumKey};
