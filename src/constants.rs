/// Constants used by sampler runtime behavior and labeling.
pub mod sampler {
    /// Default RNG seed used when a run does not set one explicitly.
    pub const DEFAULT_SEED: u64 = 42;
    /// Maximum rejected draws tolerated for one output record before the run
    /// fails as exhausted. The pre-flight uniqueness check makes hitting this
    /// unreachable for uniform randomness, so it only trips on a degenerate
    /// injected RNG.
    pub const REJECTION_ATTEMPT_LIMIT: usize = 100_000;
    /// Class label used when sampling without a partition.
    pub const UNPARTITIONED_CLASS: &str = "all";
    /// Tolerance when validating that class proportions sum to 1.0.
    pub const PROPORTION_EPSILON: f64 = 1e-6;
}

/// Constants used by the CLI preset partitions.
pub mod app {
    /// Class label for the flat-pool side of a mixed-resolution run.
    pub const CLASS_LABEL_720: &str = "720p";
    /// Class label for the nested-pool side of a mixed-resolution run.
    pub const CLASS_LABEL_1080: &str = "1080p";
    /// Class label for daytime strata in a day/night run.
    pub const CLASS_LABEL_DAY: &str = "day";
    /// Class label for night strata in a day/night run.
    pub const CLASS_LABEL_NIGHT: &str = "night";
}
