/// Identifier for one stratum (a labeled pool of candidate frames).
/// Examples: `2023-01-14_drive_03`, `720`
pub type StratumKey = String;
/// Candidate item identifier within a stratum (a frame file name).
/// Example: `frame_000184.jpg`
pub type ItemId = String;
/// Label for a sampling class (a group of strata sharing one quota).
/// Examples: `day`, `night`, `720p`, `1080p`
pub type ClassLabel = String;
