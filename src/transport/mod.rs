/// Filesystem corpus enumeration and item path resolution.
pub mod fs;
