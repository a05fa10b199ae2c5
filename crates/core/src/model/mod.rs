pub mod profile;
pub mod tree;

pub use profile::{CoverMode, CoverageProfile, ProfileBlock};
pub use tree::TreemapNode;
