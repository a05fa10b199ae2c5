//! Coverage tree construction and the passes that normalize it before
//! layout: size imputation, naming, chain collapsing and heat imputation.

pub mod build;
pub mod impute;
pub mod names;

pub use build::{MULTI_ROOT_PATH, OWN_STATEMENTS_SUFFIX, TreeBuildError, TreeBuilder};
pub use impute::{SumSizeImputer, WeightedHeatImputer};
pub use names::{collapse_long_paths, set_names_from_paths};
