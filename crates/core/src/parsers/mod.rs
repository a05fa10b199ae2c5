pub mod gocover;

pub use gocover::{CoverParseError, parse_profiles};
