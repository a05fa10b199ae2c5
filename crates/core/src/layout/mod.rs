pub mod squarify;

pub use squarify::{Weighted, squarify};
