//! Platform-independent half of covermap: turns Go-style coverage profile
//! text into a colored, squarified treemap and serializes it as SVG.

pub mod config;
pub mod layout;
pub mod model;
pub mod palette;
pub mod parsers;
pub mod pipeline;
pub mod svg;
pub mod treemap;
pub mod views;

pub use config::{RenderConfig, SizeMetric};
pub use pipeline::{RenderError, build_render_spec, build_tree, render_coverage_svg};
