pub mod commands;
pub mod types;

pub use commands::{RenderCommand, RenderSpec, TextAlign};
pub use types::{Color, Point, Rect, Viewport};
