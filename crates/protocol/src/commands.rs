use serde::{Deserialize, Serialize};

use crate::types::{Color, Point, Rect};

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` for each treemap. Renderers consume
/// this list sequentially, and each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle for one tree node. `path` is the node's full
    /// path and `tooltip` its hover text.
    DrawRect {
        rect: Rect,
        fill: Color,
        border: Option<Color>,
        path: String,
        tooltip: Option<String>,
    },

    /// Draw a text string at a position.
    DrawText {
        position: Point,
        text: String,
        color: Color,
        font_size: f64,
        align: TextAlign,
    },

    /// Begin a logical group (one per tree node with children). Renderers
    /// may map this to nesting in the output document.
    BeginGroup { id: String },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Geometry and color for every visible node of one treemap, sized for a
/// specific surface. Built once and consumed by a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSpec {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<RenderCommand>,
}

impl RenderSpec {
    /// All `DrawRect` commands, in paint order.
    pub fn rects(&self) -> impl Iterator<Item = (&Rect, &str)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            RenderCommand::DrawRect { rect, path, .. } => Some((rect, path.as_str())),
            _ => None,
        })
    }
}
