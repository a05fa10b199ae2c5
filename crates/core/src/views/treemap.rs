use covermap_protocol::{Color, Point, Rect, RenderCommand, RenderSpec, TextAlign, Viewport};

use crate::layout::{Weighted, squarify};
use crate::model::TreemapNode;
use crate::palette::HeatColorer;

/// Boxes narrower or shorter than this are not drawn, nor are their
/// descendants.
const MIN_BOX_SIDE: f64 = 1.0;

/// Rough glyph advance as a fraction of the font size, for fitting labels
/// without a text shaper.
const CHAR_WIDTH_RATIO: f64 = 0.6;

/// Turns an imputed coverage tree into nested, heat-colored boxes.
#[derive(Debug, Clone)]
pub struct TreemapViewBuilder {
    pub colorer: HeatColorer,
    pub border: Color,
    /// Gap between sibling boxes.
    pub margin_box: f64,
    /// Inset of children inside their parent's border.
    pub padding_box: f64,
    /// Inset of the root box from the surface edge.
    pub padding: f64,
    pub font_size: f64,
}

impl TreemapViewBuilder {
    pub fn build(&self, root: &TreemapNode, viewport: &Viewport) -> RenderSpec {
        let mut commands = Vec::new();
        let p = self.padding;
        let bounds = Rect::new(0.0, 0.0, viewport.width, viewport.height).inset(p, p, p, p);
        self.layout_node(root, bounds, &mut commands);

        tracing::trace!(commands = commands.len(), "built treemap render spec");
        RenderSpec {
            width: viewport.width,
            height: viewport.height,
            commands,
        }
    }

    fn layout_node(&self, node: &TreemapNode, rect: Rect, commands: &mut Vec<RenderCommand>) {
        if rect.w < MIN_BOX_SIDE || rect.h < MIN_BOX_SIDE {
            return;
        }

        let fill = self.colorer.fill(node.heat);
        let tooltip = match node.heat {
            Some(heat) => format!("{} ({:.1}% covered)", node.path, heat * 100.0),
            None => node.path.clone(),
        };

        if !node.is_leaf() {
            commands.push(RenderCommand::BeginGroup {
                id: node.path.clone(),
            });
        }

        commands.push(RenderCommand::DrawRect {
            rect,
            fill,
            border: Some(self.border),
            path: node.path.clone(),
            tooltip: Some(tooltip),
        });

        if node.is_leaf() {
            self.push_leaf_label(node, &rect, &fill, commands);
            return;
        }

        let pad = self.padding_box;
        let band = self.font_size + pad;
        let inner = if rect.h >= band + 2.0 * pad + MIN_BOX_SIDE {
            self.push_header_label(node, &rect, &fill, commands);
            rect.inset(band, pad, pad, pad)
        } else {
            rect.inset(pad, pad, pad, pad)
        };

        let mut order: Vec<usize> = (0..node.children.len()).collect();
        order.sort_by(|&a, &b| {
            let (ca, cb) = (&node.children[a], &node.children[b]);
            cb.size_or_zero()
                .total_cmp(&ca.size_or_zero())
                .then_with(|| ca.path.cmp(&cb.path))
        });
        let items: Vec<Weighted> = order
            .into_iter()
            .map(|id| Weighted {
                id,
                value: node.children[id].size_or_zero(),
            })
            .collect();

        let half = self.margin_box / 2.0;
        for (id, child_rect) in squarify(&items, &inner) {
            let child_rect = child_rect.inset(half, half, half, half);
            self.layout_node(&node.children[id], child_rect, commands);
        }

        commands.push(RenderCommand::EndGroup);
    }

    /// Directory label in the band above its children.
    fn push_header_label(
        &self,
        node: &TreemapNode,
        rect: &Rect,
        fill: &Color,
        commands: &mut Vec<RenderCommand>,
    ) {
        let avail = rect.w - 2.0 * self.padding_box;
        let Some(text) = fit_label(&node.name, avail, self.font_size) else {
            return;
        };
        commands.push(RenderCommand::DrawText {
            position: Point::new(
                rect.x + self.padding_box,
                rect.y + self.padding_box / 2.0 + self.font_size * 0.85,
            ),
            text,
            color: HeatColorer::text_on(fill),
            font_size: self.font_size,
            align: TextAlign::Left,
        });
    }

    /// File label centered in its box.
    fn push_leaf_label(
        &self,
        node: &TreemapNode,
        rect: &Rect,
        fill: &Color,
        commands: &mut Vec<RenderCommand>,
    ) {
        if rect.h < self.font_size + 2.0 {
            return;
        }
        let Some(text) = fit_label(&node.name, rect.w - 4.0, self.font_size) else {
            return;
        };
        commands.push(RenderCommand::DrawText {
            position: Point::new(
                rect.x + rect.w / 2.0,
                rect.y + rect.h / 2.0 + self.font_size * 0.35,
            ),
            text,
            color: HeatColorer::text_on(fill),
            font_size: self.font_size,
            align: TextAlign::Center,
        });
    }
}

/// Truncate `label` with an ellipsis to fit `width` pixels. `None` when not
/// even three characters fit.
fn fit_label(label: &str, width: f64, font_size: f64) -> Option<String> {
    if label.is_empty() || width <= 0.0 {
        return None;
    }
    let max_chars = (width / (font_size * CHAR_WIDTH_RATIO)) as usize;
    let len = label.chars().count();
    if len <= max_chars {
        Some(label.to_string())
    } else if max_chars >= 3 {
        let truncated: String = label.chars().take(max_chars - 1).collect();
        Some(format!("{truncated}…"))
    } else {
        None
    }
}
