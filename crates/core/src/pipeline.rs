//! The fixed render pipeline: profile text in, SVG markup out.
//!
//! Parse → build tree → impute sizes → name nodes → collapse chains →
//! impute heat → resolve palette → lay out → serialize. Each step needs the
//! previous one to succeed and the first failure aborts the render.

use covermap_protocol::{Color, RenderSpec, Viewport};
use thiserror::Error;

use crate::config::RenderConfig;
use crate::model::TreemapNode;
use crate::palette::{HeatColorer, PaletteError, get_palette};
use crate::parsers::{CoverParseError, parse_profiles};
use crate::svg::render_svg;
use crate::treemap::{
    SumSizeImputer, TreeBuildError, TreeBuilder, WeightedHeatImputer, collapse_long_paths,
    set_names_from_paths,
};
use crate::views::TreemapViewBuilder;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("parse: {0}")]
    Parse(#[from] CoverParseError),
    #[error("tree: {0}")]
    Tree(#[from] TreeBuildError),
    #[error("palette: {0}")]
    Palette(#[from] PaletteError),
    #[error("invalid border color {0:?}")]
    InvalidColor(String),
    #[error("viewport {width}x{height} has no area")]
    DegenerateViewport { width: String, height: String },
}

/// Parse `text` and produce the normalized tree: sizes imputed, names set,
/// single-child chains collapsed, heat imputed.
pub fn build_tree(text: &str, config: &RenderConfig) -> Result<TreemapNode, RenderError> {
    let profiles = parse_profiles(text)?;
    let mut tree = TreeBuilder::new(config.size_metric).build(&profiles)?;

    SumSizeImputer {
        empty_leaf_size: config.empty_leaf_size,
    }
    .impute(&mut tree);
    set_names_from_paths(&mut tree);
    collapse_long_paths(&mut tree);
    WeightedHeatImputer {
        empty_leaf_heat: config.empty_leaf_heat,
    }
    .impute(&mut tree);

    tracing::debug!(
        nodes = tree.node_count(),
        size = tree.size_or_zero(),
        heat = tree.heat.unwrap_or_default(),
        "normalized coverage tree"
    );
    Ok(tree)
}

/// Everything up to (not including) serialization.
pub fn build_render_spec(
    text: &str,
    config: &RenderConfig,
    viewport: Viewport,
) -> Result<RenderSpec, RenderError> {
    if viewport.is_degenerate() {
        return Err(RenderError::DegenerateViewport {
            width: viewport.width.to_string(),
            height: viewport.height.to_string(),
        });
    }

    let tree = build_tree(text, config)?;

    let palette = get_palette(&config.palette)?;
    let border = Color::from_hex(&config.border_color)
        .ok_or_else(|| RenderError::InvalidColor(config.border_color.clone()))?;

    let builder = TreemapViewBuilder {
        colorer: HeatColorer { palette },
        border,
        margin_box: config.margin_box,
        padding_box: config.padding_box,
        padding: config.padding,
        font_size: config.font_size,
    };
    Ok(builder.build(&tree, &viewport))
}

/// Run the whole pipeline and return SVG markup sized to `viewport`.
pub fn render_coverage_svg(
    text: &str,
    config: &RenderConfig,
    viewport: Viewport,
) -> Result<String, RenderError> {
    let spec = build_render_spec(text, config, viewport)?;
    Ok(render_svg(&spec))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "mode: set\n\
        example.com/app/main.go:5.13,7.2 2 1\n\
        example.com/app/main.go:9.13,12.2 3 0\n\
        example.com/app/util/strings.go:3.30,5.2 1 1\n";

    #[test]
    fn single_uncovered_block() {
        let tree = build_tree("mode: set\nm/a.go:1.1,2.2 1 0\n", &RenderConfig::default()).unwrap();
        assert!(tree.is_leaf());
        assert_eq!(tree.heat, Some(0.0));
        assert!(tree.size_or_zero() > 0.0);
    }

    #[test]
    fn single_covered_block() {
        let tree = build_tree("mode: count\nm/a.go:1.1,2.2 1 5\n", &RenderConfig::default()).unwrap();
        assert!(tree.is_leaf());
        assert_eq!(tree.heat, Some(1.0));
        assert_eq!(tree.name, "m/a.go");
    }

    #[test]
    fn file_without_statements_gets_floor_size() {
        let tree = build_tree("mode: set\nm/a.go:1.1,2.2 0 0\n", &RenderConfig::default()).unwrap();
        assert_eq!(tree.size, Some(1.0));
        assert_eq!(tree.heat, Some(0.0));
    }

    #[test]
    fn root_aggregates_files() {
        let tree = build_tree(SAMPLE, &RenderConfig::default()).unwrap();
        assert_eq!(tree.name, "example.com/app");
        assert_eq!(tree.size, Some(6.0));
        // (2 covered of 5) weighted by 5, plus 1 of 1 weighted by 1
        assert!((tree.heat.unwrap_or_default() - 0.5).abs() < 1e-9);
        let leaf_sum: f64 = tree.leaves().iter().map(|n| n.size_or_zero()).sum();
        assert_eq!(tree.size, Some(leaf_sum));
    }

    #[test]
    fn file_shadowing_a_directory_still_adds_up() {
        let text = "mode: count\n\
            m/x.go:1.1,2.2 5 1\n\
            m/x.go/y.go:1.1,2.2 3 0\n\
            m/z.go:1.1,2.2 1 1\n";
        let tree = build_tree(text, &RenderConfig::default()).unwrap();
        let leaf_sum: f64 = tree.leaves().iter().map(|n| n.size_or_zero()).sum();
        assert_eq!(leaf_sum, 9.0);
        assert_eq!(tree.size, Some(leaf_sum));
        // 5 of 5 and 1 of 1 covered, 0 of 3
        assert!((tree.heat.unwrap_or_default() - 6.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn renders_svg_with_labels() {
        let svg = render_coverage_svg(SAMPLE, &RenderConfig::default(), Viewport::new(1024.0, 768.0))
            .unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("main.go"));
        assert!(svg.contains("util/strings.go"));
        assert!(svg.contains("example.com/app/util/strings.go (100.0% covered)"));
    }

    #[test]
    fn malformed_profile_aborts() {
        let err = render_coverage_svg("garbage", &RenderConfig::default(), Viewport::new(100.0, 100.0))
            .unwrap_err();
        assert!(matches!(err, RenderError::Parse(_)));
    }

    #[test]
    fn mode_line_only_is_a_tree_error() {
        let err = build_tree("mode: set\n", &RenderConfig::default()).unwrap_err();
        assert_eq!(err, RenderError::Tree(TreeBuildError::NoProfiles));
    }

    #[test]
    fn unknown_palette_aborts() {
        let config = RenderConfig {
            palette: "Nope".into(),
            ..RenderConfig::default()
        };
        let err = build_render_spec(SAMPLE, &config, Viewport::new(100.0, 100.0)).unwrap_err();
        assert!(matches!(err, RenderError::Palette(_)));
    }

    #[test]
    fn bad_border_color_aborts() {
        let config = RenderConfig {
            border_color: "grey".into(),
            ..RenderConfig::default()
        };
        let err = build_render_spec(SAMPLE, &config, Viewport::new(100.0, 100.0)).unwrap_err();
        assert_eq!(err, RenderError::InvalidColor("grey".into()));
    }

    #[test]
    fn degenerate_viewport_aborts() {
        let err = build_render_spec(SAMPLE, &RenderConfig::default(), Viewport::new(0.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, RenderError::DegenerateViewport { .. }));
    }
}
