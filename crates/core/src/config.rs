use serde::{Deserialize, Serialize};

/// What a file's rectangle area is proportional to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeMetric {
    /// Total statements in the file.
    #[default]
    Statements,
    /// Total source lines spanned by the file's blocks.
    Lines,
}

/// Constants that shape one render. Every field has a default, so a host
/// can pass a partial JSON object (or none at all).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Gap between sibling boxes.
    pub margin_box: f64,
    /// Inset of a box's children from its border.
    pub padding_box: f64,
    /// Inset of the whole treemap from the surface edge.
    pub padding: f64,
    /// Name of the heat color scale.
    pub palette: String,
    /// `#rrggbb` border color of every box.
    pub border_color: String,
    /// Size given to files without statements.
    pub empty_leaf_size: f64,
    /// Heat given to nodes without any coverage data.
    pub empty_leaf_heat: f64,
    pub size_metric: SizeMetric,
    /// Label font size in pixels.
    pub font_size: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            margin_box: 4.0,
            padding_box: 4.0,
            padding: 16.0,
            palette: "RdYlGn".to_string(),
            border_color: "#808080".to_string(),
            empty_leaf_size: 1.0,
            empty_leaf_heat: 0.5,
            size_metric: SizeMetric::Statements,
            font_size: 10.0,
        }
    }
}

impl RenderConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
