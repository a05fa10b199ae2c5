//! Named ColorBrewer scales (the 11-class diverging ones plus the 9-class
//! sequential Greys) and the colorer that maps coverage heat onto them.

use covermap_protocol::Color;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("can not get palette {0:?}")]
pub struct PaletteError(pub String);

/// An ordered list of color stops from heat 0 to heat 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    stops: Vec<Color>,
}

const RD_YL_GN: [&str; 11] = [
    "#a50026", "#d73027", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#d9ef8b", "#a6d96a",
    "#66bd63", "#1a9850", "#006837",
];

const RD_BU: [&str; 11] = [
    "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#f7f7f7", "#d1e5f0", "#92c5de",
    "#4393c3", "#2166ac", "#053061",
];

const SPECTRAL: [&str; 11] = [
    "#9e0142", "#d53e4f", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#e6f598", "#abdda4",
    "#66c2a5", "#3288bd", "#5e4fa2",
];

const GREYS: [&str; 9] = [
    "#000000", "#252525", "#525252", "#737373", "#969696", "#bdbdbd", "#d9d9d9", "#f0f0f0",
    "#ffffff",
];

/// Names accepted by [`get_palette`].
pub const PALETTE_NAMES: [&str; 4] = ["RdYlGn", "RdBu", "Spectral", "Greys"];

/// Look up a palette by its ColorBrewer name.
pub fn get_palette(name: &str) -> Result<Palette, PaletteError> {
    let hex: &[&str] = match name {
        "RdYlGn" => &RD_YL_GN,
        "RdBu" => &RD_BU,
        "Spectral" => &SPECTRAL,
        "Greys" => &GREYS,
        _ => return Err(PaletteError(name.to_string())),
    };
    let stops = hex
        .iter()
        .map(|h| Color::from_hex(h))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| PaletteError(name.to_string()))?;
    Ok(Palette { stops })
}

impl Palette {
    /// Interpolated color at `t`, clamped into `0.0..=1.0`. NaN maps to
    /// the midpoint.
    pub fn at(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        match self.stops.as_slice() {
            [] => Color::rgb8(128, 128, 128),
            [only] => *only,
            stops => {
                let scaled = t * (stops.len() - 1) as f64;
                let lo = (scaled.floor() as usize).min(stops.len() - 2);
                let frac = (scaled - lo as f64) as f32;
                stops[lo].lerp(&stops[lo + 1], frac)
            }
        }
    }
}

/// Colors nodes by heat through a palette.
#[derive(Debug, Clone)]
pub struct HeatColorer {
    pub palette: Palette,
}

impl HeatColorer {
    pub fn fill(&self, heat: Option<f64>) -> Color {
        self.palette.at(heat.unwrap_or(0.5))
    }

    /// Black or white, whichever reads better on `background`.
    pub fn text_on(background: &Color) -> Color {
        if background.luminance() > 0.5 {
            Color::rgb8(0, 0, 0)
        } else {
            Color::rgb8(255, 255, 255)
        }
    }
}
