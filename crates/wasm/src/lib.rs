pub mod logging;
pub mod orchestrator;
pub mod page;
pub mod single_flight;

#[cfg(target_arch = "wasm32")]
mod events;

use covermap_core::RenderConfig;
use covermap_protocol::Viewport;
use wasm_bindgen::prelude::*;

pub use orchestrator::{Orchestrator, ReadError, Trigger, ViewportState, WindowMetrics};
pub use page::{LogLevel, Page, PageIds};
pub use single_flight::{ReadTicket, SingleFlight};

/// Page entry point: route `tracing` events to the browser console, then
/// wire the DOM events with the default configuration.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::install_console_subscriber();
    events::install(PageIds::default(), RenderConfig::default())
        .map_err(|e| JsValue::from_str(&format!("covermap: {e:#}")))
}

fn render_with(
    text: &str,
    width: f64,
    height: f64,
    config: &RenderConfig,
) -> Result<String, JsError> {
    covermap_core::render_coverage_svg(text, config, Viewport::new(width, height))
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Render a coverage profile to SVG markup with the default configuration.
#[wasm_bindgen]
pub fn render_coverage_svg(text: &str, width: f64, height: f64) -> Result<String, JsError> {
    render_with(text, width, height, &RenderConfig::default())
}

/// Render with a JSON object overriding any `RenderConfig` fields, e.g.
/// `{"palette": "RdBu", "size_metric": "lines"}`.
#[wasm_bindgen]
pub fn render_coverage_svg_with_config(
    text: &str,
    width: f64,
    height: f64,
    config_json: &str,
) -> Result<String, JsError> {
    let config = RenderConfig::from_json(config_json).map_err(|e| JsError::new(&e.to_string()))?;
    render_with(text, width, height, &config)
}
