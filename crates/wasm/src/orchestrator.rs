use covermap_core::{RenderConfig, RenderError, render_coverage_svg};
use covermap_protocol::Viewport;

use thiserror::Error;

use crate::page::{LogLevel, Page};

/// Computed heights at or below this mean the page layout has collapsed;
/// such resizes are ignored.
pub const MIN_RENDER_HEIGHT: f64 = 4.0;

/// Mutable state of one page session.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    pub width: f64,
    pub height: f64,
    pub margin_box: f64,
    pub padding_box: f64,
    pub padding: f64,
    /// Text of the most recently dropped file, once one has been read.
    pub file_text: Option<String>,
}

/// Raw window and element measurements taken in the resize handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowMetrics {
    pub inner_width: f64,
    pub inner_height: f64,
    /// `offsetTop` of the output container.
    pub output_offset_top: f64,
    /// `offsetHeight` of the drop target.
    pub file_input_offset_height: f64,
}

impl WindowMetrics {
    /// Surface size for the treemap, or `None` when the layout is collapsed.
    pub fn surface(&self) -> Option<Viewport> {
        let height =
            self.inner_height - (self.output_offset_top - self.file_input_offset_height);
        (height > MIN_RENDER_HEIGHT).then(|| Viewport::new(self.inner_width, height))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// The drop carried no files.
    #[error("no file in drop")]
    NoFile,
    /// The browser failed to read the file.
    #[error("could not read file: {0}")]
    Failed(String),
    /// The file's content is not text.
    #[error("file is not text")]
    NotText,
}

/// Something that happened on the page and may change the session state.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    DragOver,
    DragEnd,
    Resize(WindowMetrics),
    /// A file read finished.
    FileLoaded(Result<String, ReadError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Collapsed layout; nothing changed.
    Skipped,
    Applied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// No file has been loaded yet.
    Idle,
    Rendered,
    /// Rendering failed; the previous output is still shown.
    Failed,
}

/// Owns the session state and reruns the pipeline whenever a trigger
/// (resize, completed file read) changes it.
///
/// A failed render never clears the display: the last good output stays,
/// the error goes to the page, and `file_text` rolls back to the last text
/// that rendered, so later resizes do not replay a broken file.
pub struct Orchestrator<P: Page> {
    state: ViewportState,
    config: RenderConfig,
    page: P,
    last_good_text: Option<String>,
}

impl<P: Page> Orchestrator<P> {
    pub fn new(page: P, config: RenderConfig) -> Self {
        Self {
            state: ViewportState {
                width: 0.0,
                height: 0.0,
                margin_box: config.margin_box,
                padding_box: config.padding_box,
                padding: config.padding,
                file_text: None,
            },
            config,
            page,
            last_good_text: None,
        }
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn on_drag_over(&mut self) {
        self.apply(Trigger::DragOver);
    }

    pub fn on_drag_end(&mut self) {
        self.apply(Trigger::DragEnd);
    }

    pub fn on_resize(&mut self, metrics: WindowMetrics) -> ResizeOutcome {
        if self.apply(Trigger::Resize(metrics)) {
            self.render();
            ResizeOutcome::Applied
        } else {
            ResizeOutcome::Skipped
        }
    }

    /// Continuation of a file read: store the text and render it.
    pub fn on_file_loaded(&mut self, result: Result<String, ReadError>) {
        if self.apply(Trigger::FileLoaded(result)) {
            self.render();
        }
    }

    /// Fold `trigger` into the session state without rendering. Returns
    /// whether the state changed in a way that needs a new render.
    pub fn apply(&mut self, trigger: Trigger) -> bool {
        match trigger {
            Trigger::DragOver => {
                self.set_hover(true);
                false
            }
            Trigger::DragEnd => {
                self.set_hover(false);
                false
            }
            Trigger::Resize(metrics) => {
                let Some(surface) = metrics.surface() else {
                    return false;
                };
                self.state.width = surface.width;
                self.state.height = surface.height;
                true
            }
            Trigger::FileLoaded(result) => {
                self.set_hover(false);
                match result {
                    Ok(text) => {
                        self.page
                            .log(LogLevel::Info, &format!("loaded {} bytes", text.len()));
                        self.state.file_text = Some(text);
                        true
                    }
                    Err(e) => {
                        self.report(&e.to_string());
                        false
                    }
                }
            }
        }
    }

    fn set_hover(&mut self, hover: bool) {
        if let Err(e) = self.page.set_drop_hover(hover) {
            self.page.log(LogLevel::Warn, &format!("{e:#}"));
        }
    }

    /// Rerun the whole pipeline against the current state and swap the
    /// output. A no-op until a file has been loaded.
    pub fn render(&mut self) -> RenderOutcome {
        let Some(text) = self.state.file_text.as_deref() else {
            return RenderOutcome::Idle;
        };
        tracing::debug!(
            width = self.state.width,
            height = self.state.height,
            "rerunning pipeline"
        );

        match self.run_pipeline(text) {
            Ok(svg) => {
                self.last_good_text = self.state.file_text.clone();
                if let Err(e) = self.swap_output(&svg) {
                    self.page.log(LogLevel::Error, &format!("{e:#}"));
                    return RenderOutcome::Failed;
                }
                RenderOutcome::Rendered
            }
            Err(e) => {
                self.state.file_text = self.last_good_text.clone();
                self.report(&format!("render failed: {e}"));
                RenderOutcome::Failed
            }
        }
    }

    fn run_pipeline(&self, text: &str) -> Result<String, RenderError> {
        let config = RenderConfig {
            margin_box: self.state.margin_box,
            padding_box: self.state.padding_box,
            padding: self.state.padding,
            ..self.config.clone()
        };
        render_coverage_svg(
            text,
            &config,
            Viewport::new(self.state.width, self.state.height),
        )
    }

    fn swap_output(&mut self, svg: &str) -> anyhow::Result<()> {
        self.page.show_output(svg)?;
        self.page.hide_file_input()?;
        self.page.clear_error()?;
        Ok(())
    }

    fn report(&mut self, message: &str) {
        self.page.log(LogLevel::Error, message);
        if let Err(e) = self.page.show_error(message) {
            self.page.log(LogLevel::Warn, &format!("{e:#}"));
        }
    }
}
