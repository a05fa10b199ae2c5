use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Element ids and classes the host page must provide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageIds {
    /// Drop target, hidden after the first successful render.
    pub file_input: String,
    /// Receives the SVG markup.
    pub output_container: String,
    /// Optional; shows render errors when present.
    pub error_banner: String,
    /// Class set on the drop target while a drag hovers over it.
    pub hover_class: String,
}

impl Default for PageIds {
    fn default() -> Self {
        Self {
            file_input: "file-input".to_string(),
            output_container: "output-container".to_string(),
            error_banner: "error-banner".to_string(),
            hover_class: "file-input-hover".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// The DOM side effects the orchestrator needs, kept behind a trait so the
/// render flow runs (and is tested) without a browser.
pub trait Page {
    fn set_drop_hover(&mut self, hover: bool) -> Result<()>;
    /// Replace the output container's content with `svg`.
    fn show_output(&mut self, svg: &str) -> Result<()>;
    fn hide_file_input(&mut self) -> Result<()>;
    fn show_error(&mut self, message: &str) -> Result<()>;
    fn clear_error(&mut self) -> Result<()>;
    fn log(&self, level: LogLevel, message: &str);
}

#[cfg(target_arch = "wasm32")]
pub use dom::DomPage;

#[cfg(target_arch = "wasm32")]
mod dom {
    use anyhow::{Context, Result, anyhow};
    use wasm_bindgen::JsCast;
    use web_sys::{Document, HtmlElement};

    use super::{LogLevel, Page, PageIds};

    /// `Page` backed by the live document.
    pub struct DomPage {
        document: Document,
        ids: PageIds,
    }

    impl DomPage {
        pub fn new(document: Document, ids: PageIds) -> Self {
            Self { document, ids }
        }

        pub fn ids(&self) -> &PageIds {
            &self.ids
        }

        fn element(&self, id: &str) -> Result<HtmlElement> {
            self.document
                .get_element_by_id(id)
                .with_context(|| format!("no element with id '{id}'"))?
                .dyn_into::<HtmlElement>()
                .map_err(|_| anyhow!("element '{id}' is not an HTML element"))
        }

        fn set_display(&self, id: &str, value: &str) -> Result<()> {
            self.element(id)?
                .style()
                .set_property("display", value)
                .map_err(|e| anyhow!("setting display on '{id}': {e:?}"))
        }
    }

    impl Page for DomPage {
        fn set_drop_hover(&mut self, hover: bool) -> Result<()> {
            let class = if hover { self.ids.hover_class.as_str() } else { "" };
            self.element(&self.ids.file_input)?.set_class_name(class);
            Ok(())
        }

        fn show_output(&mut self, svg: &str) -> Result<()> {
            self.element(&self.ids.output_container)?.set_inner_html(svg);
            Ok(())
        }

        fn hide_file_input(&mut self) -> Result<()> {
            self.set_display(&self.ids.file_input, "none")
        }

        fn show_error(&mut self, message: &str) -> Result<()> {
            // The banner is optional; the console always gets the message.
            let Some(banner) = self.document.get_element_by_id(&self.ids.error_banner) else {
                return Ok(());
            };
            banner.set_text_content(Some(message));
            self.set_display(&self.ids.error_banner, "block")
        }

        fn clear_error(&mut self) -> Result<()> {
            let Some(banner) = self.document.get_element_by_id(&self.ids.error_banner) else {
                return Ok(());
            };
            banner.set_text_content(None);
            self.set_display(&self.ids.error_banner, "none")
        }

        fn log(&self, level: LogLevel, message: &str) {
            let message = format!("covermap: {message}").into();
            match level {
                LogLevel::Info => web_sys::console::log_1(&message),
                LogLevel::Warn => web_sys::console::warn_1(&message),
                LogLevel::Error => web_sys::console::error_1(&message),
            }
        }
    }
}
