//! DOM event wiring. Every callback turns its event into a [`Trigger`] and
//! hands it to the shared [`SingleFlight`]; the only suspension point is the
//! file read, and nothing is borrowed across it.

use std::rc::Rc;

use anyhow::{Context, Result, anyhow};
use covermap_core::RenderConfig;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, DragEvent, File, HtmlElement, Window};

use crate::orchestrator::{Orchestrator, ReadError, Trigger, WindowMetrics};
use crate::page::{DomPage, LogLevel, Page, PageIds};
use crate::single_flight::SingleFlight;

type Shared = Rc<SingleFlight<DomPage>>;

fn html_element(document: &Document, id: &str) -> Result<HtmlElement> {
    document
        .get_element_by_id(id)
        .with_context(|| format!("no element with id '{id}'"))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| anyhow!("element '{id}' is not an HTML element"))
}

fn window_metrics(window: &Window, document: &Document, ids: &PageIds) -> Result<WindowMetrics> {
    let dimension = |v: std::result::Result<JsValue, JsValue>, what: &str| {
        v.ok()
            .and_then(|v| v.as_f64())
            .with_context(|| format!("window.{what} unavailable"))
    };
    let output = html_element(document, &ids.output_container)?;
    let file_input = html_element(document, &ids.file_input)?;
    Ok(WindowMetrics {
        inner_width: dimension(window.inner_width(), "innerWidth")?,
        inner_height: dimension(window.inner_height(), "innerHeight")?,
        output_offset_top: f64::from(output.offset_top()),
        file_input_offset_height: f64::from(file_input.offset_height()),
    })
}

async fn read_text(file: File) -> Result<String, ReadError> {
    let value = JsFuture::from(file.text())
        .await
        .map_err(|e| ReadError::Failed(format!("{e:?}")))?;
    value.as_string().ok_or(ReadError::NotText)
}

/// Wire drag/drop on the drop target and resize on the window, then run
/// one resize so the surface is sized before the first drop.
pub fn install(ids: PageIds, config: RenderConfig) -> Result<()> {
    let window = web_sys::window().context("no window")?;
    let document = window.document().context("no document")?;
    let file_input = html_element(&document, &ids.file_input)?;
    // Fail early if the output container is missing.
    html_element(&document, &ids.output_container)?;

    let page = DomPage::new(document.clone(), ids.clone());
    page.log(LogLevel::Info, "ready; drop a coverage profile");
    let shared: Shared = Rc::new(SingleFlight::new(Orchestrator::new(page, config)));

    let s = shared.clone();
    let on_drag_over = Closure::<dyn FnMut(DragEvent) -> bool>::new(move |event: DragEvent| {
        event.prevent_default();
        s.dispatch(Trigger::DragOver);
        false
    });
    file_input.set_ondragover(Some(on_drag_over.as_ref().unchecked_ref()));
    on_drag_over.forget();

    let s = shared.clone();
    let on_drag_end = Closure::<dyn FnMut(DragEvent) -> bool>::new(move |_event: DragEvent| {
        s.dispatch(Trigger::DragEnd);
        false
    });
    file_input.set_ondragend(Some(on_drag_end.as_ref().unchecked_ref()));
    file_input.set_ondragleave(Some(on_drag_end.as_ref().unchecked_ref()));
    on_drag_end.forget();

    let s = shared.clone();
    let on_drop = Closure::<dyn FnMut(DragEvent) -> bool>::new(move |event: DragEvent| {
        event.prevent_default();
        let file = event
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0));
        let ticket = s.begin_file_read();
        let s = s.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = match file {
                Some(file) => read_text(file).await,
                None => Err(ReadError::NoFile),
            };
            s.file_loaded(ticket, result);
        });
        false
    });
    file_input.set_ondrop(Some(on_drop.as_ref().unchecked_ref()));
    on_drop.forget();

    let s = shared.clone();
    let resize_window = window.clone();
    let on_resize = Closure::<dyn FnMut() -> bool>::new(move || {
        let metrics = match window_metrics(&resize_window, &document, &ids) {
            Ok(metrics) => metrics,
            Err(e) => {
                web_sys::console::warn_1(&format!("covermap: {e:#}").into());
                return false;
            }
        };
        s.dispatch(Trigger::Resize(metrics));
        false
    });
    window.set_onresize(Some(on_resize.as_ref().unchecked_ref()));

    // Size the surface once up front.
    let startup: &js_sys::Function = on_resize.as_ref().unchecked_ref();
    startup
        .call0(&JsValue::NULL)
        .map_err(|e| anyhow!("initial resize failed: {e:?}"))?;
    on_resize.forget();

    Ok(())
}
