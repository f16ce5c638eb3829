//! WebAssembly bindings for Visualmaker
//!
//! Browser implementations of the collaborator traits and a `WebEditor`
//! class that a page drives from its event handlers:
//!
//! - [`MermaidService`] calls the page's global `mermaid` object
//! - [`ElementSurface`] inserts rendered graphics under a mount element as
//!   parsed nodes
//! - [`BrowserClipboard`] uses `navigator.clipboard`
//! - [`Html2CanvasCapture`] snapshots the mount element with the page's
//!   global `html2canvas`
//! - [`AnchorDownload`] triggers a download through a temporary link
//!
//! ```js
//! import init, { WebEditor } from "./pkg/visualmaker.js";
//!
//! await init();
//! const editor = new WebEditor("preview");
//! await editor.mount();
//! textarea.oninput = async (e) => {
//!   const { status, error } = await editor.onTextEdit(e.target.value);
//!   errorPanel.textContent = status === "failed" ? error : "";
//! };
//! ```

use std::rc::Rc;

use async_trait::async_trait;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};

use crate::components::{
    DiagramRenderer, DiagramTypeSelector, Editor, EditorServices, RenderOutcome, RenderRequest,
};
use crate::core::{
    CaptureError, CaptureOptions, CaptureService, Clipboard, ClipboardError, DisplaySurface,
    DownloadError, DownloadSink, EditorConfig, Preview, RasterImage, RenderError, RenderId,
    RenderOptions, RenderingService, PLACEHOLDER_TEXT,
};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mermaid, js_name = initialize, catch)]
    fn mermaid_initialize(config: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = mermaid, js_name = render, catch)]
    fn mermaid_render(id: &str, text: &str) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(js_name = html2canvas, catch)]
    fn html2canvas(element: &web_sys::Element, options: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

/// Message carried by a thrown JavaScript value, if any
fn js_message(value: &JsValue) -> Option<String> {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return Some(error.message().into());
    }
    value.as_string()
}

fn to_js(value: &serde_json::Value) -> Result<JsValue, JsValue> {
    js_sys::JSON::parse(&value.to_string())
}

fn document() -> Result<web_sys::Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document available"))
}

/// Renders with the page's global `mermaid` object
#[derive(Debug, Default)]
pub struct MermaidService;

impl MermaidService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl RenderingService for MermaidService {
    fn configure(&self, options: &RenderOptions) -> Result<(), RenderError> {
        let config = to_js(&options.to_mermaid_config())
            .map_err(|e| RenderError::configuration(js_message(&e).unwrap_or_default()))?;
        mermaid_initialize(&config)
            .map_err(|e| RenderError::configuration(js_message(&e).unwrap_or_default()))
    }

    async fn render(&self, id: &RenderId, definition: &str) -> Result<String, RenderError> {
        let promise = mermaid_render(&id.to_string(), definition)
            .map_err(|e| RenderError::from_message(js_message(&e)))?;
        let result = JsFuture::from(promise)
            .await
            .map_err(|e| RenderError::from_message(js_message(&e)))?;

        js_sys::Reflect::get(&result, &JsValue::from_str("svg"))
            .ok()
            .and_then(|svg| svg.as_string())
            .ok_or_else(|| RenderError::Rejected("mermaid returned no svg".to_string()))
    }
}

/// Shows the preview under a mount element
pub struct ElementSurface {
    document: web_sys::Document,
    mount: web_sys::Element,
}

impl ElementSurface {
    pub fn new(document: web_sys::Document, mount: web_sys::Element) -> Self {
        Self { document, mount }
    }

    /// Look up the mount element by id
    pub fn by_id(mount_id: &str) -> Result<Self, JsValue> {
        let document = document()?;
        let mount = document
            .get_element_by_id(mount_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{mount_id}'")))?;
        Ok(Self::new(document, mount))
    }

    pub fn mount(&self) -> &web_sys::Element {
        &self.mount
    }

    fn replace(&self, preview: &Preview) -> Result<(), JsValue> {
        self.mount.set_text_content(None);
        match preview {
            Preview::Blank => {}
            Preview::Placeholder => {
                let text = self.document.create_element("p")?;
                text.set_class_name("placeholder");
                text.set_text_content(Some(PLACEHOLDER_TEXT));
                self.mount.append_child(&text)?;
            }
            Preview::Graphics(graphics) => {
                let parsed = web_sys::DomParser::new()?
                    .parse_from_string(graphics.as_str(), web_sys::SupportedType::ImageSvgXml)?;
                let root = parsed
                    .document_element()
                    .ok_or_else(|| JsValue::from_str("parsed graphics have no root"))?;
                let node = self.document.import_node_with_deep(&root, true)?;
                self.mount.append_child(&node)?;
            }
        }
        Ok(())
    }
}

impl DisplaySurface for ElementSurface {
    fn show(&mut self, preview: &Preview) {
        if let Err(e) = self.replace(preview) {
            warn!(error = ?js_message(&e), "Failed to update preview element");
        }
    }
}

/// `navigator.clipboard`
#[derive(Debug, Default)]
pub struct BrowserClipboard;

#[async_trait(?Send)]
impl Clipboard for BrowserClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let window = web_sys::window().ok_or_else(|| ClipboardError::new("no window available"))?;
        let promise = window.navigator().clipboard().write_text(text);
        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| ClipboardError::new(js_message(&e).unwrap_or_else(|| "permission denied".to_string())))
    }
}

/// Captures the mount element with `html2canvas`
pub struct Html2CanvasCapture {
    element: web_sys::Element,
}

impl Html2CanvasCapture {
    pub fn new(element: web_sys::Element) -> Self {
        Self { element }
    }
}

#[async_trait(?Send)]
impl CaptureService for Html2CanvasCapture {
    async fn capture(
        &self,
        preview: &Preview,
        options: &CaptureOptions,
    ) -> Result<RasterImage, CaptureError> {
        if preview.graphics().is_none() {
            return Err(CaptureError::NothingToCapture);
        }

        let js_options = to_js(&serde_json::json!({
            "backgroundColor": options.background_color,
            "scale": options.scale,
            "useCORS": options.use_cors,
        }))
        .map_err(|e| CaptureError::rasterize(js_message(&e).unwrap_or_default()))?;

        let promise = html2canvas(&self.element, &js_options)
            .map_err(|e| CaptureError::rasterize(js_message(&e).unwrap_or_default()))?;
        let canvas = JsFuture::from(promise)
            .await
            .map_err(|e| CaptureError::rasterize(js_message(&e).unwrap_or_default()))?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(|_| CaptureError::rasterize("html2canvas did not return a canvas"))?;

        let url = canvas
            .to_data_url_with_type("image/png")
            .map_err(|e| CaptureError::encode(js_message(&e).unwrap_or_default()))?;
        RasterImage::from_data_url(canvas.width(), canvas.height(), &url)
    }
}

/// Downloads through a temporary `<a download>` link
#[derive(Debug, Default)]
pub struct AnchorDownload;

#[async_trait(?Send)]
impl DownloadSink for AnchorDownload {
    async fn download(&self, filename: &str, image: &RasterImage) -> Result<(), DownloadError> {
        let failed = |e: JsValue| DownloadError::failed(js_message(&e).unwrap_or_default());
        let link = document()
            .map_err(failed)?
            .create_element("a")
            .map_err(failed)?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| DownloadError::failed("could not create link element"))?;
        link.set_download(filename);
        link.set_href(&image.to_data_url());
        link.click();
        Ok(())
    }
}

type BrowserEditor = Editor<MermaidService, ElementSurface>;

/// Browser editor bound to a preview element
#[wasm_bindgen]
pub struct WebEditor {
    editor: Rc<BrowserEditor>,
}

#[wasm_bindgen]
impl WebEditor {
    /// Create an editor previewing into the element with id `mount_id`
    ///
    /// `config` is an optional JSON configuration string.
    #[wasm_bindgen(constructor)]
    pub fn new(mount_id: &str, config: Option<String>) -> Result<WebEditor, JsValue> {
        let config = match config {
            Some(json) => EditorConfig::from_json_str(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => EditorConfig::default(),
        };

        let surface = ElementSurface::by_id(mount_id)?;
        let capture = Html2CanvasCapture::new(surface.mount().clone());
        let renderer = DiagramRenderer::new(MermaidService::new(), surface, &config.render)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let services = EditorServices {
            clipboard: Box::new(BrowserClipboard),
            capture: Box::new(capture),
            sink: Box::new(AnchorDownload),
        };

        debug!(mount_id, "Created web editor");
        Ok(Self {
            editor: Rc::new(Editor::new(config, renderer, services)),
        })
    }

    /// Render the initial buffer
    ///
    /// Like the other render-triggering actions, resolves to
    /// `{status, error}` where `status` is one of `idle`, `rendered`,
    /// `failed` or `superseded`.
    pub fn mount(&self) -> js_sys::Promise {
        self.drive(self.editor.mount())
    }

    #[wasm_bindgen(js_name = onTypeChange)]
    pub fn on_type_change(&self, type_id: &str) -> js_sys::Promise {
        self.drive(self.editor.on_type_change(type_id))
    }

    #[wasm_bindgen(js_name = onReset)]
    pub fn on_reset(&self) -> js_sys::Promise {
        self.drive(self.editor.on_reset())
    }

    #[wasm_bindgen(js_name = onTextEdit)]
    pub fn on_text_edit(&self, text: String) -> js_sys::Promise {
        self.drive(self.editor.on_text_edit(text))
    }

    /// Resolves to whether the copy succeeded
    #[wasm_bindgen(js_name = onCopy)]
    pub fn on_copy(&self) -> js_sys::Promise {
        let editor = Rc::clone(&self.editor);
        future_to_promise(async move { Ok(JsValue::from_bool(editor.on_copy().await)) })
    }

    /// Resolves to the downloaded file name, or `null` if nothing was downloaded
    #[wasm_bindgen(js_name = onDownload)]
    pub fn on_download(&self) -> js_sys::Promise {
        let editor = Rc::clone(&self.editor);
        future_to_promise(async move {
            Ok(match editor.on_download().await {
                Some(filename) => JsValue::from_str(&filename),
                None => JsValue::NULL,
            })
        })
    }

    #[wasm_bindgen(getter, js_name = selectedType)]
    pub fn selected_type(&self) -> String {
        self.editor.selected_type()
    }

    #[wasm_bindgen(getter)]
    pub fn definition(&self) -> String {
        self.editor.definition()
    }

    /// Current error panel message, if any
    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.editor.renderer().error()
    }

    /// Selector entries as `[{id, name, description, selected}]`
    pub fn types(&self) -> Result<JsValue, JsValue> {
        let selected = self.editor.selected_type();
        let selector = DiagramTypeSelector::new(&selected, |_: &str| {});
        let entries: Vec<_> = selector
            .entries()
            .into_iter()
            .map(|entry| {
                serde_json::json!({
                    "id": entry.id(),
                    "name": entry.name(),
                    "description": entry.description(),
                    "selected": entry.selected,
                })
            })
            .collect();
        to_js(&serde_json::Value::Array(entries))
    }

    fn drive(&self, request: Option<RenderRequest>) -> js_sys::Promise {
        let renderer = Rc::clone(self.editor.renderer());
        future_to_promise(async move {
            let outcome = match request {
                Some(request) => renderer.complete(request).await,
                None => RenderOutcome::Idle,
            };
            to_js(&outcome.to_json())
        })
    }
}
