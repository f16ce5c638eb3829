//! Top-level editor state and actions
//!
//! The editor owns the selected diagram type and the text buffer, forwards
//! every change to its [`DiagramRenderer`], and implements the copy and
//! download actions on top of the collaborator traits.
//!
//! State-changing actions are synchronous and return the [`RenderRequest`]
//! they started (if any); the caller drives it to completion with
//! [`DiagramRenderer::complete`], typically on a spawned local task. This
//! keeps the editor usable while renders are in flight.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error, info, info_span, warn, Instrument};

use super::export::{unix_millis, ExportNamer};
use super::renderer::{DiagramRenderer, RenderRequest};
use crate::core::{
    catalog, CaptureService, Clipboard, DiagramType, DisplaySurface, DownloadSink, EditorConfig,
    MemorySurface, RenderingService,
};

/// Copy and export collaborators
pub struct EditorServices {
    pub clipboard: Box<dyn Clipboard>,
    pub capture: Box<dyn CaptureService>,
    pub sink: Box<dyn DownloadSink>,
}

/// Owns the (type, text) state of one editing session
pub struct Editor<S, D = MemorySurface> {
    config: EditorConfig,
    selected_type: RefCell<String>,
    definition: RefCell<String>,
    renderer: Rc<DiagramRenderer<S, D>>,
    services: EditorServices,
    names: ExportNamer,
}

impl<S: RenderingService, D: DisplaySurface> Editor<S, D> {
    /// Create an editor seeded with the example for `config.default_type`
    ///
    /// Nothing is rendered until [`mount`](Self::mount) is called.
    pub fn new(config: EditorConfig, renderer: DiagramRenderer<S, D>, services: EditorServices) -> Self {
        let default_type = config.default_type;
        Self {
            config,
            selected_type: RefCell::new(default_type.id().to_string()),
            definition: RefCell::new(catalog::example(default_type).to_string()),
            renderer: Rc::new(renderer),
            services,
            names: ExportNamer::new(),
        }
    }

    /// Render the initial buffer
    pub fn mount(&self) -> Option<RenderRequest> {
        self.rerender()
    }

    /// Switch diagram type and replace the buffer with its example
    ///
    /// Unrecognized identifiers are kept as the selection and empty the
    /// buffer.
    pub fn on_type_change(&self, type_id: &str) -> Option<RenderRequest> {
        let example = catalog::example_for_id(type_id);
        if example.is_empty() {
            warn!(type_id, "Unrecognized diagram type selected");
        } else {
            info!(type_id, "Diagram type changed");
        }
        self.selected_type.replace(type_id.to_string());
        self.definition.replace(example.to_string());
        self.rerender()
    }

    /// Discard edits and restore the current type's example
    pub fn on_reset(&self) -> Option<RenderRequest> {
        let example = catalog::example_for_id(&self.selected_type.borrow());
        debug!("Resetting buffer to example");
        self.definition.replace(example.to_string());
        self.rerender()
    }

    /// Replace the buffer verbatim
    pub fn on_text_edit(&self, text: impl Into<String>) -> Option<RenderRequest> {
        self.definition.replace(text.into());
        self.rerender()
    }

    /// Copy the buffer to the clipboard
    ///
    /// Failures are logged; returns whether the copy went through.
    pub async fn on_copy(&self) -> bool {
        let text = self.definition();
        match self.services.clipboard.write_text(&text).await {
            Ok(()) => {
                debug!(bytes = text.len(), "Copied definition to clipboard");
                true
            }
            Err(e) => {
                warn!(error = %e, "Copy to clipboard failed");
                false
            }
        }
    }

    /// Capture the preview and download it as a PNG
    ///
    /// Returns the downloaded file name. Capture and delivery failures are
    /// logged and yield `None`; nothing is downloaded unless the capture
    /// succeeded.
    pub async fn on_download(&self) -> Option<String> {
        let diagram_type = self.selected_type();
        let span = info_span!("download", diagram_type = %diagram_type);

        let preview = self.renderer.preview();
        let image = match self
            .services
            .capture
            .capture(&preview, &self.config.export)
            .instrument(span.clone())
            .await
        {
            Ok(image) => image,
            Err(e) => {
                error!(parent: &span, error = %e, "Error downloading diagram");
                return None;
            }
        };

        let filename = self.names.next_name(&diagram_type, unix_millis());
        match self
            .services
            .sink
            .download(&filename, &image)
            .instrument(span.clone())
            .await
        {
            Ok(()) => {
                info!(parent: &span, filename = %filename, width = image.width(), height = image.height(), "Diagram downloaded");
                Some(filename)
            }
            Err(e) => {
                error!(parent: &span, error = %e, "Error downloading diagram");
                None
            }
        }
    }

    fn rerender(&self) -> Option<RenderRequest> {
        let definition = self.definition.borrow();
        let selected_type = self.selected_type.borrow();
        self.renderer.begin(&definition, &selected_type)
    }
}

impl<S, D> Editor<S, D> {
    /// Identifier of the selected type, as last reported by the selector
    pub fn selected_type(&self) -> String {
        self.selected_type.borrow().clone()
    }

    /// The selected type, if it is one of the catalog's
    pub fn diagram_type(&self) -> Option<DiagramType> {
        DiagramType::from_id(&self.selected_type.borrow())
    }

    /// Current buffer contents
    pub fn definition(&self) -> String {
        self.definition.borrow().clone()
    }

    /// Shared handle to the renderer, for driving requests to completion
    pub fn renderer(&self) -> &Rc<DiagramRenderer<S, D>> {
        &self.renderer
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
}
