//! Render lifecycle
//!
//! [`DiagramRenderer`] keeps a display surface in sync with the most recent
//! diagram text. Each change goes through two steps:
//!
//! 1. [`DiagramRenderer::begin`] runs synchronously: it clears the error
//!    panel and the surface (or shows the idle placeholder for blank text)
//!    and issues a [`RenderRequest`] with a fresh [`RenderId`].
//! 2. [`DiagramRenderer::complete`] awaits the rendering service and applies
//!    the result, but only if no newer request was issued in the meantime.
//!
//! Both take `&self`, so several completions can be in flight on the same
//! task; whichever request was issued last is the only one that can reach
//! the surface.

use std::cell::{Cell, RefCell};

use tracing::{debug, info_span, trace, warn, Instrument};

use crate::core::{
    DisplaySurface, Graphics, MemorySurface, Preview, RenderError, RenderId, RenderIdGenerator,
    RenderOptions, RenderingService,
};

/// A render that has been issued but not yet applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    id: RenderId,
    definition: String,
    diagram_type: String,
}

impl RenderRequest {
    pub fn id(&self) -> RenderId {
        self.id
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn diagram_type(&self) -> &str {
        &self.diagram_type
    }
}

/// What happened to one change of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Blank input: placeholder shown, service not called
    Idle,
    /// Graphics applied to the surface
    Rendered,
    /// Error panel populated, surface cleared
    Failed(String),
    /// A newer request was issued before this one resolved; result dropped
    Superseded,
}

impl RenderOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Rendered => "rendered",
            Self::Failed(_) => "failed",
            Self::Superseded => "superseded",
        }
    }

    /// Error panel message for a failed render
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// `{"status": ..., "error": ...}` as handed to script callers
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "status": self.status(),
            "error": self.error(),
        })
    }
}

/// Owns the render lifecycle of one display surface
pub struct DiagramRenderer<S, D = MemorySurface> {
    service: S,
    surface: RefCell<D>,
    ids: RenderIdGenerator,
    /// Request whose result may still be applied
    latest: Cell<Option<RenderId>>,
    preview: RefCell<Preview>,
    error: RefCell<Option<String>>,
}

impl<S: RenderingService, D: DisplaySurface> DiagramRenderer<S, D> {
    /// Configure `service` and take over `surface`
    ///
    /// The surface starts out showing the idle placeholder.
    pub fn new(service: S, mut surface: D, options: &RenderOptions) -> Result<Self, RenderError> {
        service.configure(options)?;
        debug!(theme = %options.theme, security_level = %options.security_level, "Configured rendering service");

        let preview = Preview::Placeholder;
        surface.show(&preview);

        Ok(Self {
            service,
            surface: RefCell::new(surface),
            ids: RenderIdGenerator::new(),
            latest: Cell::new(None),
            preview: RefCell::new(preview),
            error: RefCell::new(None),
        })
    }

    /// Start rendering `definition`
    ///
    /// Returns `None` for blank input, which is shown as the idle
    /// placeholder without consulting the service. Either way, any request
    /// still in flight is invalidated.
    pub fn begin(&self, definition: &str, diagram_type: &str) -> Option<RenderRequest> {
        self.error.replace(None);

        if definition.trim().is_empty() {
            trace!(diagram_type, "Blank definition, showing placeholder");
            self.latest.set(None);
            self.present(Preview::Placeholder);
            return None;
        }

        let id = self.ids.next_id();
        self.latest.set(Some(id));
        self.present(Preview::Blank);
        debug!(%id, diagram_type, input_len = definition.len(), "Issued render request");

        Some(RenderRequest {
            id,
            definition: definition.to_string(),
            diagram_type: diagram_type.to_string(),
        })
    }

    /// Await the service for `request` and apply its result if still current
    pub async fn complete(&self, request: RenderRequest) -> RenderOutcome {
        let span = info_span!("render", id = %request.id, diagram_type = %request.diagram_type);
        let result = self
            .service
            .render(&request.id, &request.definition)
            .instrument(span)
            .await
            .and_then(|markup| Graphics::parse(&markup).map_err(RenderError::from));

        if self.latest.get() != Some(request.id) {
            debug!(id = %request.id, latest = ?self.latest.get(), "Discarding stale render result");
            return RenderOutcome::Superseded;
        }
        self.latest.set(None);

        match result {
            Ok(graphics) => {
                debug!(id = %request.id, bytes = graphics.as_str().len(), "Render applied");
                self.error.replace(None);
                self.present(Preview::Graphics(graphics));
                RenderOutcome::Rendered
            }
            Err(err) => {
                let message = err.user_message();
                warn!(id = %request.id, error = %message, "Render failed");
                self.present(Preview::Blank);
                self.error.replace(Some(message.clone()));
                RenderOutcome::Failed(message)
            }
        }
    }

    /// [`begin`](Self::begin) followed by [`complete`](Self::complete)
    pub async fn update(&self, definition: &str, diagram_type: &str) -> RenderOutcome {
        match self.begin(definition, diagram_type) {
            Some(request) => self.complete(request).await,
            None => RenderOutcome::Idle,
        }
    }

    fn present(&self, preview: Preview) {
        self.surface.borrow_mut().show(&preview);
        self.preview.replace(preview);
    }
}

impl<S, D> DiagramRenderer<S, D> {
    /// What the surface currently shows
    pub fn preview(&self) -> Preview {
        self.preview.borrow().clone()
    }

    /// Current error panel message
    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    /// Whether a request is waiting on the service
    pub fn is_pending(&self) -> bool {
        self.latest.get().is_some()
    }

    /// The most recently issued render identifier
    pub fn last_id(&self) -> Option<RenderId> {
        self.ids.last()
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Inspect the surface
    pub fn with_surface<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        f(&self.surface.borrow())
    }
}
