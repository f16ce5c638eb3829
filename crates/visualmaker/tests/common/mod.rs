//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use visualmaker::prelude::*;
use visualmaker::{CaptureError, ClipboardError, DownloadError};

/// Valid SVG tagged with the render id and input length
pub fn svg_for(id: &RenderId, definition: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="{id}" data-len="{}"><rect width="4" height="4"/></svg>"#,
        definition.len()
    )
}

/// Resolves immediately; rejects anything containing `invalid` or `@@@`
#[derive(Default)]
pub struct ScriptedService {
    pub calls: RefCell<Vec<String>>,
}

#[async_trait(?Send)]
impl RenderingService for ScriptedService {
    fn configure(&self, _options: &RenderOptions) -> Result<(), RenderError> {
        Ok(())
    }

    async fn render(&self, id: &RenderId, definition: &str) -> Result<String, RenderError> {
        self.calls.borrow_mut().push(definition.to_string());
        if definition.contains("invalid") || definition.contains("@@@") {
            Err(RenderError::Rejected("Parse error on line 1".to_string()))
        } else if definition.contains("silent") {
            Err(RenderError::Unknown)
        } else {
            Ok(svg_for(id, definition))
        }
    }
}

/// Each render waits until the test releases it
#[derive(Default)]
pub struct GatedService {
    pending: RefCell<HashMap<String, oneshot::Receiver<Result<String, RenderError>>>>,
}

impl GatedService {
    /// Register the gate for `definition`; send on the returned handle to resolve it
    pub fn gate(&self, definition: &str) -> oneshot::Sender<Result<String, RenderError>> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().insert(definition.to_string(), rx);
        tx
    }
}

#[async_trait(?Send)]
impl RenderingService for GatedService {
    fn configure(&self, _options: &RenderOptions) -> Result<(), RenderError> {
        Ok(())
    }

    async fn render(&self, _id: &RenderId, definition: &str) -> Result<String, RenderError> {
        let gate = self.pending.borrow_mut().remove(definition);
        match gate {
            Some(rx) => rx.await.unwrap_or(Err(RenderError::Unknown)),
            None => Err(RenderError::Rejected(format!("no gate for '{definition}'"))),
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingClipboard {
    pub texts: Rc<RefCell<Vec<String>>>,
    pub fail: bool,
}

#[async_trait(?Send)]
impl Clipboard for RecordingClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::new("permission denied"));
        }
        self.texts.borrow_mut().push(text.to_string());
        Ok(())
    }
}

/// Returns a fixed image whenever the preview holds graphics
#[derive(Clone, Default)]
pub struct FixedCapture {
    pub fail: bool,
    pub seen: Rc<RefCell<Vec<Preview>>>,
}

#[async_trait(?Send)]
impl CaptureService for FixedCapture {
    async fn capture(
        &self,
        preview: &Preview,
        _options: &CaptureOptions,
    ) -> Result<RasterImage, CaptureError> {
        self.seen.borrow_mut().push(preview.clone());
        if self.fail {
            return Err(CaptureError::rasterize("canvas tainted"));
        }
        if preview.graphics().is_none() {
            return Err(CaptureError::NothingToCapture);
        }
        Ok(RasterImage::from_png(8, 6, vec![0x89, b'P', b'N', b'G']))
    }
}

#[derive(Clone, Default)]
pub struct RecordingSink {
    pub downloads: Rc<RefCell<Vec<String>>>,
}

#[async_trait(?Send)]
impl DownloadSink for RecordingSink {
    async fn download(&self, filename: &str, _image: &RasterImage) -> Result<(), DownloadError> {
        self.downloads.borrow_mut().push(filename.to_string());
        Ok(())
    }
}

/// An editor over [`ScriptedService`] plus handles on its collaborators
pub struct Harness {
    pub editor: Editor<ScriptedService>,
    pub clipboard: RecordingClipboard,
    pub capture: FixedCapture,
    pub sink: RecordingSink,
}

impl Harness {
    pub fn new(config: EditorConfig) -> Self {
        Self::with(config, RecordingClipboard::default(), FixedCapture::default())
    }

    pub fn with(config: EditorConfig, clipboard: RecordingClipboard, capture: FixedCapture) -> Self {
        let sink = RecordingSink::default();
        let renderer =
            DiagramRenderer::new(ScriptedService::default(), MemorySurface::new(), &config.render)
                .unwrap();
        let services = EditorServices {
            clipboard: Box::new(clipboard.clone()),
            capture: Box::new(capture.clone()),
            sink: Box::new(sink.clone()),
        };
        Self {
            editor: Editor::new(config, renderer, services),
            clipboard,
            capture,
            sink,
        }
    }

    /// Drive a request returned by an editor action to completion
    pub fn settle(&self, request: Option<RenderRequest>) -> RenderOutcome {
        match request {
            Some(request) => futures::executor::block_on(self.editor.renderer().complete(request)),
            None => RenderOutcome::Idle,
        }
    }

    pub fn preview(&self) -> Preview {
        self.editor.renderer().preview()
    }

    pub fn service_calls(&self) -> Vec<String> {
        self.editor.renderer().service().calls.borrow().clone()
    }
}
