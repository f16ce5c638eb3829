//! Visualmaker - live diagram editor core
//!
//! The editor keeps a piece of Mermaid diagram text and the selected diagram
//! type, re-renders the preview whenever either changes, and offers copy and
//! PNG export actions. Rendering itself is delegated to a
//! [`RenderingService`](core::RenderingService); the editor only owns the
//! lifecycle around it.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use futures::executor::block_on;
//! use visualmaker::prelude::*;
//!
//! let config = EditorConfig::default();
//! let service = CommandService::new(config.command.clone());
//! let renderer = DiagramRenderer::new(service, MemorySurface::new(), &config.render)?;
//!
//! block_on(renderer.update("graph TD; A-->B", "flowchart"));
//! if let Some(graphics) = renderer.preview().graphics() {
//!     println!("{}", graphics);
//! }
//! # Ok::<(), visualmaker::core::RenderError>(())
//! ```
//!
//! # Modules
//!
//! - [`core`]: diagram types, example catalog, graphics, collaborator traits,
//!   configuration, errors and logging
//! - [`components`]: the renderer, type selector and editor
//! - `backends`: native collaborators (external command, resvg, directory, OSC 52)
//! - `wasm`: browser collaborators and the `WebEditor` binding

pub mod components;
pub mod core;

#[cfg(not(target_arch = "wasm32"))]
pub mod backends;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use components::*;
pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::components::{
        DiagramRenderer, DiagramTypeSelector, Editor, EditorServices, RenderOutcome,
        RenderRequest,
    };
    pub use crate::core::{
        CaptureOptions, CaptureService, Clipboard, DiagramType, DisplaySurface, DownloadSink,
        EditorConfig, Graphics, MemorySurface, Preview, RasterImage, RenderError, RenderId,
        RenderOptions, RenderingService,
    };

    #[cfg(not(target_arch = "wasm32"))]
    pub use crate::backends::{CommandService, DirectorySink, Osc52Clipboard, ResvgCapture};
}
