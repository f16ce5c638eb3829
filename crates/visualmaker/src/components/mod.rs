//! Editor components
//!
//! The pieces a UI is assembled from: the type selector, the renderer that
//! owns the preview, and the editor coordinating both.

pub mod editor;
pub mod export;
pub mod renderer;
pub mod selector;

pub use editor::*;
pub use export::*;
pub use renderer::*;
pub use selector::*;
