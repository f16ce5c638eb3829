//! Display surfaces
//!
//! A display surface is the region of the UI where rendered graphics or the
//! idle placeholder appear. Only the diagram renderer writes to it.

use super::graphics::Graphics;

/// Placeholder text shown while the buffer is empty
pub const PLACEHOLDER_TEXT: &str = "Enter Mermaid syntax to preview diagram";

/// What a display surface shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Preview {
    /// Idle: no text to render
    #[default]
    Placeholder,
    /// Cleared: a render is pending or the last one failed
    Blank,
    /// A rendered diagram
    Graphics(Graphics),
}

impl Preview {
    pub fn graphics(&self) -> Option<&Graphics> {
        match self {
            Preview::Graphics(graphics) => Some(graphics),
            _ => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Preview::Placeholder)
    }
}

/// A mount point the renderer draws into
pub trait DisplaySurface {
    /// Replace the surface's content
    fn show(&mut self, preview: &Preview);
}

/// In-memory surface for headless use and tests
///
/// Keeps the current content and how many times it was replaced.
#[derive(Debug, Default)]
pub struct MemorySurface {
    current: Preview,
    updates: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Preview {
        &self.current
    }

    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl DisplaySurface for MemorySurface {
    fn show(&mut self, preview: &Preview) {
        self.current = preview.clone();
        self.updates += 1;
    }
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for Box<S> {
    fn show(&mut self, preview: &Preview) {
        (**self).show(preview)
    }
}
