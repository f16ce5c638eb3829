//! Core error types for the editor
//!
//! Every collaborator boundary has its own error type so callers can tell a
//! rejected diagram from a failed clipboard write. None of them are meant to
//! reach the user as a crash: the renderer turns [`RenderError`] into the
//! inline error panel and the editor logs the rest.

use thiserror::Error;

/// Message shown when a render failure carries no text of its own
pub const GENERIC_RENDER_FAILURE: &str = "Failed to render diagram";

/// Failure produced while turning diagram text into graphics
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The rendering service rejected the input
    #[error("{0}")]
    Rejected(String),

    /// The rendering service failed without a usable message
    #[error("Failed to render diagram")]
    Unknown,

    /// The service answered, but not with a usable SVG document
    #[error("invalid graphics: {0}")]
    Graphics(#[from] GraphicsError),

    /// The service could not be configured
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl RenderError {
    /// Build a rejection from a possibly-missing message
    ///
    /// Blank messages collapse to [`RenderError::Unknown`].
    pub fn from_message(message: Option<String>) -> Self {
        match message {
            Some(m) if !m.trim().is_empty() => Self::Rejected(m.trim().to_string()),
            _ => Self::Unknown,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// The human-readable message for the error panel
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_RENDER_FAILURE.to_string()
        } else {
            message
        }
    }
}

/// Failure parsing returned markup into [`crate::core::Graphics`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    #[error("malformed markup: {0}")]
    Xml(String),

    #[error("expected an <svg> root element, found <{0}>")]
    NotSvg(String),

    #[error("document is empty")]
    Empty,
}

/// Clipboard write failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("clipboard write failed: {message}")]
pub struct ClipboardError {
    pub message: String,
}

impl ClipboardError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure capturing the preview region as a raster image
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("nothing to capture: the preview shows no graphics")]
    NothingToCapture,

    #[error("rasterization failed: {message}")]
    Rasterize { message: String },

    #[error("image encoding failed: {message}")]
    Encode { message: String },
}

impl CaptureError {
    pub fn rasterize(message: impl Into<String>) -> Self {
        Self::Rasterize {
            message: message.into(),
        }
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }
}

/// Failure delivering an exported file
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("download failed: {message}")]
    Failed { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DownloadError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Failure loading [`crate::core::EditorConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
}

/// Errors that surface through the public editor API
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Unknown diagram type: {diagram_type}")]
    UnknownDiagramType { diagram_type: String },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
