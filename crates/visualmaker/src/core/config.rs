//! Editor configuration
//!
//! Configuration is plain data loaded from JSON. Every field has a default,
//! so an empty object (or no file at all) yields a working editor.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ConfigError;
use super::types::{DiagramType, RenderOptions};

/// Options passed to the capture service when exporting the preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptureOptions {
    /// CSS color painted behind the captured region
    pub background_color: String,
    /// Device-pixel multiplier for the raster output
    pub scale: f32,
    /// Load cross-origin images through CORS while capturing
    pub use_cors: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            background_color: "#f1f5f9".to_string(),
            scale: 2.0,
            use_cors: true,
        }
    }
}

impl CaptureOptions {
    /// Parse `background_color` as `#rgb` or `#rrggbb`
    pub fn background_rgb(&self) -> Option<[u8; 3]> {
        let hex = self.background_color.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (slot, i) in rgb.iter_mut().zip(0..3) {
                    let c = channel(&hex[i..i + 1])?;
                    *slot = c * 17;
                }
                Some(rgb)
            }
            6 => Some([
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            ]),
            _ => None,
        }
    }
}

/// External command used by the native rendering service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Program to run, looked up on `PATH`
    pub program: String,
    /// Extra arguments appended after the generated ones
    pub args: Vec<String>,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            program: "mmdc".to_string(),
            args: Vec::new(),
        }
    }
}

/// Top-level editor configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Diagram type selected when the editor starts
    pub default_type: DiagramType,
    /// Options for the rendering service
    pub render: RenderOptions,
    /// Options for image export
    pub export: CaptureOptions,
    /// Native rendering command
    pub command: CommandConfig,
}

impl EditorConfig {
    /// Parse configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;
        debug!(path = %path.display(), ?config, "Loaded editor config");
        Ok(config)
    }
}
