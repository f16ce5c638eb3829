//! Collaborator traits
//!
//! The editor core never talks to a browser, a process or a file system
//! directly. Everything outside the core sits behind one of these traits:
//!
//! - [`RenderingService`]: diagram text in, SVG markup or failure out
//! - [`Clipboard`]: best-effort text copy
//! - [`CaptureService`]: raster snapshot of the preview region
//! - [`DownloadSink`]: hands a finished image to the user
//!
//! The traits are `?Send`: the editor runs on a single UI task and shares
//! state through `Rc`, so none of the futures need to cross threads.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::config::CaptureOptions;
use super::error::{CaptureError, ClipboardError, DownloadError, RenderError};
use super::surface::Preview;
use super::types::{RenderId, RenderOptions};

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Turns diagram-description text into an SVG document
#[async_trait(?Send)]
pub trait RenderingService {
    /// Apply rendering options; called before the first render
    ///
    /// Implementations must accept repeated calls with the same options.
    fn configure(&self, options: &RenderOptions) -> Result<(), RenderError>;

    /// Render `definition`, tagging the output with `id`
    async fn render(&self, id: &RenderId, definition: &str) -> Result<String, RenderError>;
}

/// System clipboard
#[async_trait(?Send)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Captures what the preview region currently shows
#[async_trait(?Send)]
pub trait CaptureService {
    async fn capture(
        &self,
        preview: &Preview,
        options: &CaptureOptions,
    ) -> Result<RasterImage, CaptureError>;
}

/// Delivers an exported image to the user
#[async_trait(?Send)]
pub trait DownloadSink {
    async fn download(&self, filename: &str, image: &RasterImage) -> Result<(), DownloadError>;
}

/// A PNG-encoded raster image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    png: Vec<u8>,
}

impl RasterImage {
    /// Wrap already-encoded PNG bytes
    pub fn from_png(width: u32, height: u32, png: Vec<u8>) -> Self {
        Self { width, height, png }
    }

    /// Decode a `data:image/png;base64,` URL
    pub fn from_data_url(width: u32, height: u32, url: &str) -> Result<Self, CaptureError> {
        let payload = url
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or_else(|| CaptureError::encode("not a PNG data URL"))?;
        let png = STANDARD
            .decode(payload)
            .map_err(|e| CaptureError::encode(e.to_string()))?;
        Ok(Self { width, height, png })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encoded PNG bytes
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// The image as a `data:image/png;base64,...` URL
    pub fn to_data_url(&self) -> String {
        let mut url = String::with_capacity(PNG_DATA_URL_PREFIX.len() + self.png.len() * 4 / 3 + 4);
        url.push_str(PNG_DATA_URL_PREFIX);
        STANDARD.encode_string(&self.png, &mut url);
        url
    }
}
