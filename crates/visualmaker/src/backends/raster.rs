//! Native preview capture with resvg
//!
//! Rasterizes the graphics currently in the preview onto an opaque
//! background and encodes the result as PNG.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use image::codecs::png::PngEncoder;
use image::ImageEncoder;
use resvg::usvg::fontdb;
use tracing::debug;

use crate::core::{CaptureError, CaptureOptions, CaptureService, Graphics, Preview, RasterImage};

/// Largest raster edge we are willing to allocate
const MAX_EDGE: u32 = 16_384;

fn system_fonts() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            debug!(faces = db.len(), "Loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

/// Captures the preview by rasterizing its SVG
#[derive(Clone, Default)]
pub struct ResvgCapture {
    /// Loaded from the system on first capture when unset
    fonts: Option<Arc<fontdb::Database>>,
}

impl ResvgCapture {
    /// Capture using the system font set
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture using a caller-provided font set
    pub fn with_fonts(fonts: Arc<fontdb::Database>) -> Self {
        Self { fonts: Some(fonts) }
    }

    /// Rasterize `graphics` according to `options`
    pub fn rasterize(
        &self,
        graphics: &Graphics,
        options: &CaptureOptions,
    ) -> Result<RasterImage, CaptureError> {
        let opts = resvg::usvg::Options {
            fontdb: self.fonts.clone().unwrap_or_else(system_fonts),
            ..Default::default()
        };
        let tree = resvg::usvg::Tree::from_str(graphics.as_str(), &opts)
            .map_err(|e| CaptureError::rasterize(e.to_string()))?;

        let scale = if options.scale.is_finite() && options.scale > 0.0 {
            options.scale
        } else {
            1.0
        };
        let size = tree.size();
        let width = (size.width() * scale).ceil() as u32;
        let height = (size.height() * scale).ceil() as u32;
        if width == 0 || height == 0 || width > MAX_EDGE || height > MAX_EDGE {
            return Err(CaptureError::rasterize(format!(
                "raster size {width}x{height} out of range"
            )));
        }

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            CaptureError::rasterize(format!("failed to allocate {width}x{height} pixmap"))
        })?;
        let [r, g, b] = options.background_rgb().unwrap_or([255, 255, 255]);
        pixmap.fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, 255));

        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(pixmap.data(), width, height, image::ExtendedColorType::Rgba8)
            .map_err(|e| CaptureError::encode(e.to_string()))?;

        debug!(width, height, bytes = png.len(), "Rasterized preview");
        Ok(RasterImage::from_png(width, height, png))
    }
}

#[async_trait(?Send)]
impl CaptureService for ResvgCapture {
    async fn capture(
        &self,
        preview: &Preview,
        options: &CaptureOptions,
    ) -> Result<RasterImage, CaptureError> {
        let graphics = preview.graphics().ok_or(CaptureError::NothingToCapture)?;
        self.rasterize(graphics, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="6"><rect width="5" height="6" fill="#ff0000"/></svg>"##;

    fn capture() -> ResvgCapture {
        ResvgCapture::with_fonts(Arc::new(fontdb::Database::new()))
    }

    #[test]
    fn test_rasterize_applies_scale() {
        let graphics = Graphics::parse(SQUARE).unwrap();
        let image = capture().rasterize(&graphics, &CaptureOptions::default()).unwrap();
        assert_eq!((image.width(), image.height()), (20, 12));
        assert!(image.png().starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_invalid_scale_falls_back_to_one() {
        let graphics = Graphics::parse(SQUARE).unwrap();
        let options = CaptureOptions {
            scale: f32::NAN,
            ..CaptureOptions::default()
        };
        let image = capture().rasterize(&graphics, &options).unwrap();
        assert_eq!((image.width(), image.height()), (10, 6));
    }

    #[test]
    fn test_text_labels_reach_the_raster() {
        let fonts = system_fonts();
        if fonts.is_empty() {
            return;
        }
        let capture = ResvgCapture::with_fonts(fonts);
        let frame = |label: &str| {
            format!(
                r##"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="40"><rect x="1" y="1" width="118" height="38" fill="none" stroke="#333"/><text x="20" y="26" font-family="sans-serif" font-size="16" fill="#000">{label}</text></svg>"##
            )
        };

        let options = CaptureOptions::default();
        let labelled = capture
            .rasterize(&Graphics::parse(&frame("START")).unwrap(), &options)
            .unwrap();
        let bare = capture
            .rasterize(&Graphics::parse(&frame("")).unwrap(), &options)
            .unwrap();
        assert_ne!(labelled.png(), bare.png());
    }

    #[test]
    fn test_nothing_to_capture() {
        let err = block_on(capture().capture(&Preview::Placeholder, &CaptureOptions::default()))
            .unwrap_err();
        assert_eq!(err, CaptureError::NothingToCapture);
        let err = block_on(capture().capture(&Preview::Blank, &CaptureOptions::default()))
            .unwrap_err();
        assert_eq!(err, CaptureError::NothingToCapture);
    }
}
