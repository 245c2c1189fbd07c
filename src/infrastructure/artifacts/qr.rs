//! QR rendering behind an opaque render(text) -> bytes seam.

use super::service::{ArtifactError, ArtifactResult};
use qrcode::QrCode;
use qrcode::render::svg;

/// Renders scannable images from short URLs.
///
/// Rendering is pure CPU work over a few dozen bytes of input, so the seam
/// is synchronous; implementations must not do I/O.
#[cfg_attr(test, mockall::automock)]
pub trait QrRenderer: Send + Sync {
    /// Renders `text` into image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Render`] when encoding fails.
    fn render(&self, text: &str) -> ArtifactResult<Vec<u8>>;
}

/// SVG renderer backed by the `qrcode` crate.
pub struct SvgQrRenderer;

impl QrRenderer for SvgQrRenderer {
    fn render(&self, text: &str) -> ArtifactResult<Vec<u8>> {
        let code = QrCode::new(text.as_bytes())
            .map_err(|e| ArtifactError::Render(e.to_string()))?;

        let image = code
            .render::<svg::Color<'_>>()
            .min_dimensions(256, 256)
            .build();

        Ok(image.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_produces_svg() {
        let bytes = SvgQrRenderer.render("https://sho.rt/abc1234").unwrap();
        let svg = String::from_utf8(bytes).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let a = SvgQrRenderer.render("https://sho.rt/abc1234").unwrap();
        let b = SvgQrRenderer.render("https://sho.rt/abc1234").unwrap();
        assert_eq!(a, b);
    }
}
