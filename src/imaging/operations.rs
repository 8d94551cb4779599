//! High-level image operations.
//!
//! These produce the source image for each request shape: generated noise,
//! the 1x1 preflight placeholder, or a POST body (decoded upload or rendered
//! text). They combine the primitives in this module with a codec.

use super::backend::{CodecError, ImageCodec};
use super::noise::{NoiseRange, generate_noise};
use super::text::render_text;
use image::{DynamicImage, RgbImage};
use rand::Rng;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Content type that gateways attach to raw binary form posts.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// How a POST body is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Encoded image bytes; the format is sniffed from content.
    Image,
    /// UTF-8 text to render.
    Text,
}

/// Classify a body by its declared content type.
///
/// `image/*` and form-encoded bodies are image data; everything else is text.
pub fn classify_body(content_type: &str) -> BodyKind {
    if content_type.starts_with("image/") || content_type == FORM_URLENCODED {
        BodyKind::Image
    } else {
        BodyKind::Text
    }
}

/// A single black RGB pixel.
pub fn placeholder_image() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::new(1, 1))
}

/// Greyscale noise of the requested size.
pub fn noise_image<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    range: NoiseRange,
    rng: &mut R,
) -> DynamicImage {
    DynamicImage::ImageLuma8(generate_noise(width, height, range, rng))
}

/// Turn a POST body into an image.
///
/// Text bodies are rendered onto a `width` x `height` canvas; invalid UTF-8 is
/// replaced rather than rejected. Image bodies keep their own dimensions.
pub fn image_from_body(
    codec: &impl ImageCodec,
    body: &[u8],
    kind: BodyKind,
    width: u32,
    height: u32,
) -> Result<DynamicImage> {
    match kind {
        BodyKind::Image => codec.decode(body),
        BodyKind::Text => {
            let text = String::from_utf8_lossy(body);
            Ok(DynamicImage::ImageRgb8(render_text(&text, width, height)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockCodec, RecordedOp};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn classify_image_types() {
        assert_eq!(classify_body("image/png"), BodyKind::Image);
        assert_eq!(classify_body("image/anything"), BodyKind::Image);
        assert_eq!(classify_body(FORM_URLENCODED), BodyKind::Image);
    }

    #[test]
    fn classify_everything_else_as_text() {
        assert_eq!(classify_body("text/plain"), BodyKind::Text);
        assert_eq!(classify_body("application/json"), BodyKind::Text);
        assert_eq!(classify_body(""), BodyKind::Text);
        // Prefix match is exact: no leading whitespace or case folding
        assert_eq!(classify_body("Image/png"), BodyKind::Text);
    }

    #[test]
    fn placeholder_is_one_pixel() {
        let image = placeholder_image();
        assert_eq!((image.width(), image.height()), (1, 1));
        assert!(matches!(image, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn noise_image_is_greyscale() {
        let mut rng = StdRng::seed_from_u64(11);
        let image = noise_image(12, 7, NoiseRange::default(), &mut rng);
        assert!(matches!(image, DynamicImage::ImageLuma8(_)));
        assert_eq!((image.width(), image.height()), (12, 7));
    }

    #[test]
    fn image_body_goes_through_codec() {
        let codec = MockCodec::with_decoded(vec![DynamicImage::new_rgb8(9, 9)]);
        let image = image_from_body(&codec, b"bytes", BodyKind::Image, 100, 50).unwrap();

        // Uploaded images keep their own size
        assert_eq!((image.width(), image.height()), (9, 9));
        assert_eq!(codec.get_operations(), vec![RecordedOp::Decode { len: 5 }]);
    }

    #[test]
    fn text_body_skips_codec() {
        let codec = MockCodec::new();
        let image = image_from_body(&codec, b"hello", BodyKind::Text, 100, 50).unwrap();

        assert_eq!((image.width(), image.height()), (100, 50));
        assert!(codec.get_operations().is_empty());
    }

    #[test]
    fn invalid_utf8_text_still_renders() {
        let codec = MockCodec::new();
        let image = image_from_body(&codec, &[0xff, 0xfe, b'a'], BodyKind::Text, 16, 8).unwrap();
        assert_eq!((image.width(), image.height()), (16, 8));
    }

    #[test]
    fn decode_failure_propagates() {
        let codec = MockCodec::new();
        let result = image_from_body(&codec, b"junk", BodyKind::Image, 10, 10);
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }
}
