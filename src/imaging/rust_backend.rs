//! Pure Rust codec on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, BMP, TIFF, WebP) | `image::load_from_memory` (magic-byte sniffing) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (alpha dropped first) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → GIF | `image::codecs::gif::GifEncoder` from RGBA |
//! | Encode → BMP | `image::codecs::bmp::BmpEncoder` |
//!
//! TIFF and WebP are accepted as uploads only; output stays within
//! [`OutputFormat::ALL`].

use super::backend::{CodecError, ImageCodec, OutputFormat, to_eight_bit};
use image::codecs::bmp::BmpEncoder;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use std::borrow::Cow;

/// Codec backed by the `image` crate's pure Rust decoders and encoders.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrow the image when it is already 8-bit, otherwise convert it.
fn eight_bit(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => Cow::Borrowed(image),
        other => Cow::Owned(to_eight_bit(other.clone())),
    }
}

/// JPEG has no alpha channel: greyscale-alpha becomes greyscale, RGBA becomes RGB.
fn without_alpha(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageLumaA8(_) => Cow::Owned(DynamicImage::ImageLuma8(image.to_luma8())),
        DynamicImage::ImageRgba8(_) => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
        _ => Cow::Borrowed(image),
    }
}

impl ImageCodec for RustCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError> {
        let image =
            image::load_from_memory(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
        Ok(to_eight_bit(image))
    }

    fn encode(&self, image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>, CodecError> {
        let image = eight_bit(image);
        let (width, height) = (image.width(), image.height());
        let mut bytes = Vec::new();

        let result = match format {
            OutputFormat::Jpeg => {
                let flat = without_alpha(&image);
                JpegEncoder::new(&mut bytes).write_image(
                    flat.as_bytes(),
                    width,
                    height,
                    flat.color().into(),
                )
            }
            OutputFormat::Png => PngEncoder::new(&mut bytes).write_image(
                image.as_bytes(),
                width,
                height,
                image.color().into(),
            ),
            OutputFormat::Gif => {
                let rgba = image.to_rgba8();
                // The GIF trailer is written when the encoder drops
                let mut encoder = GifEncoder::new(&mut bytes);
                encoder.encode(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
            }
            OutputFormat::Bmp => BmpEncoder::new(&mut bytes).write_image(
                image.as_bytes(),
                width,
                height,
                image.color().into(),
            ),
        };

        result.map_err(|e| CodecError::Encode {
            format,
            reason: e.to_string(),
        })?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    #[test]
    fn every_format_round_trips_dimensions() {
        let codec = RustCodec::new();
        let source = gradient(40, 30);

        for format in OutputFormat::ALL {
            let bytes = codec.encode(&source, format).unwrap();
            let detected = image::guess_format(&bytes).unwrap();
            assert_eq!(detected, format.image_format(), "{format} detected as {detected:?}");

            let decoded = codec.decode(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (40, 30), "{format}");
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let codec = RustCodec::new();
        let source = gradient(16, 16);

        for format in OutputFormat::ALL {
            let first = codec.encode(&source, format).unwrap();
            let second = codec.encode(&source, format).unwrap();
            assert_eq!(first, second, "{format} output drifted");
        }
    }

    #[test]
    fn greyscale_encodes_in_every_format() {
        let codec = RustCodec::new();
        let grey = DynamicImage::ImageLuma8(GrayImage::from_fn(10, 5, |x, _| Luma([x as u8 * 20])));

        for format in OutputFormat::ALL {
            let bytes = codec.encode(&grey, format).unwrap();
            let decoded = codec.decode(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (10, 5), "{format}");
        }
    }

    #[test]
    fn rgba_encodes_as_jpeg() {
        let codec = RustCodec::new();
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 128])));

        let bytes = codec.encode(&rgba, OutputFormat::Jpeg).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
    }

    #[test]
    fn sixteen_bit_input_is_encoded() {
        let codec = RustCodec::new();
        let deep = DynamicImage::new_rgb16(6, 4);

        let bytes = codec.encode(&deep, OutputFormat::Bmp).unwrap();
        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (6, 4));
    }

    #[test]
    fn decode_normalizes_to_eight_bit() {
        let codec = RustCodec::new();
        let png16 = {
            let mut bytes = Vec::new();
            let deep = DynamicImage::new_rgb16(3, 3);
            PngEncoder::new(&mut bytes)
                .write_image(deep.as_bytes(), 3, 3, ExtendedColorType::Rgb16)
                .unwrap();
            bytes
        };

        let decoded = codec.decode(&png16).unwrap();
        assert!(matches!(decoded, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn decode_gif_yields_direct_color() {
        let codec = RustCodec::new();
        let bytes = codec.encode(&gradient(5, 5), OutputFormat::Gif).unwrap();

        let decoded = codec.decode(&bytes).unwrap();
        assert!(matches!(decoded, DynamicImage::ImageRgba8(_)));
    }

    #[test]
    fn decode_webp_upload() {
        let codec = RustCodec::new();
        let source = gradient(4, 3);
        let mut bytes = Vec::new();
        image::codecs::webp::WebPEncoder::new_lossless(&mut bytes)
            .write_image(source.as_bytes(), 4, 3, ExtendedColorType::Rgb8)
            .unwrap();

        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
        assert_eq!(decoded.to_rgb8().get_pixel(3, 2), &Rgb([3, 2, 128]));
    }

    #[test]
    fn decode_tiff_upload() {
        let codec = RustCodec::new();
        let grey = GrayImage::from_fn(2, 2, |x, y| Luma([(x * 100 + y * 50) as u8]));
        let mut cursor = std::io::Cursor::new(Vec::new());
        image::codecs::tiff::TiffEncoder::new(&mut cursor)
            .write_image(grey.as_raw(), 2, 2, ExtendedColorType::L8)
            .unwrap();

        let decoded = codec.decode(cursor.get_ref()).unwrap();
        assert!(matches!(decoded, DynamicImage::ImageLuma8(_)));
        assert_eq!(decoded.to_luma8().get_pixel(1, 1), &Luma([150]));
    }

    #[test]
    fn decode_garbage_errors() {
        let codec = RustCodec::new();
        let result = codec.decode(b"definitely not an image");
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[test]
    fn decode_empty_errors() {
        let codec = RustCodec::new();
        assert!(codec.decode(&[]).is_err());
    }
}
