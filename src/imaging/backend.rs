//! Image codec trait and shared types.
//!
//! The [`ImageCodec`] trait is the seam between the request pipeline and the
//! pixel library: decode bytes into a raster, encode a raster into one of the
//! [`OutputFormat`]s. The production implementation is
//! [`RustCodec`](super::rust_backend::RustCodec).

use image::DynamicImage;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode {format}: {reason}")]
    Encode { format: OutputFormat, reason: String },
}

/// The fixed allow-list of output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::Gif,
        OutputFormat::Bmp,
    ];

    /// The `image` crate format, used when reading results back.
    #[cfg(test)]
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
            OutputFormat::Png => image::ImageFormat::Png,
            OutputFormat::Gif => image::ImageFormat::Gif,
            OutputFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::Gif => "GIF",
            OutputFormat::Bmp => "BMP",
        };
        f.write_str(name)
    }
}

/// Trait for image codecs.
///
/// `decode` detects the format from content alone; no mime hint is passed.
/// Decoded images come back as 8-bit greyscale or RGB (with or without
/// alpha), never palette-indexed, so compositing can write into them directly.
pub trait ImageCodec: Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError>;

    /// Encode in memory. The same image must always produce the same bytes.
    fn encode(&self, image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>, CodecError>;
}

/// Reduce any pixel layout to its 8-bit counterpart.
///
/// Greyscale stays greyscale and alpha is kept; only the sample depth changes.
pub fn to_eight_bit(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => image,
        other => {
            let color = other.color();
            match (color.has_color(), color.has_alpha()) {
                (true, true) => DynamicImage::ImageRgba8(other.to_rgba8()),
                (true, false) => DynamicImage::ImageRgb8(other.to_rgb8()),
                (false, true) => DynamicImage::ImageLumaA8(other.to_luma_alpha8()),
                (false, false) => DynamicImage::ImageLuma8(other.to_luma8()),
            }
        }
    }
}
