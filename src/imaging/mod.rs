//! Image processing, pure Rust on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` (content-sniffed) |
//! | **Noise** | `rand` uniform samples into a `GrayImage` |
//! | **Overlay** | self-masked paste, rounded 8-bit blend |
//! | **Text** | `font8x8` bitmap glyphs |
//! | **Encode** | `image` JPEG / PNG / GIF / BMP encoders |
//!
//! The module is split into:
//! - **Backend**: [`ImageCodec`] trait + [`RustCodec`]
//! - **Primitives**: noise generation, compositing, text rendering
//! - **Operations**: request-shaped helpers combining primitives and a codec

pub mod backend;
pub mod compose;
pub mod noise;
pub mod operations;
pub mod rust_backend;
mod text;

pub use backend::{CodecError, ImageCodec, OutputFormat};
pub use compose::overlay_noise;
pub use noise::{NoiseRange, generate_noise};
pub use operations::{BodyKind, classify_body, image_from_body, noise_image, placeholder_image};
pub use rust_backend::RustCodec;
