//! Noise overlay.
//!
//! The noise layer is pasted at the origin using itself as the mask: a noise
//! sample of 255 replaces the destination pixel with white, a sample of 0
//! leaves it untouched, and everything in between blends proportionally. An
//! alpha channel in the destination blends toward fully opaque by the same
//! weight.

use super::backend::to_eight_bit;
use super::noise::{NoiseRange, generate_noise};
use image::{DynamicImage, GrayImage, ImageBuffer, Pixel};
use rand::Rng;

/// Overlay fresh noise, sized to `image` itself, onto `image`.
pub fn overlay_noise<R: Rng + ?Sized>(image: &mut DynamicImage, range: NoiseRange, rng: &mut R) {
    let noise = generate_noise(image.width(), image.height(), range, rng);
    paste_self_masked(image, &noise);
}

/// Paste a greyscale layer at (0, 0) using its own values as the mask.
///
/// Pixels outside the layer are left alone.
pub fn paste_self_masked(image: &mut DynamicImage, layer: &GrayImage) {
    match image {
        DynamicImage::ImageLuma8(buf) => paste_into(buf, layer, None),
        DynamicImage::ImageLumaA8(buf) => paste_into(buf, layer, Some(1)),
        DynamicImage::ImageRgb8(buf) => paste_into(buf, layer, None),
        DynamicImage::ImageRgba8(buf) => paste_into(buf, layer, Some(3)),
        _ => {
            *image = to_eight_bit(image.clone());
            paste_self_masked(image, layer);
        }
    }
}

fn paste_into<P>(target: &mut ImageBuffer<P, Vec<u8>>, layer: &GrayImage, alpha: Option<usize>)
where
    P: Pixel<Subpixel = u8>,
{
    for (x, y, pixel) in target.enumerate_pixels_mut() {
        let Some(mask) = layer.get_pixel_checked(x, y).map(|p| p[0]) else {
            continue;
        };
        for (channel_index, channel) in pixel.channels_mut().iter_mut().enumerate() {
            let source = if alpha == Some(channel_index) {
                u8::MAX
            } else {
                mask
            };
            *channel = blend(*channel, source, mask);
        }
    }
}

/// Rounded 8-bit interpolation from `dst` toward `src` by `mask / 255`.
fn blend(dst: u8, src: u8, mask: u8) -> u8 {
    let t = u32::from(dst) * u32::from(255 - mask) + u32::from(src) * u32::from(mask) + 128;
    ((t + (t >> 8)) >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, LumaA, Rgb, RgbImage, Rgba, RgbaImage};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(37, 200, 0), 37);
        assert_eq!(blend(37, 200, 255), 200);
        assert_eq!(blend(0, 255, 255), 255);
        assert_eq!(blend(255, 255, 128), 255);
    }

    #[test]
    fn blend_midpoint_rounds() {
        // 255 * 55/255 + 200 * 200/255 = 211.86
        assert_eq!(blend(255, 200, 200), 212);
    }

    #[test]
    fn zero_mask_leaves_image_untouched() {
        let original = RgbImage::from_pixel(4, 4, Rgb([10, 120, 250]));
        let mut image = DynamicImage::ImageRgb8(original.clone());
        paste_self_masked(&mut image, &GrayImage::new(4, 4));
        assert_eq!(image.to_rgb8(), original);
    }

    #[test]
    fn full_mask_replaces_with_layer() {
        let mut image = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])));
        paste_self_masked(&mut image, &GrayImage::from_pixel(2, 2, Luma([255])));
        assert!(image.to_rgb8().pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn greyscale_destination_stays_greyscale() {
        let mut image = DynamicImage::ImageLuma8(GrayImage::from_pixel(3, 3, Luma([255])));
        paste_self_masked(&mut image, &GrayImage::from_pixel(3, 3, Luma([200])));
        assert!(matches!(image, DynamicImage::ImageLuma8(_)));
        assert!(image.to_luma8().pixels().all(|p| p[0] == 212));
    }

    #[test]
    fn alpha_moves_toward_opaque() {
        let mut image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0])));
        paste_self_masked(&mut image, &GrayImage::from_pixel(1, 1, Luma([255])));
        assert_eq!(image.to_rgba8().get_pixel(0, 0), &Rgba([255, 255, 255, 255]));

        let mut image = DynamicImage::ImageLumaA8(ImageBuffer::from_pixel(1, 1, LumaA([0, 0])));
        paste_self_masked(&mut image, &GrayImage::from_pixel(1, 1, Luma([0])));
        assert_eq!(image.to_luma_alpha8().get_pixel(0, 0), &LumaA([0, 0]));
    }

    #[test]
    fn smaller_layer_only_touches_its_area() {
        let mut image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 1, Rgb([0, 0, 0])));
        paste_self_masked(&mut image, &GrayImage::from_pixel(2, 1, Luma([255])));
        let rgb = image.to_rgb8();
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([255, 255, 255]));
        assert_eq!(rgb.get_pixel(2, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn sixteen_bit_destination_is_reduced_first() {
        let mut image = DynamicImage::new_rgb16(2, 2);
        paste_self_masked(&mut image, &GrayImage::from_pixel(2, 2, Luma([255])));
        assert!(matches!(image, DynamicImage::ImageRgb8(_)));
        assert!(image.to_rgb8().pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn overlay_uses_source_dimensions() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut image = DynamicImage::ImageRgb8(RgbImage::from_pixel(30, 20, Rgb([0, 0, 0])));
        overlay_noise(&mut image, NoiseRange::new(200, 200).unwrap(), &mut rng);

        assert_eq!((image.width(), image.height()), (30, 20));
        // Black under a flat 200 layer: 200 * 200/255 = 156.86
        assert!(image.to_rgb8().pixels().all(|p| *p == Rgb([157, 157, 157])));
    }
}
