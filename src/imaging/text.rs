//! Plain-text rendering.
//!
//! Draws black multi-line text on a white RGB canvas, anchored at the top-left
//! corner, with the public-domain 8x8 bitmap glyphs from `font8x8`. Glyphs that
//! fall past the canvas edge are clipped. Characters without a glyph still
//! advance the pen so columns line up.

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};

const GLYPH_SIZE: u32 = 8;
/// Vertical distance between baselines of consecutive lines.
const LINE_HEIGHT: u32 = GLYPH_SIZE + 3;
const TAB_WIDTH: u32 = 4;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

fn glyph(c: char) -> Option<[u8; 8]> {
    BASIC_FONTS.get(c).or_else(|| LATIN_FONTS.get(c))
}

/// Render `text` onto a fresh `width` x `height` canvas.
pub fn render_text(text: &str, width: u32, height: u32) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);

    for (line_index, line) in text.lines().enumerate() {
        let top = line_index as u32 * LINE_HEIGHT;
        if top >= height {
            break;
        }
        let mut column = 0u32;
        for c in line.chars() {
            if c == '\t' {
                column = (column / TAB_WIDTH + 1) * TAB_WIDTH;
                continue;
            }
            if let Some(rows) = glyph(c) {
                draw_glyph(&mut canvas, &rows, column * GLYPH_SIZE, top);
            }
            column += 1;
        }
    }

    canvas
}

/// Bit `x` of row `y` set means ink at (left + x, top + y).
fn draw_glyph(canvas: &mut RgbImage, rows: &[u8; 8], left: u32, top: u32) {
    for (dy, row) in rows.iter().enumerate() {
        for dx in 0..GLYPH_SIZE {
            if *row & (1u8 << dx) == 0 {
                continue;
            }
            if let Some(pixel) = canvas.get_pixel_mut_checked(left + dx, top + dy as u32) {
                *pixel = INK;
            }
        }
    }
}
