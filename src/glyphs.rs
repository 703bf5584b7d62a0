//! Hardcoded 3x5 digit glyphs for frame-number badges.
//!
//! Each glyph is five rows, top to bottom; the low three bits of a row are
//! its pixels, most significant bit leftmost.

use crate::shapes::fill_pixels;
use image::{Rgba, RgbaImage};

pub const GLYPH_WIDTH: u32 = 3;
pub const GLYPH_HEIGHT: u32 = 5;

/// Blank column between adjacent digits
const GLYPH_SPACING: u32 = 1;

const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b011, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b010, 0b010, 0b010], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
];

/// Pixel width of a string of digits
pub fn text_width(digits: &str) -> u32 {
    let n = digits.chars().filter(char::is_ascii_digit).count() as u32;
    if n == 0 {
        0
    } else {
        n * GLYPH_WIDTH + (n - 1) * GLYPH_SPACING
    }
}

/// Pixels covered by a digit string with its top-left corner at (x, y).
///
/// Non-digit characters are skipped.
pub fn rasterize_digits(digits: &str, x: i32, y: i32) -> Vec<(i32, i32)> {
    let mut pixels = Vec::new();
    let mut pen_x = x;

    for c in digits.chars() {
        let Some(d) = c.to_digit(10) else { continue };
        for (row, bits) in DIGITS[d as usize].iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (0b100 >> col) != 0 {
                    pixels.push((pen_x + col as i32, y + row as i32));
                }
            }
        }
        pen_x += (GLYPH_WIDTH + GLYPH_SPACING) as i32;
    }

    pixels
}

/// Draw a digit string centered on (cx, cy).
pub fn draw_digits_centered(canvas: &mut RgbaImage, digits: &str, cx: i32, cy: i32, color: Rgba<u8>) {
    let x = cx - (text_width(digits) / 2) as i32;
    let y = cy - (GLYPH_HEIGHT / 2) as i32;
    fill_pixels(canvas, &rasterize_digits(digits, x, y), color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        assert_eq!(text_width(""), 0);
        assert_eq!(text_width("7"), 3);
        assert_eq!(text_width("13"), 7);
    }

    #[test]
    fn test_one_glyph_shape() {
        let pixels = rasterize_digits("1", 0, 0);
        assert_eq!(pixels.len(), 8);
        assert!(pixels.contains(&(1, 0)));
        assert!(pixels.contains(&(0, 1)));
        assert!(!pixels.contains(&(0, 0)));
    }

    #[test]
    fn test_second_digit_advances() {
        let pixels = rasterize_digits("18", 10, 0);
        assert!(pixels.iter().all(|&(x, _)| x >= 10 && x < 17));
        // '8' starts at column 14
        assert!(pixels.contains(&(14, 0)));
    }

    #[test]
    fn test_draw_centered() {
        let white = Rgba([255, 255, 255, 255]);
        let mut canvas = RgbaImage::new(16, 16);
        draw_digits_centered(&mut canvas, "8", 8, 8, white);
        // '8' is 3x5 with a full top row starting at (7, 6)
        assert_eq!(*canvas.get_pixel(7, 6), white);
        assert_eq!(*canvas.get_pixel(9, 6), white);
        assert_eq!(canvas.get_pixel(6, 6)[3], 0);
    }
}
