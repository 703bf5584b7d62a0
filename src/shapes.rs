//! Shape rasterization and pixel blitting for pixel-perfect rendering.
//!
//! Everything here works on whole pixels: no sub-pixel sampling and no
//! smoothing, so pixel art stays crisp.

use image::{Rgba, RgbaImage};

/// Rasterize a filled rectangle.
///
/// Returns all pixels within a rectangle defined by top-left corner (x, y)
/// and dimensions (w, h), in row-major order.
///
/// # Examples
///
/// ```
/// use lpc_spritegen::shapes::rasterize_rect;
///
/// let pixels = rasterize_rect(0, 0, 3, 2);
/// assert_eq!(pixels.len(), 6);
/// assert_eq!(pixels[0], (0, 0));
/// assert_eq!(pixels[5], (2, 1));
/// ```
pub fn rasterize_rect(x: i32, y: i32, w: i32, h: i32) -> Vec<(i32, i32)> {
    if w <= 0 || h <= 0 {
        return Vec::new();
    }

    let mut pixels = Vec::with_capacity((w * h) as usize);
    for dy in 0..h {
        for dx in 0..w {
            pixels.push((x + dx, y + dy));
        }
    }
    pixels
}

/// Rasterize a filled circle.
///
/// A pixel belongs to the circle when its center lies within `radius` of
/// the point (cx, cy). Centers are at half-pixel positions, so a circle
/// centered on a pixel corner is symmetric.
///
/// # Examples
///
/// ```
/// use lpc_spritegen::shapes::rasterize_circle;
///
/// let pixels = rasterize_circle(8.0, 8.0, 2.0);
/// assert!(pixels.contains(&(7, 7)));
/// assert!(pixels.contains(&(8, 8)));
/// assert!(!pixels.contains(&(5, 8)));
/// ```
pub fn rasterize_circle(cx: f32, cy: f32, radius: f32) -> Vec<(i32, i32)> {
    let mut pixels = Vec::new();
    if radius <= 0.0 {
        return pixels;
    }

    let r_sq = radius * radius;
    let min_x = (cx - radius).floor() as i32;
    let max_x = (cx + radius).ceil() as i32;
    let min_y = (cy - radius).floor() as i32;
    let max_y = (cy + radius).ceil() as i32;

    for py in min_y..max_y {
        for px in min_x..max_x {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= r_sq {
                pixels.push((px, py));
            }
        }
    }
    pixels
}

/// Fill pixels with a color using source-over blending.
///
/// Coordinates outside the canvas are skipped.
pub fn fill_pixels(canvas: &mut RgbaImage, pixels: &[(i32, i32)], color: Rgba<u8>) {
    for &(x, y) in pixels {
        if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
            continue;
        }
        let dst = *canvas.get_pixel(x as u32, y as u32);
        canvas.put_pixel(x as u32, y as u32, blend_over(color, dst));
    }
}

/// Fill a rectangle, clipped to the canvas.
pub fn fill_rect(canvas: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, color: Rgba<u8>) {
    fill_pixels(canvas, &rasterize_rect(x, y, w, h), color);
}

/// Copy a source region onto the canvas with source-over blending.
///
/// `src` is the (x, y, w, h) region of `source`; it is drawn with its
/// top-left corner at (dest_x, dest_y), which may be negative. Pixels that
/// fall outside either image are skipped.
pub fn blit_region(
    canvas: &mut RgbaImage,
    source: &RgbaImage,
    src: (u32, u32, u32, u32),
    dest_x: i32,
    dest_y: i32,
) {
    let (sx, sy, sw, sh) = src;
    for oy in 0..sh {
        let src_y = sy + oy;
        let dst_y = dest_y + oy as i32;
        if src_y >= source.height() {
            break;
        }
        if dst_y < 0 || dst_y as u32 >= canvas.height() {
            continue;
        }

        for ox in 0..sw {
            let src_x = sx + ox;
            let dst_x = dest_x + ox as i32;
            if src_x >= source.width() {
                break;
            }
            if dst_x < 0 || dst_x as u32 >= canvas.width() {
                continue;
            }

            let pixel = *source.get_pixel(src_x, src_y);
            // Fully transparent source, skip
            if pixel[3] == 0 {
                continue;
            }
            let dst = *canvas.get_pixel(dst_x as u32, dst_y as u32);
            canvas.put_pixel(dst_x as u32, dst_y as u32, blend_over(pixel, dst));
        }
    }
}

/// Blit a whole image with its top-left corner at (x, y).
pub fn blit(canvas: &mut RgbaImage, source: &RgbaImage, x: i32, y: i32) {
    blit_region(canvas, source, (0, 0, source.width(), source.height()), x, y);
}

/// Porter-Duff "source over" for one pixel.
pub fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    if src[3] == 255 {
        return src;
    }
    if src[3] == 0 {
        return dst;
    }

    let src_alpha = src[3] as f32 / 255.0;
    let dst_alpha = dst[3] as f32 / 255.0;

    // out_alpha = src_alpha + dst_alpha * (1 - src_alpha)
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let composite = |s: u8, d: u8| -> u8 {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        let result = (s * src_alpha + d * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        (result.clamp(0.0, 1.0) * 255.0).round() as u8
    };

    Rgba([
        composite(src[0], dst[0]),
        composite(src[1], dst[1]),
        composite(src[2], dst[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    #[test]
    fn test_rect_empty_for_nonpositive_size() {
        assert!(rasterize_rect(0, 0, 0, 5).is_empty());
        assert!(rasterize_rect(0, 0, 5, -1).is_empty());
    }

    #[test]
    fn test_circle_is_symmetric() {
        let pixels = rasterize_circle(52.0, 12.0, 8.0);
        for &(x, y) in &pixels {
            let mirrored = (103 - x, y);
            assert!(pixels.contains(&mirrored), "missing mirror of {:?}", (x, y));
        }
        assert!(pixels.contains(&(44, 11)));
        assert!(!pixels.contains(&(43, 11)));
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut canvas = RgbaImage::from_pixel(4, 4, CLEAR);
        fill_rect(&mut canvas, -2, -2, 4, 4, RED);
        assert_eq!(*canvas.get_pixel(0, 0), RED);
        assert_eq!(*canvas.get_pixel(1, 1), RED);
        assert_eq!(*canvas.get_pixel(2, 2), CLEAR);
    }

    #[test]
    fn test_blit_region_offsets_and_clips() {
        let mut source = RgbaImage::from_pixel(4, 2, CLEAR);
        source.put_pixel(2, 1, RED);
        source.put_pixel(3, 1, BLUE);

        let mut canvas = RgbaImage::from_pixel(2, 2, CLEAR);
        blit_region(&mut canvas, &source, (2, 0, 2, 2), 0, 0);
        assert_eq!(*canvas.get_pixel(0, 1), RED);
        assert_eq!(*canvas.get_pixel(1, 1), BLUE);

        let mut shifted = RgbaImage::from_pixel(2, 2, CLEAR);
        blit_region(&mut shifted, &source, (2, 0, 2, 2), -1, 0);
        assert_eq!(*shifted.get_pixel(0, 1), BLUE);
        assert_eq!(*shifted.get_pixel(1, 1), CLEAR);
    }

    #[test]
    fn test_blit_region_past_source_edge() {
        let source = RgbaImage::from_pixel(2, 2, RED);
        let mut canvas = RgbaImage::from_pixel(4, 4, CLEAR);
        blit_region(&mut canvas, &source, (1, 1, 3, 3), 0, 0);
        assert_eq!(*canvas.get_pixel(0, 0), RED);
        assert_eq!(*canvas.get_pixel(1, 0), CLEAR);
        assert_eq!(*canvas.get_pixel(0, 1), CLEAR);
    }

    #[test]
    fn test_blend_over() {
        assert_eq!(blend_over(RED, BLUE), RED);
        assert_eq!(blend_over(CLEAR, BLUE), BLUE);

        let half_black = Rgba([0, 0, 0, 128]);
        let out = blend_over(half_black, Rgba([255, 255, 255, 255]));
        assert_eq!(out[3], 255);
        assert!(out[0] > 120 && out[0] < 135);

        let onto_clear = blend_over(half_black, CLEAR);
        assert_eq!(onto_clear, Rgba([0, 0, 0, 128]));
    }
}
