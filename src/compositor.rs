//! Frame compositor - one character pose as a 64x64 raster
//!
//! There are two ways to produce a frame:
//!
//! - **Assets**: stack the matching sub-rectangle of each enabled layer's
//!   LPC sheet, bottom to top (body, head, hair, torso, legs).
//! - **Placeholder**: draw flat-colored rectangles approximating the same
//!   parts, used when no layer art could be drawn.
//!
//! The choice is made by inspecting the bundle up front; a frame is always
//! entirely one or the other.

use crate::layers::{CharacterLayerSet, LayerSourceBundle, PhysicalLayer};
use crate::layout::{Animation, Direction, InvalidArgument, FRAME_HEIGHT, FRAME_WIDTH};
use crate::shapes::{blit_region, fill_rect};
use image::imageops::flip_horizontal_in_place;
use image::{Rgba, RgbaImage};
use log::debug;

/// Which path produced a composed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSource {
    /// At least one layer sheet was drawn
    Assets,
    /// Procedural placeholder geometry
    Placeholder,
}

/// A single composed character frame
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedFrame {
    pub image: RgbaImage,
    pub source: FrameSource,
}

impl ComposedFrame {
    pub fn is_placeholder(&self) -> bool {
        self.source == FrameSource::Placeholder
    }
}

/// Compose one frame.
///
/// Missing or partial bundles never fail; they fall back to placeholder
/// geometry. Only a frame index outside the animation is rejected.
///
/// # Examples
///
/// ```
/// use lpc_spritegen::compositor::{compose_frame, FrameSource};
/// use lpc_spritegen::layers::CharacterLayerSet;
/// use lpc_spritegen::layout::{Animation, Direction};
///
/// let frame = compose_frame(&CharacterLayerSet::default(), Direction::Down, Animation::Walk, 0, None).unwrap();
/// assert_eq!(frame.image.dimensions(), (64, 64));
/// assert_eq!(frame.source, FrameSource::Placeholder);
///
/// assert!(compose_frame(&CharacterLayerSet::default(), Direction::Down, Animation::Sit, 1, None).is_err());
/// ```
pub fn compose_frame(
    layers: &CharacterLayerSet,
    direction: Direction,
    animation: Animation,
    frame: u32,
    bundle: Option<&LayerSourceBundle>,
) -> Result<ComposedFrame, InvalidArgument> {
    animation.check_frame(frame)?;

    if let Some(bundle) = bundle.filter(|b| b.has_any_image()) {
        if let Some(image) = composite_layers(layers, direction, animation, frame, bundle) {
            return Ok(ComposedFrame { image, source: FrameSource::Assets });
        }
        debug!("no layer art drawn for {} {} frame {}, using placeholder", animation, direction, frame);
    }

    Ok(ComposedFrame { image: render_placeholder(layers, direction), source: FrameSource::Placeholder })
}

/// Compose one frame from string ids, as supplied by a UI or config file.
pub fn compose_frame_by_id(
    layers: &CharacterLayerSet,
    direction: &str,
    animation: &str,
    frame: u32,
    bundle: Option<&LayerSourceBundle>,
) -> Result<ComposedFrame, InvalidArgument> {
    let animation: Animation = animation.parse()?;
    let direction: Direction = direction.parse()?;
    compose_frame(layers, direction, animation, frame, bundle)
}

/// Stack layer sheets; `None` if no layer contributed.
fn composite_layers(
    layers: &CharacterLayerSet,
    direction: Direction,
    animation: Animation,
    frame: u32,
    bundle: &LayerSourceBundle,
) -> Option<RgbaImage> {
    let src_x = frame * FRAME_WIDTH;
    let src_y = direction.row() * FRAME_HEIGHT;

    let mut canvas = RgbaImage::new(FRAME_WIDTH, FRAME_HEIGHT);
    let mut drawn = false;

    for layer in PhysicalLayer::ALL {
        if !layer.enabled_in(layers) {
            continue;
        }
        let Some(sheet) = bundle.image(layer, animation) else {
            debug!("layer {} has no sheet for {}", layer, animation);
            continue;
        };
        if src_x >= sheet.width() || src_y >= sheet.height() {
            debug!(
                "{} sheet for {} is {}x{}, frame {} row {} lies outside it",
                layer,
                animation,
                sheet.width(),
                sheet.height(),
                frame,
                direction.row()
            );
            continue;
        }

        blit_region(&mut canvas, sheet, (src_x, src_y, FRAME_WIDTH, FRAME_HEIGHT), 0, 0);
        drawn = true;
    }

    drawn.then_some(canvas)
}

/// Placeholder palette
pub mod palette {
    use image::Rgba;

    pub const BODY: Rgba<u8> = Rgba([0x8B, 0x45, 0x13, 0xFF]);
    pub const SKIN: Rgba<u8> = Rgba([0xFF, 0xDB, 0xAC, 0xFF]);
    pub const FACE: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 0xFF]);
    pub const HAIR: Rgba<u8> = Rgba([0x65, 0x43, 0x21, 0xFF]);
    pub const SHIRT: Rgba<u8> = Rgba([0x41, 0x69, 0xE1, 0xFF]);
    pub const PANTS: Rgba<u8> = Rgba([0x2F, 0x4F, 0x4F, 0xFF]);
    pub const CAPE: Rgba<u8> = Rgba([0x8B, 0x00, 0x00, 0xFF]);
    pub const HAT: Rgba<u8> = Rgba([0x8B, 0x45, 0x13, 0xFF]);
}

/// An axis-aligned placeholder part: (x, y, w, h)
type Rect = (i32, i32, i32, i32);

/// Rectangles for one viewing angle
struct PartGeometry {
    body: Rect,
    head: Rect,
    face: &'static [Rect],
    hair: Rect,
    shirt: Rect,
    pants: Rect,
    hat: Rect,
}

const FRONT: PartGeometry = PartGeometry {
    body: (22, 40, 20, 20),
    head: (24, 20, 16, 18),
    face: &[(28, 26, 1, 1), (35, 26, 1, 1), (30, 30, 4, 1)],
    hair: (24, 20, 16, 8),
    shirt: (20, 38, 24, 15),
    pants: (22, 50, 20, 14),
    hat: (24, 18, 16, 4),
};

// Drawn facing right; left is this mirrored.
const PROFILE: PartGeometry = PartGeometry {
    body: (24, 40, 16, 20),
    head: (26, 20, 12, 18),
    face: &[(30, 26, 1, 1), (29, 30, 2, 1)],
    hair: (25, 20, 14, 10),
    shirt: (22, 38, 20, 15),
    pants: (24, 50, 16, 14),
    hat: (25, 18, 14, 4),
};

const CAPE: Rect = (18, 35, 28, 20);

/// Draw placeholder geometry for a direction.
///
/// The result depends only on `layers` and `direction`; per-frame motion
/// is applied by the caller through the offset tables.
pub fn render_placeholder(layers: &CharacterLayerSet, direction: Direction) -> RgbaImage {
    let geometry = if direction.is_profile() { &PROFILE } else { &FRONT };
    let is_back = direction.is_back();

    let mut canvas = RgbaImage::new(FRAME_WIDTH, FRAME_HEIGHT);
    let mut fill = |rect: Rect, color: Rgba<u8>| fill_rect(&mut canvas, rect.0, rect.1, rect.2, rect.3, color);

    if layers.body {
        fill(geometry.body, palette::BODY);
    }

    if layers.head {
        fill(geometry.head, palette::SKIN);
        if !is_back {
            for &mark in geometry.face {
                fill(mark, palette::FACE);
            }
        }
    }

    if layers.hair {
        fill(geometry.hair, palette::HAIR);
    }

    if layers.clothing {
        fill(geometry.shirt, palette::SHIRT);
        fill(geometry.pants, palette::PANTS);
    }

    if layers.accessories {
        if is_back {
            fill(CAPE, palette::CAPE);
        }
        fill(geometry.hat, palette::HAT);
    }

    if direction == Direction::Left {
        flip_horizontal_in_place(&mut canvas);
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn solid_sheet(animation: Animation, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(animation.frame_count() * 64, 4 * 64, color)
    }

    /// Sheet where only rect (x, y, w, h) of every cell is painted
    fn patterned_sheet(animation: Animation, rect: Rect, color: Rgba<u8>) -> RgbaImage {
        let mut sheet = RgbaImage::new(animation.frame_count() * 64, 4 * 64);
        for row in 0..4 {
            for frame in 0..animation.frame_count() {
                let (x, y) = ((frame * 64) as i32, (row * 64) as i32);
                fill_rect(&mut sheet, x + rect.0, y + rect.1, rect.2, rect.3, color);
            }
        }
        sheet
    }

    fn differing_pixels(a: &RgbaImage, b: &RgbaImage) -> HashSet<(i32, i32)> {
        a.enumerate_pixels()
            .filter(|(x, y, p)| b.get_pixel(*x, *y) != *p)
            .map(|(x, y, _)| (x as i32, y as i32))
            .collect()
    }

    fn within(p: (i32, i32), rect: Rect) -> bool {
        p.0 >= rect.0 && p.0 < rect.0 + rect.2 && p.1 >= rect.1 && p.1 < rect.1 + rect.3
    }

    #[test]
    fn test_placeholder_is_deterministic() {
        let layers = CharacterLayerSet::all();
        for direction in Direction::ALL {
            for animation in Animation::ALL {
                for frame in 0..animation.frame_count() {
                    let a = compose_frame(&layers, direction, animation, frame, None).unwrap();
                    let b = compose_frame(&layers, direction, animation, frame, None).unwrap();
                    assert_eq!(a, b);
                }
            }
        }
    }

    #[test]
    fn test_front_view_has_face() {
        // Hair is drawn over the eye line, so leave it off here
        let layers = CharacterLayerSet { hair: false, ..CharacterLayerSet::default() };
        let image = render_placeholder(&layers, Direction::Down);
        assert_eq!(*image.get_pixel(28, 26), palette::FACE);
        assert_eq!(*image.get_pixel(35, 26), palette::FACE);
        assert_eq!(*image.get_pixel(30, 30), palette::FACE);
        assert_eq!(*image.get_pixel(0, 0), CLEAR);
    }

    #[test]
    fn test_back_view_hides_face() {
        let layers = CharacterLayerSet { hair: false, ..CharacterLayerSet::default() };
        let image = render_placeholder(&layers, Direction::Up);
        assert_eq!(*image.get_pixel(28, 26), palette::SKIN);
        assert_eq!(*image.get_pixel(30, 30), palette::SKIN);
    }

    #[test]
    fn test_profile_is_narrower() {
        let layers = CharacterLayerSet { clothing: false, ..CharacterLayerSet::default() };
        let front = render_placeholder(&layers, Direction::Down);
        let side = render_placeholder(&layers, Direction::Right);
        assert_eq!(*front.get_pixel(22, 45), palette::BODY);
        assert_eq!(*side.get_pixel(22, 45), CLEAR);
        assert_eq!(*side.get_pixel(24, 45), palette::BODY);
    }

    #[test]
    fn test_left_mirrors_right() {
        let layers = CharacterLayerSet::all();
        let right = render_placeholder(&layers, Direction::Right);
        let left = render_placeholder(&layers, Direction::Left);
        for (x, y, pixel) in right.enumerate_pixels() {
            assert_eq!(left.get_pixel(63 - x, y), pixel);
        }
        // The mouth spans x=29..31 facing right, x=33..35 facing left
        assert_eq!(*right.get_pixel(29, 30), palette::FACE);
        assert_eq!(*left.get_pixel(33, 30), palette::FACE);
        assert_eq!(*left.get_pixel(34, 30), palette::FACE);
    }

    #[test]
    fn test_cape_only_from_behind_hat_always() {
        let layers = CharacterLayerSet::all();
        let back = render_placeholder(&layers, Direction::Up);
        let front = render_placeholder(&layers, Direction::Down);

        // Cape corner lies outside every other part
        assert_eq!(*back.get_pixel(18, 35), palette::CAPE);
        assert_eq!(*front.get_pixel(18, 35), CLEAR);

        assert_eq!(*back.get_pixel(24, 18), palette::HAT);
        assert_eq!(*front.get_pixel(24, 18), palette::HAT);
    }

    #[test]
    fn test_no_layers_is_blank() {
        let image = render_placeholder(&CharacterLayerSet::none(), Direction::Down);
        assert!(image.pixels().all(|p| *p == CLEAR));
    }

    #[test]
    fn test_placeholder_clothing_toggle_only_touches_clothes() {
        let all = CharacterLayerSet::all();
        let no_clothes = CharacterLayerSet { clothing: false, ..all };
        for direction in [Direction::Down, Direction::Up, Direction::Right] {
            let geometry = if direction.is_profile() { &PROFILE } else { &FRONT };
            let with = render_placeholder(&all, direction);
            let without = render_placeholder(&no_clothes, direction);
            let diff = differing_pixels(&with, &without);
            assert!(!diff.is_empty());
            for p in diff {
                assert!(within(p, geometry.shirt) || within(p, geometry.pants), "{:?} changed", p);
            }
        }
    }

    #[test]
    fn test_missing_bundle_entries_fall_back() {
        let mut bundle = LayerSourceBundle::new();
        for layer in PhysicalLayer::ALL {
            for animation in Animation::ALL {
                bundle.mark_missing(layer, animation);
            }
        }

        let layers = CharacterLayerSet::all();
        let frame = compose_frame(&layers, Direction::Left, Animation::Shoot, 12, Some(&bundle)).unwrap();
        assert!(frame.is_placeholder());
        assert_eq!(frame.image, render_placeholder(&layers, Direction::Left));
    }

    #[test]
    fn test_disabled_layers_fall_back_to_placeholder() {
        let mut bundle = LayerSourceBundle::new();
        bundle.insert(PhysicalLayer::Hair, Animation::Walk, solid_sheet(Animation::Walk, palette::HAIR));

        let layers = CharacterLayerSet { hair: false, ..CharacterLayerSet::default() };
        let frame = compose_frame(&layers, Direction::Down, Animation::Walk, 0, Some(&bundle)).unwrap();
        assert!(frame.is_placeholder());

        // Art for a different animation does not help either
        let frame = compose_frame(&CharacterLayerSet::all(), Direction::Down, Animation::Run, 0, Some(&bundle)).unwrap();
        assert!(frame.is_placeholder());
    }

    #[test]
    fn test_samples_frame_and_direction_cell() {
        let mut sheet = RgbaImage::new(9 * 64, 4 * 64);
        let marker = Rgba([10, 20, 30, 255]);
        // Frame 2, left row (1)
        sheet.put_pixel(2 * 64 + 5, 64 + 7, marker);

        let mut bundle = LayerSourceBundle::new();
        bundle.insert(PhysicalLayer::Body, Animation::Walk, sheet);
        let layers = CharacterLayerSet::default();

        let frame = compose_frame(&layers, Direction::Left, Animation::Walk, 2, Some(&bundle)).unwrap();
        assert_eq!(frame.source, FrameSource::Assets);
        assert_eq!(*frame.image.get_pixel(5, 7), marker);

        let other = compose_frame(&layers, Direction::Down, Animation::Walk, 2, Some(&bundle)).unwrap();
        assert_eq!(other.source, FrameSource::Assets);
        assert_eq!(*other.image.get_pixel(5, 7), CLEAR);
    }

    #[test]
    fn test_layers_stack_in_order() {
        let red = Rgba([255, 0, 0, 255]);
        let green = Rgba([0, 255, 0, 255]);
        let mut bundle = LayerSourceBundle::new();
        bundle.insert(PhysicalLayer::Body, Animation::Idle, solid_sheet(Animation::Idle, red));
        bundle.insert(PhysicalLayer::Legs, Animation::Idle, patterned_sheet(Animation::Idle, (0, 32, 64, 32), green));

        let frame =
            compose_frame(&CharacterLayerSet::default(), Direction::Right, Animation::Idle, 5, Some(&bundle)).unwrap();
        assert_eq!(*frame.image.get_pixel(0, 0), red);
        assert_eq!(*frame.image.get_pixel(0, 40), green);
    }

    #[test]
    fn test_asset_clothing_toggle_only_touches_clothes() {
        let torso_rect: Rect = (16, 30, 32, 16);
        let legs_rect: Rect = (20, 46, 24, 18);

        let mut bundle = LayerSourceBundle::new();
        let a = Animation::Slash;
        bundle.insert(PhysicalLayer::Body, a, patterned_sheet(a, (20, 20, 24, 44), palette::BODY));
        bundle.insert(PhysicalLayer::Head, a, patterned_sheet(a, (24, 8, 16, 16), palette::SKIN));
        bundle.insert(PhysicalLayer::Hair, a, patterned_sheet(a, (24, 4, 16, 6), palette::HAIR));
        bundle.insert(PhysicalLayer::Torso, a, patterned_sheet(a, torso_rect, palette::SHIRT));
        bundle.insert(PhysicalLayer::Legs, a, patterned_sheet(a, legs_rect, palette::PANTS));

        let all = CharacterLayerSet::all();
        let no_clothes = CharacterLayerSet { clothing: false, ..all };
        let with = compose_frame(&all, Direction::Down, a, 3, Some(&bundle)).unwrap();
        let without = compose_frame(&no_clothes, Direction::Down, a, 3, Some(&bundle)).unwrap();
        assert_eq!(without.source, FrameSource::Assets);

        let diff = differing_pixels(&with.image, &without.image);
        assert!(!diff.is_empty());
        for p in diff {
            assert!(within(p, torso_rect) || within(p, legs_rect), "{:?} changed", p);
        }
    }

    #[test]
    fn test_undersized_sheet_contributes_nothing() {
        let mut bundle = LayerSourceBundle::new();
        bundle.insert(PhysicalLayer::Body, Animation::Walk, RgbaImage::from_pixel(64, 64, palette::BODY));

        let layers = CharacterLayerSet::default();
        let first = compose_frame(&layers, Direction::Up, Animation::Walk, 0, Some(&bundle)).unwrap();
        assert_eq!(first.source, FrameSource::Assets);

        let later = compose_frame(&layers, Direction::Up, Animation::Walk, 4, Some(&bundle)).unwrap();
        assert!(later.is_placeholder());
    }

    #[test]
    fn test_compose_by_id() {
        let layers = CharacterLayerSet::default();
        assert!(compose_frame_by_id(&layers, "down", "walk", 8, None).is_ok());
        assert_eq!(
            compose_frame_by_id(&layers, "down", "moonwalk", 0, None).unwrap_err(),
            InvalidArgument::UnknownAnimation("moonwalk".to_string())
        );
        assert_eq!(
            compose_frame_by_id(&layers, "sideways", "walk", 0, None).unwrap_err(),
            InvalidArgument::UnknownDirection("sideways".to_string())
        );
        assert!(matches!(
            compose_frame_by_id(&layers, "down", "walk", 9, None),
            Err(InvalidArgument::FrameOutOfRange { frame: 9, .. })
        ));
    }
}
