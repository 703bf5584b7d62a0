//! Spritesheet packing - tiles composed frames into one LPC-layout image
//!
//! Each selected animation takes a block of four rows (up, left, down,
//! right) and each frame of the cycle takes one column. The sheet is as
//! wide as the longest selected animation; shorter rows stay background.

use crate::color::Background;
use crate::compositor::compose_frame;
use crate::glyphs::draw_digits_centered;
use crate::layers::{CharacterLayerSet, LayerSourceBundle};
use crate::layout::{Animation, InvalidArgument, SpritesheetLayout, FRAME_HEIGHT, FRAME_WIDTH, MAX_FRAME_SIZE};
use crate::offsets::frame_offset;
use crate::shapes::{blit, fill_pixels, rasterize_circle};
use crate::validate::{resolve_animations, validate_request, ValidationError};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use log::{debug, info};
use thiserror::Error;

/// Radius of the frame-number badge
const BADGE_RADIUS: f32 = 8.0;

/// Badge center distance from the cell's top-right corner
const BADGE_INSET: i32 = 12;

/// Black at 70% opacity
const BADGE_FILL: Rgba<u8> = Rgba([0, 0, 0, 179]);

const BADGE_TEXT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Error type for spritesheet generation
#[derive(Debug, Error)]
pub enum SpritesheetError {
    /// The request was rejected before any drawing
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// An animation, direction or frame did not exist
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
    /// Frame dimensions must be non-zero, bounded, and fit the canvas
    #[error("invalid frame size {width}x{height} (each side must be 1 to {max})", max = MAX_FRAME_SIZE)]
    InvalidFrameSize { width: u32, height: u32 },
}

/// Options controlling how a sheet is packed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetOptions {
    pub frame_width: u32,
    pub frame_height: u32,
    /// Draw a numbered badge in the top-right corner of every cell
    pub include_frame_numbers: bool,
    pub background: Background,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            frame_width: FRAME_WIDTH,
            frame_height: FRAME_HEIGHT,
            include_frame_numbers: false,
            background: Background::Transparent,
        }
    }
}

impl SheetOptions {
    fn check_frame_size(&self) -> Result<(), SpritesheetError> {
        let valid = 1..=MAX_FRAME_SIZE;
        if !valid.contains(&self.frame_width) || !valid.contains(&self.frame_height) {
            return Err(SpritesheetError::InvalidFrameSize {
                width: self.frame_width,
                height: self.frame_height,
            });
        }
        Ok(())
    }

    /// True when composed frames must be stretched to fit a cell
    fn needs_resize(&self) -> bool {
        self.frame_width != FRAME_WIDTH || self.frame_height != FRAME_HEIGHT
    }
}

/// Pack every selected animation into one sheet.
///
/// Animation ids are validated before anything is allocated. An empty
/// selection packs the whole registry.
///
/// # Examples
///
/// ```
/// use lpc_spritegen::layers::CharacterLayerSet;
/// use lpc_spritegen::spritesheet::{generate_spritesheet, SheetOptions};
///
/// let sheet = generate_spritesheet(
///     &CharacterLayerSet::default(),
///     &["walk", "run"],
///     &SheetOptions::default(),
///     None,
/// )
/// .unwrap();
/// assert_eq!(sheet.dimensions(), (576, 512));
/// ```
pub fn generate_spritesheet<S: AsRef<str>>(
    layers: &CharacterLayerSet,
    selected: &[S],
    options: &SheetOptions,
    bundle: Option<&LayerSourceBundle>,
) -> Result<RgbaImage, SpritesheetError> {
    validate_request(Some(layers), Some(selected)).into_result()?;
    options.check_frame_size()?;

    let animations = resolve_animations(selected)?;
    let layout = SpritesheetLayout::new(&animations, options.frame_width, options.frame_height);
    pack(layers, &layout, options, bundle)
}

/// Pack a single animation: one column per frame, one row per direction.
pub fn generate_animation_spritesheet(
    layers: &CharacterLayerSet,
    animation_id: &str,
    options: &SheetOptions,
    bundle: Option<&LayerSourceBundle>,
) -> Result<RgbaImage, SpritesheetError> {
    validate_request(Some(layers), Some(&[animation_id][..])).into_result()?;
    options.check_frame_size()?;

    let animation: Animation = animation_id.parse()?;
    let layout = SpritesheetLayout::new(&[animation], options.frame_width, options.frame_height);
    pack(layers, &layout, options, bundle)
}

/// Draw every cell of a layout onto a fresh canvas.
pub fn pack(
    layers: &CharacterLayerSet,
    layout: &SpritesheetLayout,
    options: &SheetOptions,
    bundle: Option<&LayerSourceBundle>,
) -> Result<RgbaImage, SpritesheetError> {
    options.check_frame_size()?;
    let (width, height) = layout.dimensions().ok_or(SpritesheetError::InvalidFrameSize {
        width: layout.frame_width,
        height: layout.frame_height,
    })?;

    let mut sheet = match options.background.fill() {
        Some(color) => RgbaImage::from_pixel(width, height, color),
        None => RgbaImage::new(width, height),
    };

    let mut placeholder_cells = 0usize;
    let mut total_cells = 0usize;

    for cell in layout.cells() {
        let composed = compose_frame(layers, cell.direction, cell.animation, cell.frame, bundle)?;
        total_cells += 1;

        let (mut dest_x, mut dest_y) = (cell.x as i32, cell.y as i32);
        if composed.is_placeholder() {
            let offset = frame_offset(cell.animation, cell.frame, cell.direction);
            dest_x += offset.x;
            dest_y += offset.y;
            placeholder_cells += 1;
        }

        if options.needs_resize() {
            let scaled = imageops::resize(&composed.image, options.frame_width, options.frame_height, FilterType::Nearest);
            blit(&mut sheet, &scaled, dest_x, dest_y);
        } else {
            blit(&mut sheet, &composed.image, dest_x, dest_y);
        }

        if options.include_frame_numbers {
            draw_frame_badge(&mut sheet, cell.x, cell.y, options.frame_width, cell.frame);
        }
    }

    if placeholder_cells > 0 {
        debug!("{} of {} cells used placeholder art", placeholder_cells, total_cells);
    }
    info!(
        "packed {} animation(s) into {}x{} sheet ({} cells)",
        layout.blocks.len(),
        sheet.width(),
        sheet.height(),
        total_cells
    );

    Ok(sheet)
}

/// Dark circle with the one-based frame number, near the cell's top-right corner.
fn draw_frame_badge(sheet: &mut RgbaImage, x: u32, y: u32, frame_width: u32, frame: u32) {
    let cx = x as i32 + frame_width as i32 - BADGE_INSET;
    let cy = y as i32 + BADGE_INSET;

    fill_pixels(sheet, &rasterize_circle(cx as f32, cy as f32, BADGE_RADIUS), BADGE_FILL);
    draw_digits_centered(sheet, &(frame + 1).to_string(), cx, cy, BADGE_TEXT);
}
