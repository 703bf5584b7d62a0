//! Preview grid - one thumbnail per registered animation

use crate::color::Background;
use crate::compositor::compose_frame;
use crate::layers::{CharacterLayerSet, LayerSourceBundle};
use crate::layout::{Animation, Direction, InvalidArgument, FRAME_HEIGHT, FRAME_WIDTH};
use crate::output::scale_image;
use crate::shapes::blit;
use image::{Rgba, RgbaImage};

/// Thumbnails per grid row
pub const PREVIEW_COLUMNS: u32 = 4;

/// Options for [`generate_preview_grid`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Integer upscale applied to each thumbnail
    pub scale: u8,
    /// Gap between thumbnails; half of it pads the outer edge
    pub grid_spacing: u32,
    pub background: Background,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self { scale: 2, grid_spacing: 10, background: Background::Solid(Rgba([0xf0, 0xf0, 0xf0, 0xff])) }
    }
}

/// Render frame 0 of every animation, facing down, in a four-column grid.
pub fn generate_preview_grid(
    layers: &CharacterLayerSet,
    options: &PreviewOptions,
    bundle: Option<&LayerSourceBundle>,
) -> Result<RgbaImage, InvalidArgument> {
    let scale = options.scale.max(1) as u32;
    let cell_width = FRAME_WIDTH * scale + options.grid_spacing;
    let cell_height = FRAME_HEIGHT * scale + options.grid_spacing;
    let rows = (Animation::ALL.len() as u32).div_ceil(PREVIEW_COLUMNS);

    let (width, height) = (PREVIEW_COLUMNS * cell_width, rows * cell_height);
    let mut grid = match options.background.fill() {
        Some(color) => RgbaImage::from_pixel(width, height, color),
        None => RgbaImage::new(width, height),
    };

    for (index, animation) in Animation::ALL.into_iter().enumerate() {
        let col = index as u32 % PREVIEW_COLUMNS;
        let row = index as u32 / PREVIEW_COLUMNS;
        let x = col * cell_width + options.grid_spacing / 2;
        let y = row * cell_height + options.grid_spacing / 2;

        let frame = compose_frame(layers, Direction::Down, animation, 0, bundle)?;
        let thumbnail = scale_image(frame.image, options.scale);
        blit(&mut grid, &thumbnail, x as i32, y as i32);
    }

    Ok(grid)
}
