//! PNG and JSON output and file naming

use crate::layout::{Animation, Direction};
use crate::metadata::SpritesheetMetadata;
use image::imageops::FilterType;
use image::RgbaImage;
use log::info;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
    /// Metadata serialization error
    Json(serde_json::Error),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
            OutputError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
            OutputError::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

impl From<serde_json::Error> for OutputError {
    fn from(e: serde_json::Error) -> Self {
        OutputError::Json(e)
    }
}

/// Paths written by [`export_spritesheet_with_metadata`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub image: PathBuf,
    pub metadata: PathBuf,
}

fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Write metadata as pretty-printed JSON.
pub fn save_metadata(metadata: &SpritesheetMetadata, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    std::fs::write(path, metadata.to_json_pretty()?)?;
    Ok(())
}

/// Base name for a sheet of several animations
pub fn spritesheet_base_name(animation_count: usize) -> String {
    format!("lpc-complete-spritesheet-{}anims", animation_count)
}

/// Base name for a single-animation sheet
pub fn animation_base_name(animation: Animation) -> String {
    format!("lpc-{}-spritesheet", animation.id())
}

/// Sidecar file name for a sheet's base name
pub fn metadata_file_name(base: &str) -> String {
    format!("{}-metadata.json", base)
}

/// File name for one exported frame; frames are numbered from 1.
pub fn frame_file_name(animation: Animation, direction: Direction, frame: u32) -> String {
    format!("lpc-{}-{}-frame{}.png", animation.id(), direction.id(), frame + 1)
}

/// Write `{base}.png` and `{base}-metadata.json` into `dir`.
pub fn export_spritesheet_with_metadata(
    image: &RgbaImage,
    metadata: &SpritesheetMetadata,
    dir: &Path,
    base: &str,
) -> Result<ExportedFiles, OutputError> {
    let files = ExportedFiles {
        image: dir.join(format!("{}.png", base)),
        metadata: dir.join(metadata_file_name(base)),
    };

    save_png(image, &files.image)?;
    save_metadata(metadata, &files.metadata)?;
    info!("wrote {} and {}", files.image.display(), files.metadata.display());

    Ok(files)
}

/// Write a single frame into `dir` under its standard name.
pub fn export_frame(
    image: &RgbaImage,
    dir: &Path,
    animation: Animation,
    direction: Direction,
    frame: u32,
) -> Result<PathBuf, OutputError> {
    let path = dir.join(frame_file_name(animation, direction, frame));
    save_png(image, &path)?;
    info!("wrote {}", path.display());
    Ok(path)
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// A factor of 0 or 1 returns the image unchanged.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    let new_w = w * factor as u32;
    let new_h = h * factor as u32;
    image::imageops::resize(&image, new_w, new_h, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::build_metadata_at;
    use crate::spritesheet::SheetOptions;
    use image::Rgba;
    use tempfile::TempDir;

    #[test]
    fn test_file_names() {
        assert_eq!(spritesheet_base_name(11), "lpc-complete-spritesheet-11anims");
        assert_eq!(animation_base_name(Animation::Cast), "lpc-cast-spritesheet");
        assert_eq!(metadata_file_name("lpc-cast-spritesheet"), "lpc-cast-spritesheet-metadata.json");
        assert_eq!(frame_file_name(Animation::Walk, Direction::Left, 0), "lpc-walk-left-frame1.png");
    }

    #[test]
    fn test_save_png_creates_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/out.png");
        let image = RgbaImage::from_pixel(3, 2, Rgba([9, 8, 7, 128]));
        save_png(&image, &path).unwrap();

        let read = image::open(&path).unwrap().to_rgba8();
        assert_eq!(read, image);
    }

    #[test]
    fn test_export_with_metadata() {
        let dir = TempDir::new().unwrap();
        let metadata = build_metadata_at(&["walk"], &SheetOptions::default(), "2024-01-01T00:00:00.000Z").unwrap();
        let image = RgbaImage::new(576, 256);

        let files = export_spritesheet_with_metadata(&image, &metadata, dir.path(), "lpc-walk-spritesheet").unwrap();
        assert_eq!(files.image, dir.path().join("lpc-walk-spritesheet.png"));
        assert!(files.image.exists());

        let json = std::fs::read_to_string(&files.metadata).unwrap();
        let parsed: SpritesheetMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, metadata);
    }

    #[test]
    fn test_export_frame() {
        let dir = TempDir::new().unwrap();
        let path = export_frame(&RgbaImage::new(64, 64), dir.path(), Animation::Hurt, Direction::Down, 5).unwrap();
        assert!(path.ends_with("lpc-hurt-down-frame6.png"));
        assert!(path.exists());
    }

    #[test]
    fn test_scale_image() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(1, 0, Rgba([255, 0, 0, 255]));

        let scaled = scale_image(image.clone(), 3);
        assert_eq!(scaled.dimensions(), (6, 3));
        assert_eq!(*scaled.get_pixel(2, 2), Rgba([0, 0, 0, 0]));
        assert_eq!(*scaled.get_pixel(3, 0), Rgba([255, 0, 0, 255]));

        assert_eq!(scale_image(image.clone(), 1), image);
        assert_eq!(scale_image(image.clone(), 0), image);
    }
}
