//! Directory-backed loading of LPC layer sheets
//!
//! The expected tree mirrors the Universal LPC generator: one directory
//! per layer variant holding one sheet per animation.
//!
//! ```text
//! <root>/body/bodies/male/walk.png
//! <root>/body/bodies/male/spellcast.png
//! <root>/legs/pants/male/walk.png
//! ```

use super::cache::AssetCache;
use crate::layers::{LayerSourceBundle, PhysicalLayer};
use crate::layout::Animation;
use image::RgbaImage;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Error loading a single sheet
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// File name of an animation's sheet in the LPC tree.
///
/// ```
/// use lpc_spritegen::assets::animation_file_name;
/// use lpc_spritegen::layout::Animation;
///
/// assert_eq!(animation_file_name(Animation::Cast), "spellcast.png");
/// assert_eq!(animation_file_name(Animation::Walk), "walk.png");
/// ```
pub fn animation_file_name(animation: Animation) -> String {
    match animation {
        Animation::Cast => "spellcast.png".to_string(),
        other => format!("{}.png", other.id()),
    }
}

/// Where each layer's sheets live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub root: PathBuf,
    pub body: PathBuf,
    pub head: PathBuf,
    pub hair: PathBuf,
    pub torso: PathBuf,
    pub legs: PathBuf,
}

impl AssetPaths {
    /// Default LPC sub-directories under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            body: PathBuf::from("body/bodies/male"),
            head: PathBuf::from("head/heads/human/male"),
            hair: PathBuf::from("hair/plain/adult"),
            torso: PathBuf::from("torso/clothes/longsleeve/longsleeve/male"),
            legs: PathBuf::from("legs/pants/male"),
        }
    }

    /// Directory holding one layer's sheets
    pub fn layer_dir(&self, layer: PhysicalLayer) -> PathBuf {
        let sub = match layer {
            PhysicalLayer::Body => &self.body,
            PhysicalLayer::Head => &self.head,
            PhysicalLayer::Hair => &self.hair,
            PhysicalLayer::Torso => &self.torso,
            PhysicalLayer::Legs => &self.legs,
        };
        self.root.join(sub)
    }

    pub fn sheet_path(&self, layer: PhysicalLayer, animation: Animation) -> PathBuf {
        self.layer_dir(layer).join(animation_file_name(animation))
    }
}

/// Counts from one bundle load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Sheets decoded (or served from cache)
    pub loaded: usize,
    /// Sheets with no file on disk
    pub missing: usize,
    /// Sheets present but undecodable
    pub failed: usize,
}

impl LoadReport {
    fn merge(self, other: LoadReport) -> LoadReport {
        LoadReport {
            loaded: self.loaded + other.loaded,
            missing: self.missing + other.missing,
            failed: self.failed + other.failed,
        }
    }
}

/// Loads layer sheets through a shared [`AssetCache`].
#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    cache: Arc<AssetCache>,
}

impl AssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an existing cache between loaders.
    pub fn with_cache(cache: Arc<AssetCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    /// Load and decode one sheet, using the cache.
    pub fn load_image(&self, path: &Path) -> Result<Arc<RgbaImage>, AssetError> {
        let key = path.to_string_lossy();
        self.cache.get_or_load(&key, || {
            if !path.is_file() {
                return Err(AssetError::NotFound(path.to_path_buf()));
            }
            let image = image::open(path)
                .map_err(|source| AssetError::Decode { path: path.to_path_buf(), source })?;
            debug!("decoded {}", path.display());
            Ok(image.to_rgba8())
        })
    }

    /// Load every animation for every layer.
    ///
    /// Layers load in parallel. A sheet that cannot be loaded is recorded
    /// as absent in the bundle and counted in the report; it never fails
    /// the whole load.
    pub fn load_bundle(&self, paths: &AssetPaths) -> (LayerSourceBundle, LoadReport) {
        let (bundle, report) = PhysicalLayer::ALL[..]
            .par_iter()
            .map(|&layer| self.load_layer(paths, layer))
            .reduce(
                || (LayerSourceBundle::new(), LoadReport::default()),
                |(mut bundle, report), (other, other_report)| {
                    bundle.extend(other);
                    (bundle, report.merge(other_report))
                },
            );

        info!(
            "loaded {} sheet(s) from {} ({} missing, {} failed)",
            report.loaded,
            paths.root.display(),
            report.missing,
            report.failed
        );
        (bundle, report)
    }

    fn load_layer(&self, paths: &AssetPaths, layer: PhysicalLayer) -> (LayerSourceBundle, LoadReport) {
        let mut bundle = LayerSourceBundle::new();
        let mut report = LoadReport::default();

        for animation in Animation::ALL {
            let path = paths.sheet_path(layer, animation);
            match self.load_image(&path) {
                Ok(image) => {
                    bundle.insert(layer, animation, image);
                    report.loaded += 1;
                }
                Err(AssetError::NotFound(_)) => {
                    debug!("no {} sheet for {} at {}", layer, animation, path.display());
                    bundle.mark_missing(layer, animation);
                    report.missing += 1;
                }
                Err(e) => {
                    warn!("{}", e);
                    bundle.mark_missing(layer, animation);
                    report.failed += 1;
                }
            }
        }

        (bundle, report)
    }
}
