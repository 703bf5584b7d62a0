//! Character layer selection and the decoded source bundle

use crate::layout::Animation;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Which visual layers take part in compositing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterLayerSet {
    pub body: bool,
    pub head: bool,
    pub hair: bool,
    /// Gates both the torso and legs layers
    pub clothing: bool,
    pub accessories: bool,
}

impl Default for CharacterLayerSet {
    fn default() -> Self {
        Self { body: true, head: true, hair: true, clothing: true, accessories: false }
    }
}

impl CharacterLayerSet {
    /// Every layer enabled
    pub fn all() -> Self {
        Self { body: true, head: true, hair: true, clothing: true, accessories: true }
    }

    /// No layer enabled
    pub fn none() -> Self {
        Self { body: false, head: false, hair: false, clothing: false, accessories: false }
    }

    pub fn any_enabled(&self) -> bool {
        self.body || self.head || self.hair || self.clothing || self.accessories
    }
}

/// A layer backed by its own LPC source sheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicalLayer {
    Body,
    Head,
    Hair,
    Torso,
    Legs,
}

impl PhysicalLayer {
    /// Draw order, bottom to top
    pub const ALL: [PhysicalLayer; 5] = [
        PhysicalLayer::Body,
        PhysicalLayer::Head,
        PhysicalLayer::Hair,
        PhysicalLayer::Torso,
        PhysicalLayer::Legs,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PhysicalLayer::Body => "body",
            PhysicalLayer::Head => "head",
            PhysicalLayer::Hair => "hair",
            PhysicalLayer::Torso => "torso",
            PhysicalLayer::Legs => "legs",
        }
    }

    /// Whether the layer flag controlling this layer is on
    pub fn enabled_in(self, layers: &CharacterLayerSet) -> bool {
        match self {
            PhysicalLayer::Body => layers.body,
            PhysicalLayer::Head => layers.head,
            PhysicalLayer::Hair => layers.hair,
            PhysicalLayer::Torso | PhysicalLayer::Legs => layers.clothing,
        }
    }
}

impl fmt::Display for PhysicalLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Decoded per-animation source sheets for each physical layer.
///
/// Any layer or animation may be missing. An entry of `None` records a
/// load that was attempted and failed; an absent key means it was never
/// requested. The compositor treats both the same way.
#[derive(Debug, Clone, Default)]
pub struct LayerSourceBundle {
    layers: HashMap<PhysicalLayer, HashMap<Animation, Option<Arc<RgbaImage>>>>,
}

impl LayerSourceBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a decoded sheet for `(layer, animation)`.
    pub fn insert(&mut self, layer: PhysicalLayer, animation: Animation, image: impl Into<Arc<RgbaImage>>) {
        self.layers.entry(layer).or_default().insert(animation, Some(image.into()));
    }

    /// Record that `(layer, animation)` could not be loaded.
    pub fn mark_missing(&mut self, layer: PhysicalLayer, animation: Animation) {
        self.layers.entry(layer).or_default().insert(animation, None);
    }

    /// The decoded sheet for `(layer, animation)`, if one is available.
    pub fn image(&self, layer: PhysicalLayer, animation: Animation) -> Option<&RgbaImage> {
        self.layers.get(&layer)?.get(&animation)?.as_deref()
    }

    /// True if at least one layer holds at least one decoded sheet.
    pub fn has_any_image(&self) -> bool {
        self.layers.values().any(|anims| anims.values().any(Option::is_some))
    }

    /// Number of decoded sheets across all layers
    pub fn image_count(&self) -> usize {
        self.layers.values().map(|anims| anims.values().filter(|i| i.is_some()).count()).sum()
    }

    /// Number of `(layer, animation)` pairs recorded as failed
    pub fn missing_count(&self) -> usize {
        self.layers.values().map(|anims| anims.values().filter(|i| i.is_none()).count()).sum()
    }

    /// Merge another bundle in; entries from `other` win.
    pub fn extend(&mut self, other: LayerSourceBundle) {
        for (layer, anims) in other.layers {
            self.layers.entry(layer).or_default().extend(anims);
        }
    }
}
