//! Spritesheet metadata - the JSON sidecar describing a packed sheet.
//!
//! # Output Format
//!
//! ```json
//! {
//!   "format": "LPC",
//!   "version": "1.0",
//!   "frameSize": { "width": 64, "height": 64 },
//!   "animations": {
//!     "walk": {
//!       "name": "Walk",
//!       "frames": 9,
//!       "rows": { "up": 0, "left": 1, "down": 2, "right": 3 }
//!     }
//!   },
//!   "directions": [
//!     { "name": "up", "displayName": "Up (North)", "row": 0 }
//!   ],
//!   "generatedAt": "2024-01-01T00:00:00.000Z"
//! }
//! ```
//!
//! `animations` keeps selection order, and its rows come from the same
//! [`SpritesheetLayout`] the packer draws from.

use crate::layout::{Animation, Direction, SpritesheetLayout};
use crate::spritesheet::SheetOptions;
use crate::validate::{resolve_animations, ValidationError};
use chrono::{SecondsFormat, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const FORMAT: &str = "LPC";
pub const VERSION: &str = "1.0";

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

/// Sheet row for each facing of one animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionRows {
    pub up: u32,
    pub left: u32,
    pub down: u32,
    pub right: u32,
}

impl DirectionRows {
    pub fn get(&self, direction: Direction) -> u32 {
        match direction {
            Direction::Up => self.up,
            Direction::Left => self.left,
            Direction::Down => self.down,
            Direction::Right => self.right,
        }
    }
}

/// Metadata for one packed animation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationMetadata {
    pub name: String,
    pub frames: u32,
    pub rows: DirectionRows,
}

/// Animation entries keyed by id, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationEntries(Vec<(String, AnimationMetadata)>);

impl AnimationEntries {
    pub fn get(&self, id: &str) -> Option<&AnimationMetadata> {
        self.0.iter().find(|(key, _)| key == id).map(|(_, value)| value)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnimationMetadata)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert or replace, keeping the position of an existing key.
    pub fn insert(&mut self, id: String, entry: AnimationMetadata) {
        match self.0.iter_mut().find(|(key, _)| *key == id) {
            Some((_, existing)) => *existing = entry,
            None => self.0.push((id, entry)),
        }
    }
}

impl Serialize for AnimationEntries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AnimationEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = AnimationEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of animation ids to animation metadata")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = AnimationEntries::default();
                while let Some((key, value)) = access.next_entry::<String, AnimationMetadata>()? {
                    entries.insert(key, value);
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// One entry of the `directions` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionMetadata {
    pub name: String,
    pub display_name: String,
    pub row: u32,
}

/// Full sidecar document for a packed sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpritesheetMetadata {
    pub format: String,
    pub version: String,
    pub frame_size: FrameSize,
    pub animations: AnimationEntries,
    pub directions: Vec<DirectionMetadata>,
    pub generated_at: String,
}

impl SpritesheetMetadata {
    /// Serialize with two-space indentation.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Current time as RFC 3339 UTC with millisecond precision.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Describe the sheet that packing `selected` with `options` produces.
///
/// # Examples
///
/// ```
/// use lpc_spritegen::metadata::build_metadata;
/// use lpc_spritegen::spritesheet::SheetOptions;
///
/// let metadata = build_metadata(&["walk", "idle"], &SheetOptions::default()).unwrap();
/// assert_eq!(metadata.animations.get("idle").unwrap().rows.up, 4);
/// ```
pub fn build_metadata<S: AsRef<str>>(
    selected: &[S],
    options: &SheetOptions,
) -> Result<SpritesheetMetadata, ValidationError> {
    build_metadata_at(selected, options, timestamp_now())
}

/// Like [`build_metadata`] with a caller-supplied `generatedAt`.
pub fn build_metadata_at<S: AsRef<str>>(
    selected: &[S],
    options: &SheetOptions,
    generated_at: impl Into<String>,
) -> Result<SpritesheetMetadata, ValidationError> {
    let animations = resolve_animations(selected)?;
    let layout = SpritesheetLayout::new(&animations, options.frame_width, options.frame_height);
    Ok(metadata_for_layout(&layout, generated_at))
}

/// Metadata for an already-computed layout.
pub fn metadata_for_layout(layout: &SpritesheetLayout, generated_at: impl Into<String>) -> SpritesheetMetadata {
    let mut animations = AnimationEntries::default();
    for block in &layout.blocks {
        animations.insert(
            block.animation.id().to_string(),
            AnimationMetadata {
                name: block.animation.name().to_string(),
                frames: block.animation.frame_count(),
                rows: DirectionRows {
                    up: block.row(Direction::Up),
                    left: block.row(Direction::Left),
                    down: block.row(Direction::Down),
                    right: block.row(Direction::Right),
                },
            },
        );
    }

    SpritesheetMetadata {
        format: FORMAT.to_string(),
        version: VERSION.to_string(),
        frame_size: FrameSize { width: layout.frame_width, height: layout.frame_height },
        animations,
        directions: Direction::ALL
            .iter()
            .map(|d| DirectionMetadata { name: d.id().to_string(), display_name: d.name().to_string(), row: d.row() })
            .collect(),
        generated_at: generated_at.into(),
    }
}

/// Metadata for a single-animation sheet.
pub fn animation_metadata(animation: Animation, options: &SheetOptions) -> SpritesheetMetadata {
    let layout = SpritesheetLayout::new(&[animation], options.frame_width, options.frame_height);
    metadata_for_layout(&layout, timestamp_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXED: &str = "2024-05-01T12:00:00.000Z";

    #[test]
    fn test_walk_idle_rows() {
        let metadata = build_metadata_at(&["walk", "idle"], &SheetOptions::default(), FIXED).unwrap();

        let walk = metadata.animations.get("walk").unwrap();
        assert_eq!(walk.rows, DirectionRows { up: 0, left: 1, down: 2, right: 3 });
        assert_eq!(walk.frames, 9);

        let idle = metadata.animations.get("idle").unwrap();
        assert_eq!(idle.rows, DirectionRows { up: 4, left: 5, down: 6, right: 7 });
        assert_eq!(idle.name, "Idle");
    }

    #[test]
    fn test_selection_order_preserved_in_json() {
        let metadata = build_metadata_at(&["run", "walk"], &SheetOptions::default(), FIXED).unwrap();
        assert_eq!(metadata.animations.ids().collect::<Vec<_>>(), vec!["run", "walk"]);

        let json = metadata.to_json_pretty().unwrap();
        let run_at = json.find("\"run\"").unwrap();
        let walk_at = json.find("\"walk\"").unwrap();
        assert!(run_at < walk_at);
    }

    #[test]
    fn test_json_shape() {
        let metadata = build_metadata_at(&["cast"], &SheetOptions::default(), FIXED).unwrap();
        let value: serde_json::Value = serde_json::from_str(&metadata.to_json_pretty().unwrap()).unwrap();

        assert_eq!(value["format"], "LPC");
        assert_eq!(value["version"], "1.0");
        assert_eq!(value["frameSize"]["width"], 64);
        assert_eq!(value["animations"]["cast"]["name"], "Cast Spell");
        assert_eq!(value["directions"][1]["displayName"], "Left (West)");
        assert_eq!(value["directions"][3]["row"], 3);
        assert_eq!(value["generatedAt"], FIXED);
    }

    #[test]
    fn test_pretty_two_space_indent() {
        let metadata = build_metadata_at(&["sit"], &SheetOptions::default(), FIXED).unwrap();
        let json = metadata.to_json_pretty().unwrap();
        assert!(json.starts_with("{\n  \"format\": \"LPC\""));
    }

    #[test]
    fn test_round_trip_keeps_order() {
        let metadata = build_metadata_at(&["hurt", "climb", "jump"], &SheetOptions::default(), FIXED).unwrap();
        let parsed: SpritesheetMetadata = serde_json::from_str(&metadata.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, metadata);
    }

    #[test]
    fn test_unknown_animation_rejected() {
        assert!(build_metadata_at(&["walk", "dance"], &SheetOptions::default(), FIXED).is_err());
    }

    #[test]
    fn test_rows_match_layout() {
        let selected = [Animation::Shoot, Animation::Sit];
        let layout = SpritesheetLayout::new(&selected, 64, 64);
        let metadata = metadata_for_layout(&layout, FIXED);
        for block in &layout.blocks {
            let entry = metadata.animations.get(block.animation.id()).unwrap();
            for direction in Direction::ALL {
                assert_eq!(entry.rows.get(direction), block.row(direction));
            }
        }
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp_now();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
