//! Configuration schema types for `lpc.toml`
//!
//! Every section is optional; a missing file behaves like an empty one.

use crate::assets::AssetPaths;
use crate::color::{Background, ColorError};
use crate::layers::CharacterLayerSet;
use crate::layout::{Animation, FRAME_HEIGHT, FRAME_WIDTH, MAX_FRAME_SIZE};
use crate::spritesheet::SheetOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sheet packing section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetConfig {
    #[serde(default = "default_frame_width")]
    pub frame_width: u32,
    #[serde(default = "default_frame_height")]
    pub frame_height: u32,
    #[serde(default)]
    pub include_frame_numbers: bool,
    /// `"transparent"` or a CSS color
    #[serde(default = "default_background")]
    pub background: String,
    /// Animation ids in pack order; empty means all
    #[serde(default)]
    pub animations: Vec<String>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
            include_frame_numbers: false,
            background: default_background(),
            animations: Vec::new(),
        }
    }
}

fn default_frame_width() -> u32 {
    FRAME_WIDTH
}

fn default_frame_height() -> u32 {
    FRAME_HEIGHT
}

fn default_background() -> String {
    "transparent".to_string()
}

/// Layer sheet locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Root of the LPC sheet tree; without it only placeholder art is drawn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_body_path")]
    pub body: PathBuf,
    #[serde(default = "default_head_path")]
    pub head: PathBuf,
    #[serde(default = "default_hair_path")]
    pub hair: PathBuf,
    #[serde(default = "default_torso_path")]
    pub torso: PathBuf,
    #[serde(default = "default_legs_path")]
    pub legs: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            body: default_body_path(),
            head: default_head_path(),
            hair: default_hair_path(),
            torso: default_torso_path(),
            legs: default_legs_path(),
        }
    }
}

fn default_body_path() -> PathBuf {
    PathBuf::from("body/bodies/male")
}

fn default_head_path() -> PathBuf {
    PathBuf::from("head/heads/human/male")
}

fn default_hair_path() -> PathBuf {
    PathBuf::from("hair/plain/adult")
}

fn default_torso_path() -> PathBuf {
    PathBuf::from("torso/clothes/longsleeve/longsleeve/male")
}

fn default_legs_path() -> PathBuf {
    PathBuf::from("legs/pants/male")
}

/// Output section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: default_output_dir() }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Complete `lpc.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpcConfig {
    #[serde(default)]
    pub character: CharacterLayerSet,
    #[serde(default)]
    pub sheet: SheetConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "sheet.frame_width")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lpc.toml: '{}' {}", self.field, self.message)
    }
}

impl LpcConfig {
    /// Validate the configuration and return every problem found
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        let frame_sides = [
            ("sheet.frame_width", self.sheet.frame_width),
            ("sheet.frame_height", self.sheet.frame_height),
        ];
        for (field, value) in frame_sides {
            if value == 0 || value > MAX_FRAME_SIZE {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: format!("must be between 1 and {}", MAX_FRAME_SIZE),
                });
            }
        }

        if let Err(e) = Background::parse(&self.sheet.background) {
            errors.push(ConfigValidationError {
                field: "sheet.background".to_string(),
                message: format!("is not a valid color: {}", e),
            });
        }

        for (i, id) in self.sheet.animations.iter().enumerate() {
            let message = if Animation::from_id(id).is_none() {
                format!("unknown animation '{}'", id)
            } else if self.sheet.animations[..i].contains(id) {
                format!("duplicate animation '{}'", id)
            } else {
                continue;
            };
            errors.push(ConfigValidationError { field: format!("sheet.animations[{}]", i), message });
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Packing options described by the `[sheet]` section
    pub fn sheet_options(&self) -> Result<SheetOptions, ColorError> {
        Ok(SheetOptions {
            frame_width: self.sheet.frame_width,
            frame_height: self.sheet.frame_height,
            include_frame_numbers: self.sheet.include_frame_numbers,
            background: Background::parse(&self.sheet.background)?,
        })
    }

    /// Asset locations, if an asset directory is configured
    pub fn asset_paths(&self) -> Option<AssetPaths> {
        let dir = self.assets.dir.as_ref()?;
        Some(AssetPaths {
            root: dir.clone(),
            body: self.assets.body.clone(),
            head: self.assets.head.clone(),
            hair: self.assets.hair.clone(),
            torso: self.assets.torso.clone(),
            legs: self.assets.legs.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_empty_config_parse() {
        let config: LpcConfig = toml::from_str("").unwrap();
        assert_eq!(config, LpcConfig::default());
        assert_eq!(config.character, CharacterLayerSet::default());
        assert_eq!(config.sheet.frame_width, 64);
        assert_eq!(config.sheet.background, "transparent");
        assert_eq!(config.output.dir, PathBuf::from("."));
        assert!(config.asset_paths().is_none());
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r##"
[character]
hair = false
accessories = true

[sheet]
frame_width = 32
frame_height = 32
include_frame_numbers = true
background = "#f0f0f0"
animations = ["idle", "walk"]

[assets]
dir = "lpc"
torso = "torso/clothes/shortsleeve/male"

[output]
dir = "dist"
"##;
        let config: LpcConfig = toml::from_str(toml).unwrap();
        assert!(config.is_valid());
        assert!(!config.character.hair);
        assert!(config.character.accessories);
        assert!(config.character.body);
        assert_eq!(config.sheet.animations, vec!["idle", "walk"]);

        let options = config.sheet_options().unwrap();
        assert_eq!(options.frame_width, 32);
        assert!(options.include_frame_numbers);
        assert_eq!(options.background, Background::Solid(Rgba([240, 240, 240, 255])));

        let paths = config.asset_paths().unwrap();
        assert_eq!(paths.root, PathBuf::from("lpc"));
        assert_eq!(paths.torso, PathBuf::from("torso/clothes/shortsleeve/male"));
        assert_eq!(paths.body, PathBuf::from("body/bodies/male"));
        assert_eq!(config.output.dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_validation_collects_everything() {
        let toml = r#"
[sheet]
frame_width = 0
background = "not-a-color"
animations = ["walk", "moonwalk"]
"#;
        let config: LpcConfig = toml::from_str(toml).unwrap();
        let errors = config.validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["sheet.frame_width", "sheet.background", "sheet.animations[1]"]);
        assert!(errors[2].to_string().contains("moonwalk"));
    }

    #[test]
    fn test_frame_size_and_duplicates_bounded() {
        let toml = r#"
[sheet]
frame_height = 100000000
animations = ["idle", "walk", "idle"]
"#;
        let config: LpcConfig = toml::from_str(toml).unwrap();
        let errors = config.validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["sheet.frame_height", "sheet.animations[2]"]);
        assert!(errors[0].message.contains("between 1 and"));
        assert!(errors[1].message.contains("duplicate animation 'idle'"));
    }
}
