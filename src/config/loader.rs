//! Configuration loading and discovery for `lpc.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::LpcConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "lpc.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse lpc.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub animations: Option<Vec<String>>,
    pub include_frame_numbers: Option<bool>,
    pub background: Option<String>,
    pub assets_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub body: Option<bool>,
    pub head: Option<bool>,
    pub hair: Option<bool>,
    pub clothing: Option<bool>,
    pub accessories: Option<bool>,
}

/// Find lpc.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for lpc.toml
/// 2. Check XDG_CONFIG_HOME/lpc-spritegen/lpc.toml (or ~/.config/lpc-spritegen/lpc.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find lpc.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("lpc-spritegen").join(CONFIG_FILE_NAME);
    config_path.exists().then_some(config_path)
}

/// Find lpc.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// An explicit path must exist. Without one the file is discovered with
/// [`find_config`], and if none is found the defaults are returned.
/// Relative `assets.dir` and `output.dir` values are resolved against the
/// directory holding the file.
pub fn load_config(path: Option<&Path>) -> Result<LpcConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(LpcConfig::default()),
    }
}

fn load_config_file(path: &Path) -> Result<LpcConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: LpcConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(root) = project_root(path) {
        config.assets.dir = config.assets.dir.map(|dir| resolve_path(root, &dir));
        config.output.dir = resolve_path(root, &config.output.dir);
    }

    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The merged
/// configuration is validated again.
pub fn merge_cli_overrides(config: &mut LpcConfig, overrides: &CliOverrides) -> Result<(), ConfigError> {
    if let Some(ref animations) = overrides.animations {
        config.sheet.animations = animations.clone();
    }
    if let Some(include) = overrides.include_frame_numbers {
        config.sheet.include_frame_numbers = include;
    }
    if let Some(ref background) = overrides.background {
        config.sheet.background = background.clone();
    }
    if let Some(ref dir) = overrides.assets_dir {
        config.assets.dir = Some(dir.clone());
    }
    if let Some(ref dir) = overrides.output_dir {
        config.output.dir = dir.clone();
    }

    let character = &mut config.character;
    if let Some(body) = overrides.body {
        character.body = body;
    }
    if let Some(head) = overrides.head {
        character.head = head;
    }
    if let Some(hair) = overrides.hair {
        character.hair = hair;
    }
    if let Some(clothing) = overrides.clothing {
        character.clothing = clothing;
    }
    if let Some(accessories) = overrides.accessories {
        character.accessories = accessories;
    }

    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Directory holding a config file
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
