//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod generate;
mod info;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::assets::AssetLoader;
use crate::config::{load_config, merge_cli_overrides, CliOverrides, ConfigError, LpcConfig};
use crate::layers::LayerSourceBundle;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// lpcgen - compose LPC character frames and pack them into spritesheets
#[derive(Parser)]
#[command(name = "lpcgen")]
#[command(about = "Compose layered LPC character sprites and pack them into spritesheets")]
#[command(version)]
pub struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that draws
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Config file (default: discover lpc.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Root of the LPC layer sheet tree
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Background: "transparent" or a CSS color
    #[arg(long)]
    pub background: Option<String>,

    /// Draw frame-number badges
    #[arg(long)]
    pub frame_numbers: bool,

    /// Leave out the body layer
    #[arg(long)]
    pub no_body: bool,

    /// Leave out the head layer
    #[arg(long)]
    pub no_head: bool,

    /// Leave out the hair layer
    #[arg(long)]
    pub no_hair: bool,

    /// Leave out shirt and pants
    #[arg(long)]
    pub no_clothing: bool,

    /// Include accessories (hat, cape)
    #[arg(long)]
    pub accessories: bool,
}

impl CommonArgs {
    fn overrides(&self) -> CliOverrides {
        let off = |flag: bool| flag.then_some(false);
        CliOverrides {
            animations: None,
            include_frame_numbers: self.frame_numbers.then_some(true),
            background: self.background.clone(),
            assets_dir: self.assets.clone(),
            output_dir: self.output.clone(),
            body: off(self.no_body),
            head: off(self.no_head),
            hair: off(self.no_hair),
            clothing: off(self.no_clothing),
            accessories: self.accessories.then_some(true),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack a spritesheet of several animations, with metadata
    Generate {
        /// Comma-separated animation ids (default: config, then all)
        #[arg(long, value_delimiter = ',')]
        animations: Option<Vec<String>>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Pack a single animation, with metadata
    Animation {
        /// Animation id (e.g. walk, cast)
        id: String,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Export one composed frame as PNG
    Frame {
        /// Animation id
        animation: String,

        /// Direction: up, left, down or right
        direction: String,

        /// Frame index, starting at 0
        frame: u32,

        /// Scale output by integer factor
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: u8,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Render a grid with one thumbnail per animation
    Preview {
        /// Thumbnail scale factor
        #[arg(long, default_value = "2", value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: u8,

        /// Gap between thumbnails in pixels
        #[arg(long, default_value = "10")]
        spacing: u32,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Check a generation request without drawing
    Validate {
        /// Comma-separated animation ids
        #[arg(long, value_delimiter = ',')]
        animations: Option<Vec<String>>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// List animations and directions
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Load the config file and apply command-line overrides.
pub(crate) fn resolve_config(common: &CommonArgs) -> Result<LpcConfig, ConfigError> {
    let mut config = load_config(common.config.as_deref())?;
    merge_cli_overrides(&mut config, &common.overrides())?;
    Ok(config)
}

/// Report a config error and pick the exit code for it.
pub(crate) fn config_failure(e: &ConfigError) -> ExitCode {
    eprintln!("Error: {}", e);
    match e {
        ConfigError::Validation(_) => ExitCode::from(EXIT_INVALID_ARGS),
        _ => ExitCode::from(EXIT_ERROR),
    }
}

/// Load layer sheets if an asset directory is configured.
pub(crate) fn load_assets(config: &LpcConfig) -> Option<LayerSourceBundle> {
    let paths = config.asset_paths()?;
    let (bundle, report) = AssetLoader::new().load_bundle(&paths);
    if report.loaded == 0 {
        log::warn!("no layer sheets found under {}, drawing placeholder art", paths.root.display());
    }
    Some(bundle)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate { animations, common } => generate::run_generate(animations.as_deref(), &common),
        Commands::Animation { id, common } => generate::run_animation(&id, &common),
        Commands::Frame { animation, direction, frame, scale, common } => {
            generate::run_frame(&animation, &direction, frame, scale, &common)
        }
        Commands::Preview { scale, spacing, common } => generate::run_preview(scale, spacing, &common),
        Commands::Validate { animations, json, common } => {
            info::run_validate(animations.as_deref(), json, &common)
        }
        Commands::List { json } => info::run_list(json),
    }
}
