//! Drawing commands (generate, animation, frame, preview)

use std::process::ExitCode;

use crate::color::Background;
use crate::compositor::compose_frame;
use crate::layout::{Animation, Direction, InvalidArgument};
use crate::metadata::{animation_metadata, build_metadata};
use crate::output::{
    animation_base_name, export_frame, export_spritesheet_with_metadata, save_png, scale_image,
    spritesheet_base_name, OutputError,
};
use crate::preview::{generate_preview_grid, PreviewOptions};
use crate::spritesheet::{generate_animation_spritesheet, generate_spritesheet, SpritesheetError};
use crate::validate::validate_request;

use super::{config_failure, load_assets, resolve_config, CommonArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// File name of the preview grid
const PREVIEW_FILE_NAME: &str = "lpc-preview-grid.png";

fn spritesheet_failure(e: &SpritesheetError) -> ExitCode {
    match e {
        SpritesheetError::Validation(v) => {
            for issue in &v.issues {
                eprintln!("Error: {}", issue.message);
            }
        }
        other => eprintln!("Error: {}", other),
    }
    ExitCode::from(EXIT_INVALID_ARGS)
}

fn output_failure(e: &OutputError) -> ExitCode {
    eprintln!("Error: {}", e);
    ExitCode::from(EXIT_ERROR)
}

fn invalid_argument(e: &InvalidArgument) -> ExitCode {
    eprintln!("Error: {}", e);
    ExitCode::from(EXIT_INVALID_ARGS)
}

/// Execute the generate command
pub fn run_generate(animations: Option<&[String]>, common: &CommonArgs) -> ExitCode {
    let config = match resolve_config(common) {
        Ok(c) => c,
        Err(e) => return config_failure(&e),
    };

    let selection: Vec<String> = animations.map(<[String]>::to_vec).unwrap_or_else(|| config.sheet.animations.clone());
    let report = validate_request(Some(&config.character), Some(&selection[..]));
    for warning in report.warnings() {
        eprintln!("Warning: {}", warning);
    }

    let options = match config.sheet_options() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let bundle = load_assets(&config);
    let sheet = match generate_spritesheet(&config.character, &selection, &options, bundle.as_ref()) {
        Ok(s) => s,
        Err(e) => return spritesheet_failure(&e),
    };

    let metadata = match build_metadata(&selection, &options) {
        Ok(m) => m,
        Err(e) => return spritesheet_failure(&SpritesheetError::Validation(e)),
    };

    let base = spritesheet_base_name(metadata.animations.len());
    match export_spritesheet_with_metadata(&sheet, &metadata, &config.output.dir, &base) {
        Ok(files) => {
            println!("Saved: {}", files.image.display());
            println!("Saved: {}", files.metadata.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => output_failure(&e),
    }
}

/// Execute the animation command
pub fn run_animation(id: &str, common: &CommonArgs) -> ExitCode {
    let config = match resolve_config(common) {
        Ok(c) => c,
        Err(e) => return config_failure(&e),
    };
    let options = match config.sheet_options() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let bundle = load_assets(&config);
    let sheet = match generate_animation_spritesheet(&config.character, id, &options, bundle.as_ref()) {
        Ok(s) => s,
        Err(e) => return spritesheet_failure(&e),
    };

    // The packer already rejected unknown ids
    let animation: Animation = match id.parse() {
        Ok(a) => a,
        Err(e) => return invalid_argument(&e),
    };
    let metadata = animation_metadata(animation, &options);

    match export_spritesheet_with_metadata(&sheet, &metadata, &config.output.dir, &animation_base_name(animation)) {
        Ok(files) => {
            println!("Saved: {}", files.image.display());
            println!("Saved: {}", files.metadata.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => output_failure(&e),
    }
}

/// Execute the frame command
pub fn run_frame(animation: &str, direction: &str, frame: u32, scale: u8, common: &CommonArgs) -> ExitCode {
    let config = match resolve_config(common) {
        Ok(c) => c,
        Err(e) => return config_failure(&e),
    };

    let parsed = animation.parse::<Animation>().and_then(|a| Ok((a, direction.parse::<Direction>()?)));
    let (animation, direction) = match parsed {
        Ok(pair) => pair,
        Err(e) => return invalid_argument(&e),
    };

    let bundle = load_assets(&config);
    let composed = match compose_frame(&config.character, direction, animation, frame, bundle.as_ref()) {
        Ok(f) => f,
        Err(e) => return invalid_argument(&e),
    };

    let image = scale_image(composed.image, scale);
    match export_frame(&image, &config.output.dir, animation, direction, frame) {
        Ok(path) => {
            println!("Saved: {}", path.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => output_failure(&e),
    }
}

/// Execute the preview command
pub fn run_preview(scale: u8, spacing: u32, common: &CommonArgs) -> ExitCode {
    let config = match resolve_config(common) {
        Ok(c) => c,
        Err(e) => return config_failure(&e),
    };

    let mut options = PreviewOptions { scale, grid_spacing: spacing, ..PreviewOptions::default() };
    // Only an explicit --background replaces the light grey grid
    if let Some(ref background) = common.background {
        match Background::parse(background) {
            Ok(b) => options.background = b,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        }
    }

    let bundle = load_assets(&config);
    let grid = match generate_preview_grid(&config.character, &options, bundle.as_ref()) {
        Ok(g) => g,
        Err(e) => return invalid_argument(&e),
    };

    let path = config.output.dir.join(PREVIEW_FILE_NAME);
    match save_png(&grid, &path) {
        Ok(()) => {
            println!("Saved: {}", path.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => output_failure(&e),
    }
}
