//! Informational commands (validate, list)

use std::process::ExitCode;

use crate::layout::{Animation, Direction};
use crate::validate::validate_request;

use super::{config_failure, resolve_config, CommonArgs, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the validate command
pub fn run_validate(animations: Option<&[String]>, json: bool, common: &CommonArgs) -> ExitCode {
    let config = match resolve_config(common) {
        Ok(c) => c,
        Err(e) => return config_failure(&e),
    };

    let selection: Vec<String> = animations.map(<[String]>::to_vec).unwrap_or_else(|| config.sheet.animations.clone());
    let report = validate_request(Some(&config.character), Some(&selection[..]));

    if json {
        let output = serde_json::json!({
            "ok": report.ok(),
            "errors": report.errors(),
            "warnings": report.warnings(),
            "issues": report.issues,
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
    } else if report.issues.is_empty() {
        println!("OK: request is valid");
    } else {
        for issue in &report.issues {
            println!("{}", issue);
        }
    }

    if report.ok() {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_INVALID_ARGS)
    }
}

/// Execute the list command
pub fn run_list(json: bool) -> ExitCode {
    if json {
        let output = serde_json::json!({
            "animations": Animation::ALL.iter().map(|a| serde_json::json!({
                "id": a.id(),
                "name": a.name(),
                "frames": a.frame_count(),
            })).collect::<Vec<_>>(),
            "directions": Direction::ALL.iter().map(|d| serde_json::json!({
                "id": d.id(),
                "name": d.name(),
                "row": d.row(),
            })).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
        return ExitCode::from(EXIT_SUCCESS);
    }

    println!("Animations:");
    for animation in Animation::ALL {
        println!("  {:<8} {:<12} {:>2} frames", animation.id(), animation.name(), animation.frame_count());
    }
    println!();
    println!("Directions:");
    for direction in Direction::ALL {
        println!("  {:<8} {:<14} row {}", direction.id(), direction.name(), direction.row());
    }

    ExitCode::from(EXIT_SUCCESS)
}
