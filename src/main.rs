//! lpcgen - command-line front end for the LPC spritesheet compositor

use std::process::ExitCode;

use lpc_spritegen::cli;

fn main() -> ExitCode {
    cli::run()
}
