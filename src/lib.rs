//! LPC spritesheet compositor
//!
//! This library provides functionality to:
//! - Compose 64x64 character frames from layered LPC sheets, or from
//!   placeholder geometry when no art is available
//! - Pack selected animations into a single spritesheet
//! - Describe the packed sheet with JSON metadata
//! - Load layer sheets from disk and write PNG/JSON output

pub mod assets;
pub mod cli;
pub mod color;
pub mod compositor;
pub mod config;
pub mod glyphs;
pub mod layers;
pub mod layout;
pub mod metadata;
pub mod offsets;
pub mod output;
pub mod preview;
pub mod shapes;
pub mod spritesheet;
pub mod timing;
pub mod validate;
