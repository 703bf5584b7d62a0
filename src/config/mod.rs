//! Configuration for `lpc.toml`
//!
//! Provides the file schema, discovery, and CLI override merging.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
