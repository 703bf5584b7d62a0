//! Local LPC asset loading
//!
//! Reads per-layer LPC sheets from a directory tree into a
//! [`LayerSourceBundle`](crate::layers::LayerSourceBundle). Missing or
//! broken files never fail a load; they are recorded as absent and the
//! compositor falls back to placeholder art.

pub mod cache;
pub mod loader;

pub use cache::AssetCache;
pub use loader::{animation_file_name, AssetError, AssetLoader, AssetPaths, LoadReport};
