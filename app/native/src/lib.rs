//! Chunkwall - packs a folder of photos into a gapped grid collage.
//!
//! The library holds the layout engine, image fitting and the generate
//! pipeline; the `chunkwall` binary is a thin CLI over it.
//!
//! - [`layout`] - Grid occupancy, chunk catalog, placement and the fill loop
//! - [`wallpaper`] - Image I/O, fitting and the end-to-end run
//! - [`platform`] - Resolution probing, applying the wallpaper, paths
//! - [`config`] - JSONC configuration file
//! - [`cli`] - Command-line front end

pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod platform;
pub mod schema;
pub mod wallpaper;
