#![allow(clippy::multiple_crate_versions)]

//! Chunkwall - builds a photo collage wallpaper and sets it.
//!
//! Run `chunkwall generate` to lay out the configured image folder, write the
//! composite and hand it to the wallpaper setter.

fn main() {
    if let Err(err) = chunkwall_lib::cli::run() {
        eprintln!("chunkwall: {err}");
        std::process::exit(1);
    }
}
