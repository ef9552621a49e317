//! Wallpaper composition.
//!
//! - [`processing`] - Listing, decoding and writing images
//! - [`fit`] - Scaling an image onto its placement
//! - [`manager`] - The full generate run

pub mod fit;
pub mod manager;
pub mod processing;

pub use fit::{FitStrategy, FittedImage};
pub use manager::{ApplyStatus, GenerateOptions, RunOutcome, RunReport, WallpaperManager};
pub use processing::{ProcessingError, SourceImage};
