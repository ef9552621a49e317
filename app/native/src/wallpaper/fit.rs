//! Aspect-preserving fitting of images into placement rectangles.
//!
//! Both strategies scale the image so it covers the target rectangle on both
//! axes without distortion. They differ in what happens to the overflow:
//!
//! - [`FitStrategy::Bleed`] keeps it. The scaled image is centred on the
//!   rectangle and may spill into the padding and neighbouring cells.
//! - [`FitStrategy::Crop`] trims it. The centre of the scaled image is cut to
//!   exactly the rectangle's size.

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::layout::{LayoutMode, PixelRect};

/// Resampling filter used for every resize.
const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// What to do with the part of a scaled image that overflows its rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStrategy {
    /// Centre the scaled image on the rectangle and let it overflow.
    Bleed,
    /// Crop the scaled image to the rectangle.
    Crop,
}

impl From<LayoutMode> for FitStrategy {
    fn from(mode: LayoutMode) -> Self {
        match mode {
            LayoutMode::Grid => Self::Bleed,
            LayoutMode::Freeflow => Self::Crop,
        }
    }
}

/// A resized image and where its top-left corner lands on the canvas.
///
/// The offset can be negative or run past the canvas; pasting clips.
#[derive(Debug, Clone)]
pub struct FittedImage {
    pub image: RgbImage,
    pub x: i64,
    pub y: i64,
}

/// Size an image of `source_width x source_height` is scaled to so it covers
/// a `target_width x target_height` rectangle.
///
/// An image relatively wider than the target is scaled to the target height
/// and its width overflows; otherwise it is scaled to the target width and its
/// height overflows. The overflowing side is truncated to whole pixels.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn cover_size(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
) -> (u32, u32) {
    let source_width = source_width.max(1);
    let source_height = source_height.max(1);
    let target_width = target_width.max(1);
    let target_height = target_height.max(1);

    let source_aspect = f64::from(source_width) / f64::from(source_height);
    let target_aspect = f64::from(target_width) / f64::from(target_height);

    // The `max` only absorbs float error; mathematically the truncated side is
    // already at least the target.
    if source_aspect > target_aspect {
        let width = (f64::from(target_height) * source_aspect) as u32;
        (width.max(target_width), target_height)
    } else {
        let height = (f64::from(target_width) / source_aspect) as u32;
        (target_width, height.max(target_height))
    }
}

/// Top-left offset that centres a `scaled` extent on a `target` extent
/// starting at `origin`. Rounds toward negative infinity.
#[must_use]
pub fn centred_offset(origin: u32, target: u32, scaled: u32) -> i64 {
    i64::from(origin) + (i64::from(target) - i64::from(scaled)).div_euclid(2)
}

/// Origin of the centred `target` window inside a `scaled` extent.
#[must_use]
pub const fn crop_start(scaled: u32, target: u32) -> u32 { scaled.saturating_sub(target) / 2 }

/// Scales `image` to cover `rect` and positions it per `strategy`.
#[must_use]
pub fn fit(image: &RgbImage, rect: PixelRect, strategy: FitStrategy) -> FittedImage {
    let (scaled_width, scaled_height) =
        cover_size(image.width(), image.height(), rect.width, rect.height);
    let scaled = imageops::resize(image, scaled_width, scaled_height, RESAMPLE_FILTER);

    match strategy {
        FitStrategy::Bleed => FittedImage {
            image: scaled,
            x: centred_offset(rect.x, rect.width, scaled_width),
            y: centred_offset(rect.y, rect.height, scaled_height),
        },
        FitStrategy::Crop => {
            let crop_x = crop_start(scaled_width, rect.width);
            let crop_y = crop_start(scaled_height, rect.height);
            let cropped =
                imageops::crop_imm(&scaled, crop_x, crop_y, rect.width, rect.height).to_image();

            FittedImage { image: cropped, x: i64::from(rect.x), y: i64::from(rect.y) }
        }
    }
}

/// Pastes a fitted image onto the canvas, clipping at the canvas edges.
pub fn paste(canvas: &mut RgbImage, fitted: &FittedImage) {
    imageops::replace(canvas, &fitted.image, fitted.x, fitted.y);
}
