//! Image I/O for wallpapers.
//!
//! Lists and decodes the source images, creates the canvas and writes the
//! finished composite.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ImageReader, Rgb, RgbImage};
use natord::compare;
use thiserror::Error;

/// Supported image file extensions.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp"];

/// Errors that can occur during image processing.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Failed to read or decode a source image.
    #[error("Failed to read image: {path}: {reason}")]
    ImageRead { path: String, reason: String },
    /// Failed to encode or write the composite.
    #[error("Failed to save image: {path}: {reason}")]
    ImageSave { path: String, reason: String },
    /// Failed to create the directory the composite is written to.
    #[error("Failed to create output directory: {path}: {reason}")]
    OutputDirectory { path: String, reason: String },
}

/// A decoded source image.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub path: PathBuf,
    pub pixels: RgbImage,
}

/// Checks if a file has a supported image extension.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Lists all supported image files in a directory, in natural order.
///
/// Only direct children are considered. A missing or unreadable directory
/// yields an empty list.
pub fn list_images_in_directory(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut images = Vec::new();

    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && is_supported_image(&path) {
                images.push(path);
            }
        }
    }

    // Directory iteration order is unspecified; sort so seeded runs repeat.
    images.sort_by(|a, b| compare(a.to_string_lossy().as_ref(), b.to_string_lossy().as_ref()));
    images
}

/// Decodes a single image into RGB.
///
/// # Errors
///
/// Returns [`ProcessingError::ImageRead`] if the file cannot be opened or
/// decoded.
pub fn load_image(path: &Path) -> Result<RgbImage, ProcessingError> {
    let read_error = |reason: String| ProcessingError::ImageRead {
        path: path.display().to_string(),
        reason,
    };

    let image = ImageReader::open(path)
        .map_err(|err| read_error(err.to_string()))?
        .with_guessed_format()
        .map_err(|err| read_error(err.to_string()))?
        .decode()
        .map_err(|err| read_error(err.to_string()))?;

    Ok(image.to_rgb8())
}

/// Decodes every path, skipping files that fail.
pub fn load_images(paths: &[PathBuf]) -> Vec<SourceImage> {
    let mut images = Vec::with_capacity(paths.len());

    for path in paths {
        match load_image(path) {
            Ok(pixels) => images.push(SourceImage { path: path.clone(), pixels }),
            Err(err) => tracing::debug!(path = %path.display(), error = %err, "skipping image"),
        }
    }

    tracing::debug!(loaded = images.len(), listed = paths.len(), "images decoded");
    images
}

/// Creates a canvas of the given size filled with `background`.
#[must_use]
pub fn create_canvas(width: u32, height: u32, background: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(background))
}

/// Whether `path` should be written as JPEG.
fn is_jpeg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_lowercase().as_str(), "jpg" | "jpeg"))
}

/// Writes the composite to `path`, creating parent directories as needed.
///
/// `.jpg` and `.jpeg` are encoded as JPEG at `quality`; any other extension
/// is encoded in the format it names.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the image cannot be
/// encoded or written.
pub fn save_composite(canvas: &RgbImage, path: &Path, quality: u8) -> Result<(), ProcessingError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|err| ProcessingError::OutputDirectory {
            path: parent.display().to_string(),
            reason: err.to_string(),
        })?;
    }

    let save_error = |reason: String| ProcessingError::ImageSave {
        path: path.display().to_string(),
        reason,
    };

    if is_jpeg_path(path) {
        let file = File::create(path).map_err(|err| save_error(err.to_string()))?;
        let writer = BufWriter::new(file);
        let encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100));
        canvas.write_with_encoder(encoder).map_err(|err| save_error(err.to_string()))?;
    } else {
        canvas.save(path).map_err(|err| save_error(err.to_string()))?;
    }

    tracing::debug!(path = %path.display(), "composite written");
    Ok(())
}
