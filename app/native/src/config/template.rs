//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
///
/// Every commented value is the built-in default, so the file parses to the
/// default configuration as written.
#[must_use]
pub fn generate_config_template() -> String {
    r#"// chunkwall configuration file
// =============================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.
//
// Run `chunkwall schema` for the full JSON schema.

{
  // ============================================================================
  // Source images
  // ============================================================================
  // "source": {
  //   // Directory scanned for png, jpg, jpeg, bmp, tiff and webp files.
  //   // Relative paths are resolved against this file's directory.
  //   "path": "~/Pictures"
  // },

  // ============================================================================
  // Output
  // ============================================================================
  // "output": {
  //   // The extension picks the format (.png, .jpg, .webp, ...)
  //   "path": "~/Pictures/wallpaper.png",
  //
  //   // JPEG quality (1-100), ignored for other formats
  //   "quality": 95
  // },

  // ============================================================================
  // Layout
  // ============================================================================
  // "layout": {
  //   // "grid":     6x24 cells, shapes placed in catalog order, images bleed
  //   //             past their cell
  //   // "freeflow": 8x28 cells, weighted random shapes placed next to filled
  //   //             areas, images cropped to their cell
  //   "mode": "freeflow",
  //
  //   // Per-mode overrides. Unset keys keep the preset value.
  //   "grid": {
  //     "rows": 6,
  //     "cols": 24,
  //     "outerPadding": 30,
  //     "innerPadding": 12,
  //     "chunks": ["6x3", "4x3", "3x2", "2x3", "2x2", "2x1", "1x2", "1x1"],
  //     "catalogRepeats": 100
  //   },
  //   "freeflow": {
  //     "rows": 8,
  //     "cols": 28,
  //     "outerPadding": 20,
  //     "innerPadding": 6,
  //     // Either every chunk has a weight or none does
  //     "chunks": [
  //       { "shape": "4x2", "weight": 2 },
  //       { "shape": "3x2", "weight": 3 },
  //       { "shape": "2x3", "weight": 4 },
  //       { "shape": "3x1", "weight": 3 },
  //       { "shape": "2x2", "weight": 5 },
  //       { "shape": "1x3", "weight": 3 },
  //       { "shape": "2x1", "weight": 6 },
  //       { "shape": "1x2", "weight": 6 },
  //       { "shape": "1x1", "weight": 10 },
  //       { "shape": "4x1", "weight": 2 },
  //       { "shape": "1x4", "weight": 2 },
  //       { "shape": "3x3", "weight": 1 }
  //     ],
  //     // Tried in order when a drawn shape fits nowhere
  //     "fallback": ["2x1", "1x2", "1x1"],
  //     // Random pick among this many best-scored slots
  //     "poolSize": 5,
  //     "rowPenalty": 0.1,
  //     "colPenalty": 0.05,
  //     // Stop after imageCount * attemptFactor tries
  //     "attemptFactor": 3
  //   }
  // },

  // ============================================================================
  // Screen resolution
  // ============================================================================
  // "screen": {
  //   "command": "hyprctl",
  //   "args": ["monitors"],
  //   "timeoutMs": 5000,
  //   // Used when the command fails or prints nothing usable
  //   "default": "5120x1440"
  // },

  // ============================================================================
  // Applying the wallpaper
  // ============================================================================
  // "apply": {
  //   // "command": run `command args... <output>`
  //   // "system":  use the desktop environment's wallpaper setting
  //   // "none":    only write the file
  //   "kind": "command",
  //   "command": "swww",
  //   "args": ["img"],
  //   "timeoutMs": 30000
  // },

  // Fixed seed for reproducible layouts. Unset means random.
  // "seed": 42,

  // Canvas color behind and between images, as [r, g, b]
  // "background": [15, 15, 20]
}
"#
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}
