//! Applying the finished wallpaper to the desktop.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use super::command::{self, CommandError};

/// Errors that can occur when setting the wallpaper.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The wallpaper file does not exist.
    #[error("Wallpaper file not found: {0}")]
    FileNotFound(String),
    /// The external setter command failed.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// The system wallpaper API failed.
    #[error("Failed to set wallpaper: {0}")]
    System(String),
}

/// Something that can set a file as the desktop wallpaper.
pub trait WallpaperApplier {
    /// Sets `path` as the wallpaper.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or the setter fails.
    fn apply(&self, path: &Path) -> Result<(), ApplyError>;

    /// Human-readable description for status output, e.g. `swww img`.
    fn describe(&self) -> String;
}

/// Runs an external setter with the wallpaper path appended to its arguments.
#[derive(Debug, Clone)]
pub struct CommandApplier {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl CommandApplier {
    #[must_use]
    pub const fn new(program: String, args: Vec<String>, timeout: Duration) -> Self {
        Self { program, args, timeout }
    }
}

impl Default for CommandApplier {
    fn default() -> Self {
        Self {
            program: "swww".to_string(),
            args: vec!["img".to_string()],
            timeout: Duration::from_secs(30),
        }
    }
}

impl WallpaperApplier for CommandApplier {
    fn apply(&self, path: &Path) -> Result<(), ApplyError> {
        ensure_exists(path)?;

        let mut args = self.args.clone();
        args.push(path.display().to_string());

        command::run_with_timeout(&self.program, &args, self.timeout)?;
        tracing::debug!(program = %self.program, path = %path.display(), "wallpaper applied");
        Ok(())
    }

    fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Sets the wallpaper through the desktop environment's own mechanism.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemApplier;

impl WallpaperApplier for SystemApplier {
    fn apply(&self, path: &Path) -> Result<(), ApplyError> {
        ensure_exists(path)?;

        ::wallpaper::set_from_path(&path.display().to_string())
            .map_err(|e| ApplyError::System(e.to_string()))
    }

    fn describe(&self) -> String { "system wallpaper API".to_string() }
}

fn ensure_exists(path: &Path) -> Result<(), ApplyError> {
    if path.exists() {
        Ok(())
    } else {
        Err(ApplyError::FileNotFound(path.display().to_string()))
    }
}
