//! Configuration module for chunkwall.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.
//!
//! Configuration is loaded once per invocation and passed down explicitly.

pub mod template;
pub mod types;

use std::path::{Path, PathBuf};

pub use types::{
    ApplyConfig, ApplyKind, ChunkEntry, ChunkwallConfig, ConfigError, LayoutOverrides,
    LayoutSettings, OutputConfig, ScreenConfig, SourceConfig, config_paths,
    load_config as load_config_default, load_config_from_path, parse_config,
};

/// Loads the configuration for this invocation.
///
/// An explicit `custom_path` must exist and parse. Without one, the first
/// file in [`config_paths`] is used; a missing file means defaults, and a
/// broken one is reported as a warning before falling back to defaults.
///
/// Returns the configuration and the file it came from, if any.
///
/// # Errors
///
/// Returns an error only when `custom_path` is given and cannot be loaded.
pub fn load(custom_path: Option<&Path>) -> Result<(ChunkwallConfig, Option<PathBuf>), ConfigError> {
    if let Some(path) = custom_path {
        let (config, path) = load_config_from_path(path)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        return Ok((config, Some(path)));
    }

    match load_config_default() {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            Ok((config, Some(path)))
        }
        Err(ConfigError::NotFound) => {
            tracing::debug!("no configuration file found, using defaults");
            Ok((ChunkwallConfig::default(), None))
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            Ok((ChunkwallConfig::default(), None))
        }
    }
}
