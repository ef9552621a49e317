//! Configuration types for chunkwall.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.
//! Every field is optional; a missing file is the same as an empty one.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::{ChunkCatalog, ChunkShape, LayoutConfig, LayoutError, LayoutMode, ScreenSize};
use crate::platform::path::{expand, expand_and_resolve};

/// Where source images are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SourceConfig {
    /// Directory scanned (non-recursively) for images.
    /// Relative paths are resolved against the config file's directory.
    /// Default: "~/Pictures"
    pub path: String,
}

impl Default for SourceConfig {
    fn default() -> Self { Self { path: "~/Pictures".to_string() } }
}

/// Where and how the composite is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct OutputConfig {
    /// Output file. The extension picks the format (`.png`, `.jpg`, ...).
    /// Default: "~/Pictures/wallpaper.png"
    pub path: String,

    /// JPEG quality from 1 to 100. Ignored for other formats.
    /// Default: 95
    #[schemars(range(min = 1, max = 100))]
    pub quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { path: "~/Pictures/wallpaper.png".to_string(), quality: 95 }
    }
}

/// One catalog entry: either a bare shape (`"4x2"`) or a shape with a
/// weight (`{ "shape": "4x2", "weight": 3 }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ChunkEntry {
    /// Unweighted shape.
    Shape(ChunkShape),
    /// Shape with a selection weight.
    Weighted {
        shape: ChunkShape,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weight: Option<u32>,
    },
}

impl ChunkEntry {
    const fn into_pair(self) -> (ChunkShape, Option<u32>) {
        match self {
            Self::Shape(shape) => (shape, None),
            Self::Weighted { shape, weight } => (shape, weight),
        }
    }
}

/// Overrides applied on top of a mode's built-in preset.
///
/// Unset fields keep the preset value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LayoutOverrides {
    /// Number of grid rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,

    /// Number of grid columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cols: Option<usize>,

    /// Margin around the whole canvas, in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outer_padding: Option<u32>,

    /// Gap between adjacent cells, in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_padding: Option<u32>,

    /// Chunk catalog. Either every entry has a weight or none does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<ChunkEntry>>,

    /// Shapes tried in order when a freeflow draw fits nowhere.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Vec<ChunkShape>>,

    /// Number of best-scored slots the freeflow pick is made from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<usize>,

    /// Freeflow score penalty per row index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_penalty: Option<f64>,

    /// Freeflow score penalty per column index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_penalty: Option<f64>,

    /// How many times grid mode cycles through the catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_repeats: Option<usize>,

    /// Freeflow attempt cap, as a multiple of the image count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_factor: Option<usize>,
}

impl LayoutOverrides {
    /// Applies the overrides to `base` and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting catalog or grid is invalid.
    pub fn apply(&self, mut base: LayoutConfig) -> Result<LayoutConfig, LayoutError> {
        if let Some(rows) = self.rows {
            base.rows = rows;
        }
        if let Some(cols) = self.cols {
            base.cols = cols;
        }
        if let Some(outer) = self.outer_padding {
            base.outer_padding = outer;
        }
        if let Some(inner) = self.inner_padding {
            base.inner_padding = inner;
        }
        if let Some(chunks) = &self.chunks {
            base.catalog =
                ChunkCatalog::from_entries(chunks.iter().cloned().map(ChunkEntry::into_pair))?;
        }
        if let Some(fallback) = &self.fallback {
            base.fallback.clone_from(fallback);
        }
        if let Some(pool_size) = self.pool_size {
            base.scoring.pool_size = pool_size;
        }
        if let Some(row_penalty) = self.row_penalty {
            base.scoring.row_penalty = row_penalty;
        }
        if let Some(col_penalty) = self.col_penalty {
            base.scoring.col_penalty = col_penalty;
        }
        if let Some(repeats) = self.catalog_repeats {
            base.catalog_repeats = repeats;
        }
        if let Some(factor) = self.attempt_factor {
            base.attempt_factor = factor;
        }

        base.validate()?;
        Ok(base)
    }
}

/// Layout mode and per-mode overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LayoutSettings {
    /// Fill strategy: `grid` (ordered, bleeding) or `freeflow` (weighted,
    /// cropped).
    /// Default: "freeflow"
    pub mode: LayoutMode,

    /// Overrides for the grid preset (6x24 cells).
    pub grid: LayoutOverrides,

    /// Overrides for the freeflow preset (8x28 cells).
    pub freeflow: LayoutOverrides,
}

impl LayoutSettings {
    /// Returns the effective layout for `mode`: its preset with this file's
    /// overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the overrides produce an invalid
    /// layout.
    pub fn resolve(&self, mode: LayoutMode) -> Result<LayoutConfig, ConfigError> {
        let overrides = match mode {
            LayoutMode::Grid => &self.grid,
            LayoutMode::Freeflow => &self.freeflow,
        };
        overrides
            .apply(LayoutConfig::preset(mode))
            .map_err(|err| ConfigError::Invalid(format!("layout.{mode}: {err}")))
    }
}

/// How the screen resolution is detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ScreenConfig {
    /// Monitor query command.
    /// Default: "hyprctl"
    pub command: String,

    /// Arguments for the monitor query.
    /// Default: ["monitors"]
    pub args: Vec<String>,

    /// Maximum time to wait for the query, in milliseconds.
    /// Default: 5000
    pub timeout_ms: u64,

    /// Resolution used when the query fails.
    /// Default: "5120x1440"
    pub default: ScreenSize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            command: "hyprctl".to_string(),
            args: vec!["monitors".to_string()],
            timeout_ms: 5000,
            default: ScreenSize::FALLBACK,
        }
    }
}

/// How the wallpaper is applied after it is written.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ApplyKind {
    /// Run an external setter command (`swww img` by default).
    #[default]
    Command,
    /// Use the desktop environment's own wallpaper mechanism.
    System,
    /// Only write the file.
    None,
}

/// Wallpaper setter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ApplyConfig {
    /// Which setter to use.
    /// Default: "command"
    pub kind: ApplyKind,

    /// Setter command for the `command` kind. The output path is appended
    /// to `args`.
    /// Default: "swww"
    pub command: String,

    /// Arguments placed before the output path.
    /// Default: ["img"]
    pub args: Vec<String>,

    /// Maximum time to wait for the setter, in milliseconds.
    /// Default: 30000
    pub timeout_ms: u64,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            kind: ApplyKind::Command,
            command: "swww".to_string(),
            args: vec!["img".to_string()],
            timeout_ms: 30_000,
        }
    }
}

/// Root configuration for chunkwall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ChunkwallConfig {
    /// Schema reference for editors. Not used by chunkwall.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Source image directory.
    pub source: SourceConfig,

    /// Output file settings.
    pub output: OutputConfig,

    /// Layout mode and tuning.
    pub layout: LayoutSettings,

    /// Screen resolution detection.
    pub screen: ScreenConfig,

    /// Wallpaper setter.
    pub apply: ApplyConfig,

    /// Seed for the random number generator. Unset means a fresh layout on
    /// every run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Canvas background as `[r, g, b]`.
    /// Default: [15, 15, 20]
    pub background: [u8; 3],

    /// Directory of the file this configuration was loaded from.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Default for ChunkwallConfig {
    fn default() -> Self {
        Self {
            schema: None,
            source: SourceConfig::default(),
            output: OutputConfig::default(),
            layout: LayoutSettings::default(),
            screen: ScreenConfig::default(),
            apply: ApplyConfig::default(),
            seed: None,
            background: [15, 15, 20],
            base_dir: None,
        }
    }
}

impl ChunkwallConfig {
    /// Expands a configured path, resolving relative paths against the
    /// config file's directory when there is one.
    #[must_use]
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        self.base_dir
            .as_deref()
            .map_or_else(|| expand(path), |base| expand_and_resolve(path, base))
    }

    /// The expanded source directory.
    #[must_use]
    pub fn source_dir(&self) -> PathBuf { self.resolve_path(&self.source.path) }

    /// The expanded output file path.
    #[must_use]
    pub fn output_path(&self) -> PathBuf { self.resolve_path(&self.output.path) }

    /// Checks the values serde cannot reject on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.quality == 0 || self.output.quality > 100 {
            return Err(ConfigError::Invalid(format!(
                "output.quality must be between 1 and 100 (got {})",
                self.output.quality
            )));
        }
        if self.source.path.trim().is_empty() {
            return Err(ConfigError::Invalid("source.path must not be empty".to_string()));
        }
        if self.output.path.trim().is_empty() {
            return Err(ConfigError::Invalid("output.path must not be empty".to_string()));
        }
        self.layout.resolve(LayoutMode::Grid)?;
        self.layout.resolve(LayoutMode::Freeflow)?;
        Ok(())
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at $XDG_CONFIG_HOME/chunkwall/config.jsonc or \
         ~/.config/chunkwall/config.jsonc"
    )]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] serde_json::Error),
    /// The configuration parsed but holds an unusable value.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Directory name used under each configuration root.
const CONFIG_DIR_NAME: &str = "chunkwall";

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations (both `.jsonc` and `.json` variants):
/// 1. `$XDG_CONFIG_HOME/chunkwall/` if the variable is set
/// 2. `~/.config/chunkwall/`
/// 3. The platform configuration directory reported by `dirs`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut roots = Vec::new();

    if let Some(xdg_config) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        roots.push(PathBuf::from(xdg_config));
    }
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".config"));
    }
    if let Some(config_dir) = dirs::config_dir() {
        roots.push(config_dir);
    }

    let mut paths = Vec::new();
    for root in roots {
        let dir = root.join(CONFIG_DIR_NAME);
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            // XDG_CONFIG_HOME is usually ~/.config itself.
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    paths
}

/// Parses JSONC text into a configuration.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed JSON or unknown value types.
pub fn parse_config(text: &str) -> Result<ChunkwallConfig, ConfigError> {
    let reader = json_comments::StripComments::new(text.as_bytes());
    Ok(serde_json::from_reader(reader)?)
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::Io` if the file cannot be read, `ConfigError::Parse`
/// if it is not valid JSONC, and `ConfigError::Invalid` if a value is out of
/// range.
pub fn load_config_from_path(path: &Path) -> Result<(ChunkwallConfig, PathBuf), ConfigError> {
    let file = fs::File::open(path)?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    let mut config: ChunkwallConfig = serde_json::from_reader(reader)?;
    config.base_dir = path.parent().map(Path::to_path_buf);
    config.validate()?;
    Ok((config, path.to_path_buf()))
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of
/// the expected locations, or the errors of [`load_config_from_path`] for the
/// first one that does.
pub fn load_config() -> Result<(ChunkwallConfig, PathBuf), ConfigError> {
    config_paths()
        .into_iter()
        .find(|path| path.exists())
        .map_or(Err(ConfigError::NotFound), |path| load_config_from_path(&path))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = ChunkwallConfig::default();
        assert_eq!(config.source.path, "~/Pictures");
        assert_eq!(config.output.path, "~/Pictures/wallpaper.png");
        assert_eq!(config.output.quality, 95);
        assert_eq!(config.layout.mode, LayoutMode::Freeflow);
        assert_eq!(config.screen.command, "hyprctl");
        assert_eq!(config.screen.default, ScreenSize::new(5120, 1440));
        assert_eq!(config.apply.kind, ApplyKind::Command);
        assert_eq!(config.background, [15, 15, 20]);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(parse_config("{}").unwrap(), ChunkwallConfig::default());
    }

    #[test]
    fn test_parse_jsonc_with_comments() {
        let text = r#"{
            // Photos live on the NAS
            "source": { "path": "/mnt/photos" },
            /* fixed layout for screenshots */
            "seed": 42,
            "layout": { "mode": "grid" },
            "screen": { "default": "2560x1440", "timeoutMs": 250 },
            "apply": { "kind": "none" }
        }"#;

        let config = parse_config(text).unwrap();
        assert_eq!(config.source.path, "/mnt/photos");
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.layout.mode, LayoutMode::Grid);
        assert_eq!(config.screen.default, ScreenSize::new(2560, 1440));
        assert_eq!(config.screen.timeout_ms, 250);
        assert_eq!(config.screen.command, "hyprctl");
        assert_eq!(config.apply.kind, ApplyKind::None);
    }

    #[test]
    fn test_parse_rejects_bad_resolution() {
        let result = parse_config(r#"{ "screen": { "default": "huge" } }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_overrides_replace_preset_values() {
        let text = r#"{
            "layout": {
                "freeflow": {
                    "rows": 4,
                    "cols": 10,
                    "chunks": [
                        { "shape": "2x2", "weight": 1 },
                        { "shape": "1x1", "weight": 4 }
                    ],
                    "poolSize": 3
                }
            }
        }"#;

        let layout = parse_config(text).unwrap().layout.resolve(LayoutMode::Freeflow).unwrap();
        assert_eq!((layout.rows, layout.cols), (4, 10));
        assert_eq!(layout.outer_padding, 20);
        assert_eq!(layout.catalog.weights(), Some(&[1, 4][..]));
        assert_eq!(layout.scoring.pool_size, 3);
    }

    #[test]
    fn test_overrides_accept_bare_shapes() {
        let text = r#"{ "layout": { "grid": { "chunks": ["3x2", "1x1"] } } }"#;
        let layout = parse_config(text).unwrap().layout.resolve(LayoutMode::Grid).unwrap();
        assert_eq!(layout.catalog.shapes(), &[ChunkShape::new(3, 2), ChunkShape::new(1, 1)]);
        assert!(!layout.catalog.is_weighted());
    }

    #[test]
    fn test_validation_rejects_zero_rows() {
        let config = parse_config(r#"{ "layout": { "grid": { "rows": 0 } } }"#).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("layout.grid")));
    }

    #[test]
    fn test_misspelled_key_is_rejected() {
        let text = r#"{ "layout": { "freeflow": { "rowPenality": 0.2 } } }"#;
        assert!(matches!(parse_config(text), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_schema_reference_is_accepted() {
        let text = r#"{ "$schema": "./chunkwall.schema.json", "seed": 3 }"#;
        let config = parse_config(text).unwrap();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.schema.as_deref(), Some("./chunkwall.schema.json"));
    }

    #[test]
    fn test_validation_rejects_zero_attempt_factor() {
        let text = r#"{ "layout": { "freeflow": { "attemptFactor": 0 } } }"#;
        let config = parse_config(text).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("attempt factor")));
    }

    #[test]
    fn test_validation_rejects_zero_weight() {
        let text = r#"{ "layout": { "freeflow": { "chunks": [{ "shape": "1x1", "weight": 0 }] } } }"#;
        let config = parse_config(text).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validation_rejects_partial_weights() {
        let text =
            r#"{ "layout": { "freeflow": { "chunks": ["1x1", { "shape": "2x1", "weight": 2 }] } } }"#;
        let config = parse_config(text).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validation_rejects_empty_catalog_and_pool() {
        let config = parse_config(r#"{ "layout": { "grid": { "chunks": [] } } }"#).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = parse_config(r#"{ "layout": { "freeflow": { "poolSize": 0 } } }"#).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validation_rejects_zero_sized_shape() {
        assert!(parse_config(r#"{ "layout": { "grid": { "chunks": ["0x2"] } } }"#).is_err());
    }

    #[test]
    fn test_validation_rejects_bad_quality() {
        let config = parse_config(r#"{ "output": { "quality": 0 } }"#).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_from_path_resolves_relative_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.jsonc");
        let text = r#"{ "source": { "path": "photos" }, "output": { "path": "/tmp/w.png" } }"#;
        fs::write(&path, text).unwrap();

        let (config, loaded_from) = load_config_from_path(&path).unwrap();
        assert_eq!(loaded_from, path);
        assert_eq!(config.source_dir(), dir.path().join("photos"));
        assert_eq!(config.output_path(), PathBuf::from("/tmp/w.png"));
    }

    #[test]
    fn test_load_from_missing_path_is_io_error() {
        let result = load_config_from_path(Path::new("/nonexistent/chunkwall.jsonc"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_paths_end_with_config_files() {
        for path in config_paths() {
            assert!(path.parent().unwrap().ends_with("chunkwall"));
            let name = path.file_name().unwrap().to_string_lossy();
            assert!(name == "config.jsonc" || name == "config.json");
        }
    }

    #[test]
    fn test_config_paths_have_no_duplicates() {
        let paths = config_paths();
        let unique: std::collections::HashSet<_> = paths.iter().collect();
        assert_eq!(paths.len(), unique.len());
    }

    #[test]
    fn test_apply_kind_deserializes_lowercase() {
        let kind: ApplyKind = serde_json::from_str(r#""system""#).unwrap();
        assert_eq!(kind, ApplyKind::System);
    }
}
