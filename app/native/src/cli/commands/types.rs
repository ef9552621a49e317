//! Shared context for CLI commands.
//!
//! Loads the configuration once and turns it (plus per-command flag
//! overrides) into the collaborators the library expects.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{self, ApplyKind, ChunkwallConfig};
use crate::error::ChunkwallError;
use crate::layout::{LayoutConfig, LayoutMode, ScreenSize};
use crate::platform::{
    CommandApplier, FixedResolution, MonitorCommand, ResolutionProvider, SystemApplier,
    WallpaperApplier,
};

/// Configuration loaded for one invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub config: ChunkwallConfig,
    /// File the configuration came from, if any.
    pub source: Option<PathBuf>,
}

impl CommandContext {
    /// Loads the configuration, honouring an explicit `--config` path.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path cannot be loaded.
    pub fn load(custom_path: Option<&Path>) -> Result<Self, ChunkwallError> {
        let (config, source) = config::load(custom_path)?;
        Ok(Self { config, source })
    }

    /// The mode to run: the flag if given, else the configured one.
    #[must_use]
    pub fn mode(&self, flag: Option<LayoutMode>) -> LayoutMode {
        flag.unwrap_or(self.config.layout.mode)
    }

    /// The effective layout for `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured overrides are invalid.
    pub fn layout(&self, mode: LayoutMode) -> Result<LayoutConfig, ChunkwallError> {
        Ok(self.config.layout.resolve(mode)?)
    }

    /// The seed to use: the flag if given, else the configured one.
    #[must_use]
    pub fn seed(&self, flag: Option<u64>) -> Option<u64> { flag.or(self.config.seed) }

    /// Resolution used when probing fails.
    #[must_use]
    pub const fn fallback_resolution(&self) -> ScreenSize { self.config.screen.default }

    /// A fixed provider for `--resolution`, otherwise the configured monitor
    /// query.
    #[must_use]
    pub fn resolution_provider(&self, fixed: Option<ScreenSize>) -> Box<dyn ResolutionProvider> {
        if let Some(size) = fixed {
            return Box::new(FixedResolution(size));
        }

        let screen = &self.config.screen;
        Box::new(MonitorCommand::new(
            screen.command.clone(),
            screen.args.clone(),
            Duration::from_millis(screen.timeout_ms),
        ))
    }

    /// Builds the applier for `kind`. [`ApplyKind::None`] means no applier.
    #[must_use]
    pub fn applier(&self, kind: ApplyKind) -> Option<Box<dyn WallpaperApplier>> {
        let apply = &self.config.apply;
        match kind {
            ApplyKind::Command => Some(Box::new(CommandApplier::new(
                apply.command.clone(),
                apply.args.clone(),
                Duration::from_millis(apply.timeout_ms),
            ))),
            ApplyKind::System => Some(Box::new(SystemApplier)),
            ApplyKind::None => None,
        }
    }
}
