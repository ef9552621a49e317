//! `chunkwall generate`.

use clap::Args;

use super::LayoutArgs;
use super::types::CommandContext;
use crate::cli::output;
use crate::config::ApplyKind;
use crate::error::ChunkwallError;
use crate::platform::path::expand;
use crate::wallpaper::{ApplyStatus, GenerateOptions, RunOutcome, RunReport, WallpaperManager};

/// Arguments for `generate`.
#[derive(Args, Debug, Clone, Default)]
#[command(after_long_help = r#"Examples:
  chunkwall generate                          # Configured mode, folder and setter
  chunkwall generate --mode grid --seed 7     # Reproducible grid layout
  chunkwall generate -s ~/Photos -o /tmp/w.jpg --no-apply
  chunkwall generate --resolution 3840x2160   # Skip the monitor query"#)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Folder to read images from. Defaults to the configured source.
    #[arg(long, short, value_name = "DIR")]
    pub source: Option<String>,

    /// File to write. Defaults to the configured output.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<String>,

    /// Write the file without setting it as the wallpaper.
    #[arg(long, conflicts_with = "applier")]
    pub no_apply: bool,

    /// How to set the wallpaper. Defaults to the configured kind.
    #[arg(long, value_enum)]
    pub applier: Option<ApplyKind>,
}

impl GenerateArgs {
    /// The applier kind after `--no-apply` and `--applier`.
    #[must_use]
    pub fn apply_kind(&self, configured: ApplyKind) -> ApplyKind {
        if self.no_apply { ApplyKind::None } else { self.applier.unwrap_or(configured) }
    }
}

/// Builds the run options from the configuration and flags.
///
/// # Errors
///
/// Returns an error if the configured layout for the chosen mode is invalid.
pub fn options(
    context: &CommandContext,
    args: &GenerateArgs,
) -> Result<GenerateOptions, ChunkwallError> {
    let config = &context.config;
    let mode = context.mode(args.layout.mode);

    Ok(GenerateOptions {
        mode,
        layout: context.layout(mode)?,
        source_dir: args.source.as_deref().map_or_else(|| config.source_dir(), expand),
        output_path: args.output.as_deref().map_or_else(|| config.output_path(), expand),
        quality: config.output.quality,
        background: config.background,
        fallback_resolution: context.fallback_resolution(),
        seed: context.seed(args.layout.seed),
    })
}

/// Execute the generate command.
///
/// # Errors
///
/// Returns an error if the layout configuration is invalid. Save and apply
/// failures are printed as warnings.
pub fn execute(context: &CommandContext, args: &GenerateArgs) -> Result<(), ChunkwallError> {
    let options = options(context, args)?;
    let provider = context.resolution_provider(args.layout.resolution);
    let applier = context.applier(args.apply_kind(context.config.apply.kind));

    let manager = WallpaperManager::new(options, provider, applier);

    match manager.generate()? {
        RunOutcome::NoImages => println!("No images found."),
        RunOutcome::Completed(report) => print_report(&report),
    }

    Ok(())
}

fn print_report(report: &RunReport) {
    let layout = &report.layout;
    println!(
        "Placed {} of {} images on a {}x{} grid ({:.1}% filled) at {}.",
        layout.placed(),
        report.loaded,
        layout.grid.rows(),
        layout.grid.cols(),
        layout.grid.fill_ratio() * 100.0,
        report.resolution,
    );

    if let Some(err) = &report.save_error {
        output::warning(format!("Failed to save wallpaper: {err}"));
        return;
    }
    output::success("Wallpaper saved as:", report.output_path.display());

    match &report.apply {
        ApplyStatus::Applied(via) => output::success("Wallpaper applied via:", via),
        ApplyStatus::Failed(err) => output::warning(format!("Failed to apply wallpaper: {err}")),
        ApplyStatus::Skipped => {}
    }
}
