//! CLI command definitions using Clap.
//!
//! This module defines all CLI commands and their arguments, organized into
//! submodules:
//!
//! - `config_cmd` - Configuration file commands
//! - `generate` - Build and apply a wallpaper
//! - `plan` - Preview a layout without images
//! - `resolution` - Show the detected screen resolution
//! - `types` - Context shared by the commands

use std::io;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::error::ChunkwallError;
use crate::layout::{LayoutMode, ScreenSize};
use crate::schema;

pub mod config_cmd;
pub mod generate;
pub mod plan;
pub mod resolution;
pub mod types;

pub use config_cmd::ConfigCommands;
pub use generate::GenerateArgs;
pub use plan::PlanArgs;
use types::CommandContext;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Chunkwall - packs a folder of photos into a gapped grid collage and sets
/// it as the wallpaper.
#[derive(Parser, Debug)]
#[command(name = "chunkwall")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Increase log output (-v info, -vv debug, -vvv trace).
    ///
    /// Without it, `CHUNKWALL_LOG` is read as a filter directive.
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Layout flags shared by `generate` and `plan`.
#[derive(Args, Debug, Clone, Default)]
pub struct LayoutArgs {
    /// Layout mode. Defaults to the configured mode.
    #[arg(long, short, value_enum)]
    pub mode: Option<LayoutMode>,

    /// Seed for a reproducible layout.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use this resolution instead of querying the monitor, e.g. 2560x1440.
    #[arg(long, short, value_name = "WxH")]
    pub resolution: Option<ScreenSize>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Build a collage from the source folder and set it as the wallpaper.
    Generate(GenerateArgs),

    /// Preview a layout without loading any image.
    ///
    /// Runs the layout engine over placeholder items and prints the
    /// occupancy map and the placements.
    Plan(PlanArgs),

    /// Print the screen resolution a run would use.
    Resolution,

    /// Configuration file management commands.
    ///
    /// Initialize and locate the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output the configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// configuration file. Can be redirected to a file for use with editors
    /// that support JSON Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    /// Can be used with eval or redirected to a file.
    ///
    /// Usage:
    ///   eval "$(chunkwall completions --shell zsh)"
    ///   chunkwall completions --shell fish > ~/.config/fish/completions/chunkwall.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<std::path::PathBuf> {
        self.config.as_ref().map(std::path::PathBuf::from)
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), ChunkwallError> {
        match &self.command {
            Commands::Generate(args) => generate::execute(&self.context()?, args),
            Commands::Plan(args) => plan::execute(&self.context()?, args),
            Commands::Resolution => resolution::execute(&self.context()?),
            Commands::Config(cmd) => config_cmd::execute(cmd, self.config_path().as_deref()),

            Commands::Schema => {
                println!("{}", schema::generate_schema_json());
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Loads the configuration for commands that need it.
    fn context(&self) -> Result<CommandContext, ChunkwallError> {
        CommandContext::load(self.config_path().as_deref())
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "chunkwall", &mut io::stdout());
    }
}
