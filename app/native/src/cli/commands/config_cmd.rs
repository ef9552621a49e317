//! Config CLI commands.
//!
//! Commands for managing the chunkwall configuration file.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::config_paths;
use crate::config::template::{create_config_file, generate_config_template};
use crate::error::ChunkwallError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Initialize a new configuration file with all options documented.
    ///
    /// Creates a new configuration file at the default location with all
    /// available options commented out. This allows you to see all possible
    /// configuration options and uncomment the ones you want to use.
    #[command(
        name = "init",
        after_long_help = r#"Examples:
  chunkwall config init              # Create config at default location
  chunkwall config init --force      # Overwrite existing config
  chunkwall config init --path ~/my-config.jsonc  # Create at custom path
  chunkwall config init --stdout     # Print template to stdout"#
    )]
    Init {
        /// Overwrite existing configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Custom path for the configuration file.
        /// If not specified, uses the first search path (see `config path`).
        #[arg(long, short, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print the configuration template to stdout instead of writing to a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Show the path to the configuration file.
    ///
    /// Displays the paths where chunkwall looks for configuration files,
    /// and indicates which one is currently in use (if any).
    Path,
}

/// Execute config subcommands.
///
/// `custom` is the global `--config` path, if given.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands, custom: Option<&Path>) -> Result<(), ChunkwallError> {
    match cmd {
        ConfigCommands::Init { force, path, stdout } => {
            if *stdout {
                println!("{}", generate_config_template());
                Ok(())
            } else {
                init_config(*force, path.clone().or_else(|| custom.map(Path::to_path_buf)))
            }
        }
        ConfigCommands::Path => {
            show_config_path(custom);
            Ok(())
        }
    }
}

/// Initialize a new configuration file.
fn init_config(force: bool, custom_path: Option<PathBuf>) -> Result<(), ChunkwallError> {
    let config_path = custom_path.unwrap_or_else(|| {
        // Use the first config path (preferred location)
        config_paths().into_iter().next().unwrap_or_else(|| PathBuf::from("config.jsonc"))
    });

    if config_path.exists() && !force {
        return Err(ChunkwallError::ConfigError(format!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            config_path.display()
        )));
    }

    create_config_file(&config_path).map_err(|e| {
        ChunkwallError::IoError(format!(
            "Failed to create config file {}: {e}",
            config_path.display()
        ))
    })?;

    println!("Configuration file created at: {}", config_path.display());
    println!("\nAll options are commented out by default.");
    println!("Edit the file and uncomment the options you want to configure.");

    Ok(())
}

/// Labels each search path: `(active)` for the one that would be loaded,
/// `(exists)` for shadowed ones.
fn path_markers(paths: &[PathBuf]) -> Vec<(&Path, &'static str)> {
    let mut found = false;
    paths
        .iter()
        .map(|path| {
            let marker = if !path.exists() {
                ""
            } else if found {
                " (exists)"
            } else {
                found = true;
                " (active)"
            };
            (path.as_path(), marker)
        })
        .collect()
}

/// Show the configuration file path.
fn show_config_path(custom: Option<&Path>) {
    if let Some(path) = custom {
        let marker = if path.exists() { " (active, --config)" } else { " (missing)" };
        println!("Configuration file: {}{marker}", path.display());
        return;
    }

    println!("Configuration file search paths (in priority order):\n");

    let paths = config_paths();
    let markers = path_markers(&paths);
    for (i, (path, marker)) in markers.iter().enumerate() {
        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    if !markers.iter().any(|(_, marker)| !marker.is_empty()) {
        println!("\nNo configuration file found.");
        println!("Run 'chunkwall config init' to create one.");
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_config_paths_returns_non_empty() {
        let paths = config_paths();
        // Should have at least one path (unless no HOME directory)
        assert!(!paths.is_empty() || std::env::var("HOME").is_err());
    }

    #[test]
    fn test_path_markers_flag_first_existing_as_active() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.jsonc");
        let first = dir.path().join("first.jsonc");
        let second = dir.path().join("second.json");
        fs::write(&first, "{}").unwrap();
        fs::write(&second, "{}").unwrap();

        let paths = vec![missing, first, second];
        let markers: Vec<_> = path_markers(&paths).into_iter().map(|(_, m)| m).collect();
        assert_eq!(markers, ["", " (active)", " (exists)"]);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.jsonc");
        fs::write(&path, "{}").unwrap();

        let err = init_config(false, Some(path.clone())).unwrap_err();
        assert!(matches!(err, ChunkwallError::ConfigError(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");

        init_config(true, Some(path.clone())).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("chunkwall configuration"));
    }

    #[test]
    fn test_init_reports_write_failure_as_io_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let err = init_config(false, Some(blocker.join("config.jsonc"))).unwrap_err();
        assert!(matches!(err, ChunkwallError::IoError(_)));
    }
}
