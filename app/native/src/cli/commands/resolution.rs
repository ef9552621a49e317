//! `chunkwall resolution`.

use super::types::CommandContext;
use crate::cli::output;
use crate::error::ChunkwallError;

/// Prints the probed resolution, or the fallback with a warning.
///
/// # Errors
///
/// Never fails; probe errors fall back to the configured default.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other CLI functions
pub fn execute(context: &CommandContext) -> Result<(), ChunkwallError> {
    let provider = context.resolution_provider(None);

    match provider.probe() {
        Ok(size) => println!("{size}"),
        Err(err) => {
            output::warning(format!("Resolution query failed: {err}"));
            println!("{} (fallback)", context.fallback_resolution());
        }
    }

    Ok(())
}
