//! Screen resolution probing.
//!
//! The default provider runs the compositor's monitor query (`hyprctl
//! monitors`) and reads the first connected output's mode from it. Any
//! failure falls back to a configured resolution; probing never aborts a run.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use thiserror::Error;

use super::command::{self, CommandError};
use crate::layout::geometry::ScreenSize;

/// Substrings identifying a physical output in the monitor query. `DP` also
/// matches `eDP`.
const PORT_MARKERS: &[&str] = &["HDMI", "DP", "eDP"];

/// Matches a mode token such as `2560x1440@143.99800`.
static MODE_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)x([0-9]+)@").ok());

/// Errors raised by a resolution probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The monitor query could not be run.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// The query ran but printed no usable mode.
    #[error("no monitor resolution found in output")]
    Unparseable,
}

/// Source of the screen resolution.
pub trait ResolutionProvider {
    /// Returns the current screen resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolution cannot be determined.
    fn probe(&self) -> Result<ScreenSize, ProbeError>;
}

/// Runs a monitor query command and parses its output.
#[derive(Debug, Clone)]
pub struct MonitorCommand {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl MonitorCommand {
    #[must_use]
    pub const fn new(program: String, args: Vec<String>, timeout: Duration) -> Self {
        Self { program, args, timeout }
    }
}

impl Default for MonitorCommand {
    fn default() -> Self {
        Self {
            program: "hyprctl".to_string(),
            args: vec!["monitors".to_string()],
            timeout: Duration::from_secs(5),
        }
    }
}

impl ResolutionProvider for MonitorCommand {
    fn probe(&self) -> Result<ScreenSize, ProbeError> {
        let output = command::run_with_timeout(&self.program, &self.args, self.timeout)?;
        parse_monitor_output(&output.stdout).ok_or(ProbeError::Unparseable)
    }
}

/// A provider that always reports the same resolution.
#[derive(Debug, Clone, Copy)]
pub struct FixedResolution(pub ScreenSize);

impl ResolutionProvider for FixedResolution {
    fn probe(&self) -> Result<ScreenSize, ProbeError> { Ok(self.0) }
}

/// Extracts the first `<width>x<height>@<refresh>` mode that belongs to a
/// physical output.
///
/// A line belongs to an output if it names a port itself or sits in the
/// block under a `Monitor <port>` header. Tokens with non-numeric or zero
/// dimensions are skipped.
#[must_use]
pub fn parse_monitor_output(output: &str) -> Option<ScreenSize> {
    let pattern = MODE_TOKEN.as_ref()?;
    let mut in_port_block = false;

    for line in output.lines() {
        let names_port = PORT_MARKERS.iter().any(|marker| line.contains(marker));
        if line.trim_start().starts_with("Monitor") {
            in_port_block = names_port;
        }
        if !(names_port || in_port_block) {
            continue;
        }

        let found = line.split_whitespace().find_map(|token| {
            let captures = pattern.captures(token)?;
            let width = captures.get(1)?.as_str().parse::<u32>().ok()?;
            let height = captures.get(2)?.as_str().parse::<u32>().ok()?;
            (width > 0 && height > 0).then_some(ScreenSize::new(width, height))
        });
        if found.is_some() {
            return found;
        }
    }

    None
}

/// Probes `provider`, falling back to `fallback` on any error.
pub fn resolve(provider: &dyn ResolutionProvider, fallback: ScreenSize) -> ScreenSize {
    match provider.probe() {
        Ok(size) => {
            tracing::debug!(%size, "screen resolution detected");
            size
        }
        Err(err) => {
            tracing::debug!(error = %err, %fallback, "resolution probe failed, using fallback");
            fallback
        }
    }
}
