//! Operating-system collaborators.
//!
//! - [`command`] - External command resolution and execution with a timeout
//! - [`path`] - Shell-like path expansion
//! - [`screen`] - Screen resolution probing
//! - [`setter`] - Applying the generated wallpaper

pub mod command;
pub mod path;
pub mod screen;
pub mod setter;

pub use command::CommandError;
pub use screen::{FixedResolution, MonitorCommand, ProbeError, ResolutionProvider};
pub use setter::{ApplyError, CommandApplier, SystemApplier, WallpaperApplier};
