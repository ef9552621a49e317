//! One end-to-end wallpaper run.
//!
//! A run probes the screen, decodes the source folder, lays the images out on
//! a canvas, writes the composite and hands it to the applier. Only a bad
//! layout configuration aborts a run; I/O failures after the layout are
//! reported on the outcome so the caller can warn and carry on.

use std::fmt;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::fit::{self, FitStrategy};
use super::processing::{self, ProcessingError, SourceImage};
use crate::layout::{LayoutConfig, LayoutEngine, LayoutError, LayoutMode, LayoutReport, ScreenSize};
use crate::platform::screen;
use crate::platform::{ApplyError, ResolutionProvider, WallpaperApplier};

/// Inputs of a run, already resolved from the configuration and CLI flags.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Fill strategy; also picks how images are fitted.
    pub mode: LayoutMode,
    /// Grid, padding and catalog for `mode`.
    pub layout: LayoutConfig,
    /// Folder scanned for source images.
    pub source_dir: PathBuf,
    /// Where the composite is written.
    pub output_path: PathBuf,
    /// JPEG quality.
    pub quality: u8,
    /// Canvas color.
    pub background: [u8; 3],
    /// Resolution used when probing fails.
    pub fallback_resolution: ScreenSize,
    /// Fixed RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
}

/// What happened to the apply step.
#[derive(Debug)]
pub enum ApplyStatus {
    /// No applier was configured, or the composite was not written.
    Skipped,
    /// Applied; carries the applier description.
    Applied(String),
    /// The applier ran and failed.
    Failed(ApplyError),
}

impl ApplyStatus {
    #[must_use]
    pub const fn is_applied(&self) -> bool { matches!(self, Self::Applied(_)) }
}

/// Summary of a run that had images to work with.
#[derive(Debug)]
pub struct RunReport {
    /// Canvas size used.
    pub resolution: ScreenSize,
    /// Images decoded successfully.
    pub loaded: usize,
    /// Layout outcome.
    pub layout: LayoutReport,
    /// Path the composite was written to, or would have been.
    pub output_path: PathBuf,
    /// Set when writing the composite failed.
    pub save_error: Option<ProcessingError>,
    /// Outcome of the apply step.
    pub apply: ApplyStatus,
}

impl RunReport {
    /// Whether the composite made it to disk.
    #[must_use]
    pub const fn saved(&self) -> bool { self.save_error.is_none() }
}

/// Terminal outcome of [`WallpaperManager::generate`].
#[derive(Debug)]
pub enum RunOutcome {
    /// The source folder held no decodable image. Nothing was written.
    NoImages,
    /// A composite was laid out; see the report for save and apply status.
    Completed(RunReport),
}

/// Runs the generate pipeline against injected collaborators.
pub struct WallpaperManager {
    options: GenerateOptions,
    resolution: Box<dyn ResolutionProvider>,
    applier: Option<Box<dyn WallpaperApplier>>,
}

impl fmt::Debug for WallpaperManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WallpaperManager")
            .field("options", &self.options)
            .field("applier", &self.applier.as_ref().map(|a| a.describe()))
            .finish_non_exhaustive()
    }
}

impl WallpaperManager {
    /// Creates a manager. A `None` applier only writes the file.
    #[must_use]
    pub fn new(
        options: GenerateOptions,
        resolution: Box<dyn ResolutionProvider>,
        applier: Option<Box<dyn WallpaperApplier>>,
    ) -> Self {
        Self { options, resolution, applier }
    }

    /// The options this manager runs with.
    #[must_use]
    pub const fn options(&self) -> &GenerateOptions { &self.options }

    /// Generates the wallpaper.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout configuration is invalid or the
    /// screen is too small for the grid. Save and apply failures are
    /// reported on the returned [`RunReport`] instead.
    pub fn generate(&self) -> Result<RunOutcome, LayoutError> {
        let options = &self.options;
        let resolution = screen::resolve(self.resolution.as_ref(), options.fallback_resolution);

        // Fail on a bad layout before decoding anything.
        let engine = LayoutEngine::new(options.layout.clone(), resolution)?;

        let paths = processing::list_images_in_directory(&options.source_dir);
        let images = processing::load_images(&paths);
        if images.is_empty() {
            tracing::info!(source = %options.source_dir.display(), "no images found");
            return Ok(RunOutcome::NoImages);
        }
        let loaded = images.len();
        tracing::info!(
            loaded,
            mode = %options.mode,
            %resolution,
            "generating wallpaper"
        );

        let mut rng = options.seed.map_or_else(
            || StdRng::from_rng(&mut rand::rng()),
            StdRng::seed_from_u64,
        );
        let strategy = FitStrategy::from(options.mode);
        let mut canvas =
            processing::create_canvas(resolution.width, resolution.height, options.background);

        let layout = engine.fill(options.mode, images, &mut rng, |image: SourceImage, placement| {
            let fitted = fit::fit(&image.pixels, placement.rect, strategy);
            fit::paste(&mut canvas, &fitted);
            tracing::trace!(path = %image.path.display(), rect = ?placement.rect, "image placed");
        });

        let save_error =
            processing::save_composite(&canvas, &options.output_path, options.quality).err();
        drop(canvas);

        let apply = match (&save_error, &self.applier) {
            (None, Some(applier)) => self.apply(applier.as_ref()),
            (Some(err), _) => {
                tracing::warn!(error = %err, "composite not written, skipping apply");
                ApplyStatus::Skipped
            }
            (None, None) => ApplyStatus::Skipped,
        };

        Ok(RunOutcome::Completed(RunReport {
            resolution,
            loaded,
            layout,
            output_path: options.output_path.clone(),
            save_error,
            apply,
        }))
    }

    fn apply(&self, applier: &dyn WallpaperApplier) -> ApplyStatus {
        match applier.apply(&self.options.output_path) {
            Ok(()) => ApplyStatus::Applied(applier.describe()),
            Err(err) => {
                tracing::warn!(error = %err, applier = %applier.describe(), "apply failed");
                ApplyStatus::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    use super::*;
    use crate::platform::{FixedResolution, ProbeError};

    const SMALL_SCREEN: ScreenSize = ScreenSize::new(640, 360);

    struct FailingProbe;

    impl ResolutionProvider for FailingProbe {
        fn probe(&self) -> Result<ScreenSize, ProbeError> { Err(ProbeError::Unparseable) }
    }

    #[derive(Clone, Default)]
    struct RecordingApplier {
        calls: Rc<RefCell<Vec<PathBuf>>>,
        fail: bool,
    }

    impl WallpaperApplier for RecordingApplier {
        fn apply(&self, path: &Path) -> Result<(), ApplyError> {
            self.calls.borrow_mut().push(path.to_path_buf());
            if self.fail { Err(ApplyError::System("refused".to_string())) } else { Ok(()) }
        }

        fn describe(&self) -> String { "recorder".to_string() }
    }

    fn options(dir: &Path, mode: LayoutMode) -> GenerateOptions {
        let mut layout = LayoutConfig::preset(mode);
        layout.outer_padding = 4;
        layout.inner_padding = 2;

        GenerateOptions {
            mode,
            layout,
            source_dir: dir.join("photos"),
            output_path: dir.join("out/wallpaper.png"),
            quality: 95,
            background: [15, 15, 20],
            fallback_resolution: SMALL_SCREEN,
            seed: Some(7),
        }
    }

    fn write_photos(dir: &Path, count: usize) {
        let photos = dir.join("photos");
        std::fs::create_dir_all(&photos).unwrap();
        for i in 0..count {
            let (w, h) = if i % 2 == 0 { (40, 20) } else { (20, 40) };
            let shade = u8::try_from(i * 20 % 256).unwrap();
            RgbImage::from_pixel(w, h, Rgb([shade, 100, 200]))
                .save(photos.join(format!("photo{i}.png")))
                .unwrap();
        }
    }

    fn completed(outcome: RunOutcome) -> RunReport {
        match outcome {
            RunOutcome::Completed(report) => report,
            RunOutcome::NoImages => panic!("expected a completed run"),
        }
    }

    #[test]
    fn test_empty_source_yields_no_images_and_no_output() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("photos")).unwrap();
        let applier = RecordingApplier::default();
        let calls = Rc::clone(&applier.calls);

        let manager = WallpaperManager::new(
            options(dir.path(), LayoutMode::Freeflow),
            Box::new(FixedResolution(SMALL_SCREEN)),
            Some(Box::new(applier)),
        );

        assert!(matches!(manager.generate().unwrap(), RunOutcome::NoImages));
        assert!(!dir.path().join("out/wallpaper.png").exists());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_undecodable_files_count_as_no_images() {
        let dir = TempDir::new().unwrap();
        let photos = dir.path().join("photos");
        std::fs::create_dir_all(&photos).unwrap();
        std::fs::write(photos.join("broken.jpg"), b"not a jpeg").unwrap();

        let manager = WallpaperManager::new(
            options(dir.path(), LayoutMode::Grid),
            Box::new(FixedResolution(SMALL_SCREEN)),
            None,
        );

        assert!(matches!(manager.generate().unwrap(), RunOutcome::NoImages));
    }

    #[test]
    fn test_run_writes_composite_at_probed_resolution_and_applies() {
        let dir = TempDir::new().unwrap();
        write_photos(dir.path(), 6);
        let applier = RecordingApplier::default();
        let calls = Rc::clone(&applier.calls);

        let manager = WallpaperManager::new(
            options(dir.path(), LayoutMode::Freeflow),
            Box::new(FixedResolution(SMALL_SCREEN)),
            Some(Box::new(applier)),
        );
        let report = completed(manager.generate().unwrap());

        assert!(report.saved());
        assert_eq!(report.loaded, 6);
        assert_eq!(report.layout.placed(), 6);
        assert!(matches!(report.apply, ApplyStatus::Applied(ref name) if name == "recorder"));
        assert_eq!(calls.borrow().as_slice(), [report.output_path.clone()]);

        let written = image::open(&report.output_path).unwrap();
        assert_eq!((written.width(), written.height()), (640, 360));
    }

    #[test]
    fn test_probe_failure_uses_fallback_resolution() {
        let dir = TempDir::new().unwrap();
        write_photos(dir.path(), 2);

        let opts = options(dir.path(), LayoutMode::Grid);
        let manager = WallpaperManager::new(opts, Box::new(FailingProbe), None);
        let report = completed(manager.generate().unwrap());

        assert_eq!(report.resolution, SMALL_SCREEN);
        assert!(matches!(report.apply, ApplyStatus::Skipped));
    }

    #[test]
    fn test_apply_failure_keeps_written_file() {
        let dir = TempDir::new().unwrap();
        write_photos(dir.path(), 3);
        let applier = RecordingApplier { fail: true, ..RecordingApplier::default() };

        let manager = WallpaperManager::new(
            options(dir.path(), LayoutMode::Freeflow),
            Box::new(FixedResolution(SMALL_SCREEN)),
            Some(Box::new(applier)),
        );
        let report = completed(manager.generate().unwrap());

        assert!(matches!(report.apply, ApplyStatus::Failed(ApplyError::System(_))));
        assert!(report.output_path.exists());
    }

    #[test]
    fn test_save_failure_skips_apply() {
        let dir = TempDir::new().unwrap();
        write_photos(dir.path(), 3);
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file, not a directory").unwrap();

        let applier = RecordingApplier::default();
        let calls = Rc::clone(&applier.calls);
        let mut opts = options(dir.path(), LayoutMode::Freeflow);
        opts.output_path = blocker.join("sub/wallpaper.png");

        let manager = WallpaperManager::new(
            opts,
            Box::new(FixedResolution(SMALL_SCREEN)),
            Some(Box::new(applier)),
        );
        let report = completed(manager.generate().unwrap());

        assert!(!report.saved());
        assert!(matches!(report.apply, ApplyStatus::Skipped));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_invalid_layout_is_an_error() {
        let dir = TempDir::new().unwrap();
        write_photos(dir.path(), 2);

        let manager = WallpaperManager::new(
            options(dir.path(), LayoutMode::Grid),
            Box::new(FixedResolution(ScreenSize::new(40, 20))),
            None,
        );

        assert!(matches!(manager.generate(), Err(LayoutError::ScreenTooSmall { .. })));
    }

    #[test]
    fn test_seeded_grid_runs_are_identical() {
        let dir = TempDir::new().unwrap();
        write_photos(dir.path(), 8);

        let run = |name: &str| {
            let mut opts = options(dir.path(), LayoutMode::Grid);
            opts.output_path = dir.path().join(name);
            let manager =
                WallpaperManager::new(opts, Box::new(FixedResolution(SMALL_SCREEN)), None);
            completed(manager.generate().unwrap())
        };

        let first = run("a.png");
        let second = run("b.png");

        assert_eq!(first.layout.placements, second.layout.placements);
        let a = image::open(&first.output_path).unwrap().to_rgb8();
        let b = image::open(&second.output_path).unwrap().to_rgb8();
        assert_eq!(a, b);
    }
}
