//! Fill loop that assigns items to chunk placements.
//!
//! The engine is generic over the item it places. For wallpapers the items are
//! decoded images and the placement callback fits them onto a canvas; the
//! `plan` command runs the same loop over unit items to preview a layout.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use super::catalog::ChunkShape;
use super::geometry::{CellMetrics, PixelRect, ScreenSize};
use super::grid::GridState;
use super::planner::{self, Anchor};
use super::{LayoutConfig, LayoutError, LayoutMode};

/// Log a progress line every this many placements.
const PROGRESS_INTERVAL: usize = 20;

/// A chunk placed on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Top-left grid cell.
    pub anchor: Anchor,
    /// Shape in cells.
    pub shape: ChunkShape,
    /// Target rectangle on the canvas.
    pub rect: PixelRect,
}

/// Outcome of a fill run.
#[derive(Debug, Clone)]
pub struct LayoutReport {
    /// Mode the run used.
    pub mode: LayoutMode,
    /// Placements in the order they were made.
    pub placements: Vec<Placement>,
    /// Loop iterations spent (shapes tried in grid mode, draws in freeflow).
    pub attempts: usize,
    /// Iterations that found no slot and consumed no item.
    pub skipped: usize,
    /// Items left in the queue when the run stopped.
    pub unplaced: usize,
    /// Final occupancy.
    pub grid: GridState,
}

impl LayoutReport {
    /// Number of items placed.
    #[must_use]
    pub fn placed(&self) -> usize { self.placements.len() }
}

/// Drives one layout run over a single grid.
#[derive(Debug)]
pub struct LayoutEngine {
    config: LayoutConfig,
    metrics: CellMetrics,
    grid: GridState,
}

impl LayoutEngine {
    /// Creates an engine for `screen` with an empty grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the screen is too
    /// small for the grid and padding.
    pub fn new(config: LayoutConfig, screen: ScreenSize) -> Result<Self, LayoutError> {
        config.validate()?;
        let metrics = CellMetrics::new(
            screen,
            config.rows,
            config.cols,
            config.outer_padding,
            config.inner_padding,
        )?;
        let grid = GridState::new(config.rows, config.cols);

        Ok(Self { config, metrics, grid })
    }

    /// The derived cell metrics.
    #[must_use]
    pub const fn metrics(&self) -> &CellMetrics { &self.metrics }

    /// The layout parameters.
    #[must_use]
    pub const fn config(&self) -> &LayoutConfig { &self.config }

    /// Shuffles `items` and places them according to `mode`.
    ///
    /// `place` is called once per placed item, before the grid is marked.
    /// Every item is either passed to `place` exactly once or counted in
    /// [`LayoutReport::unplaced`].
    pub fn fill<T, R, F>(
        self,
        mode: LayoutMode,
        mut items: Vec<T>,
        rng: &mut R,
        place: F,
    ) -> LayoutReport
    where
        R: Rng + ?Sized,
        F: FnMut(T, &Placement),
    {
        items.shuffle(rng);

        match mode {
            LayoutMode::Grid => self.fill_grid(items, place),
            LayoutMode::Freeflow => self.fill_freeflow(items, rng, place),
        }
    }

    /// Cycles the catalog in order and first-fits each shape.
    ///
    /// Stops when the items run out or the cycled sequence ends. A shape that
    /// does not fit is dropped, not retried.
    fn fill_grid<T, F>(mut self, items: Vec<T>, mut place: F) -> LayoutReport
    where
        F: FnMut(T, &Placement),
    {
        let mut queue = items.into_iter();
        let mut placements = Vec::with_capacity(queue.len());
        let mut attempts = 0;
        let mut skipped = 0;

        let shapes: Vec<ChunkShape> =
            self.config.catalog.cycled(self.config.catalog_repeats).collect();

        for shape in shapes {
            if queue.as_slice().is_empty() {
                break;
            }
            attempts += 1;

            let Some(anchor) = planner::find_first_fit(&self.grid, shape) else {
                skipped += 1;
                continue;
            };
            let Some(item) = queue.next() else { break };

            self.commit(item, anchor, shape, &mut place, &mut placements);
        }

        self.finish(LayoutMode::Grid, placements, attempts, skipped, queue.len())
    }

    /// Draws weighted shapes and places them by neighbour score.
    ///
    /// Runs while items remain and fewer than `attempt_factor * items`
    /// iterations have been spent. A draw that fits nowhere falls back to the
    /// configured small shapes; if those fail too the iteration is skipped.
    fn fill_freeflow<T, R, F>(mut self, items: Vec<T>, rng: &mut R, mut place: F) -> LayoutReport
    where
        R: Rng + ?Sized,
        F: FnMut(T, &Placement),
    {
        let mut queue = items.into_iter();
        let max_attempts = queue.len().saturating_mul(self.config.attempt_factor);
        let mut placements = Vec::with_capacity(queue.len());
        let mut attempts = 0;
        let mut skipped = 0;

        while !queue.as_slice().is_empty() && attempts < max_attempts {
            attempts += 1;

            let Some((shape, anchor)) = self.draw_and_plan(rng) else {
                skipped += 1;
                continue;
            };
            let Some(item) = queue.next() else { break };

            self.commit(item, anchor, shape, &mut place, &mut placements);
        }

        self.finish(LayoutMode::Freeflow, placements, attempts, skipped, queue.len())
    }

    /// Draws a shape and finds a scored slot for it, trying the fallback
    /// shapes in order if the drawn one does not fit.
    fn draw_and_plan<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(ChunkShape, Anchor)> {
        let drawn = self.config.catalog.draw(rng);

        drawn.into_iter().chain(self.config.fallback.iter().copied()).find_map(|shape| {
            planner::find_scored(&self.grid, shape, &self.config.scoring, rng)
                .map(|anchor| (shape, anchor))
        })
    }

    fn commit<T, F>(
        &mut self,
        item: T,
        anchor: Anchor,
        shape: ChunkShape,
        place: &mut F,
        placements: &mut Vec<Placement>,
    ) where
        F: FnMut(T, &Placement),
    {
        let placement = Placement { anchor, shape, rect: self.metrics.rect_for(anchor, shape) };

        place(item, &placement);
        self.grid.occupy_region(anchor.row, anchor.col, shape.width, shape.height);
        placements.push(placement);

        if placements.len() % PROGRESS_INTERVAL == 0 {
            tracing::debug!(
                placed = placements.len(),
                filled = self.grid.occupied_count(),
                total = self.grid.total_cells(),
                "layout: placed {} images, grid {:.1}% filled",
                placements.len(),
                self.grid.fill_ratio() * 100.0
            );
        }
    }

    fn finish(
        self,
        mode: LayoutMode,
        placements: Vec<Placement>,
        attempts: usize,
        skipped: usize,
        unplaced: usize,
    ) -> LayoutReport {
        tracing::info!(
            %mode,
            placed = placements.len(),
            unplaced,
            attempts,
            skipped,
            filled = self.grid.occupied_count(),
            total = self.grid.total_cells(),
            "layout: complete, grid {:.1}% filled",
            self.grid.fill_ratio() * 100.0
        );

        LayoutReport { mode, placements, attempts, skipped, unplaced, grid: self.grid }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::layout::ChunkCatalog;

    fn run(config: LayoutConfig, mode: LayoutMode, items: usize, seed: u64) -> LayoutReport {
        let engine = LayoutEngine::new(config, ScreenSize::FALLBACK).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        engine.fill(mode, vec![(); items], &mut rng, |(), _| {})
    }

    fn assert_no_overlap(report: &LayoutReport) {
        let mut grid = GridState::new(report.grid.rows(), report.grid.cols());
        for p in &report.placements {
            assert!(
                grid.region_free(p.anchor.row, p.anchor.col, p.shape.width, p.shape.height),
                "placement {p:?} overlaps or leaves the grid"
            );
            grid.occupy_region(p.anchor.row, p.anchor.col, p.shape.width, p.shape.height);
        }
        assert_eq!(grid, report.grid);
    }

    #[test]
    fn test_grid_mode_first_placement_is_largest_shape_at_origin() {
        let report = run(LayoutConfig::grid(), LayoutMode::Grid, 10, 1);
        let first = report.placements[0];
        assert_eq!(first.anchor, Anchor::new(0, 0));
        assert_eq!(first.shape, ChunkShape::new(6, 3));
    }

    #[test]
    fn test_grid_mode_stops_when_items_run_out() {
        let report = run(LayoutConfig::grid(), LayoutMode::Grid, 3, 1);
        assert_eq!(report.placed(), 3);
        assert_eq!(report.unplaced, 0);
    }

    #[test]
    fn test_grid_mode_fills_grid_with_enough_items() {
        let report = run(LayoutConfig::grid(), LayoutMode::Grid, 500, 1);
        assert_eq!(report.grid.occupied_count(), report.grid.total_cells());
        assert!(report.unplaced > 0);
        assert_no_overlap(&report);
    }

    #[test]
    fn test_grid_mode_never_exceeds_cycle_budget() {
        let config = LayoutConfig { catalog_repeats: 2, ..LayoutConfig::grid() };
        let report = run(config, LayoutMode::Grid, 1_000, 1);
        assert!(report.attempts <= 16);
        assert!(report.placed() <= 16);
    }

    #[test]
    fn test_freeflow_respects_attempt_cap() {
        let mut config = LayoutConfig::freeflow();
        config.catalog = ChunkCatalog::uniform(vec![ChunkShape::new(40, 40)]);
        config.fallback = Vec::new();

        let report = run(config, LayoutMode::Freeflow, 7, 9);
        assert_eq!(report.placed(), 0);
        assert_eq!(report.attempts, 21);
        assert_eq!(report.skipped, 21);
        assert_eq!(report.unplaced, 7);
    }

    #[test]
    fn test_freeflow_uses_fallback_when_draw_fits_nowhere() {
        let mut config = LayoutConfig::freeflow();
        config.catalog = ChunkCatalog::uniform(vec![ChunkShape::new(40, 40)]);

        let report = run(config, LayoutMode::Freeflow, 5, 2);
        assert_eq!(report.placed(), 5);
        assert!(report.placements.iter().all(|p| p.shape == ChunkShape::new(2, 1)));
    }

    #[test]
    fn test_freeflow_places_without_overlap() {
        for seed in 0..20 {
            let report = run(LayoutConfig::freeflow(), LayoutMode::Freeflow, 80, seed);
            assert!(report.attempts <= 240);
            assert_no_overlap(&report);
        }
    }

    #[test]
    fn test_place_callback_receives_every_placed_item_once() {
        let engine = LayoutEngine::new(LayoutConfig::freeflow(), ScreenSize::FALLBACK).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = Vec::new();

        let report = engine.fill(LayoutMode::Freeflow, (0..30).collect(), &mut rng, |i, p| {
            seen.push((i, *p));
        });

        assert_eq!(seen.len(), report.placed());
        let mut ids: Vec<_> = seen.iter().map(|(i, _)| *i).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), seen.len());
        assert!(seen.iter().zip(&report.placements).all(|((_, a), b)| a == b));
    }

    #[test]
    fn test_zero_items_places_nothing() {
        let report = run(LayoutConfig::freeflow(), LayoutMode::Freeflow, 0, 0);
        assert_eq!(report.placed(), 0);
        assert_eq!(report.attempts, 0);

        let report = run(LayoutConfig::grid(), LayoutMode::Grid, 0, 0);
        assert_eq!(report.placed(), 0);
        assert_eq!(report.attempts, 0);
    }

    #[test]
    fn test_engine_rejects_screen_too_small() {
        let err = LayoutEngine::new(LayoutConfig::grid(), ScreenSize::new(200, 100)).unwrap_err();
        assert!(matches!(err, LayoutError::ScreenTooSmall { .. }));
    }
}
