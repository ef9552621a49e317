//! Chunk layout engine.
//!
//! Packs rectangular multi-cell "chunks" onto a discrete grid without overlap.
//! Two fill strategies are provided:
//!
//! - [`LayoutMode::Grid`]: cycles the catalog in order and places each shape at
//!   the first free slot in row-major order.
//! - [`LayoutMode::Freeflow`]: draws shapes by weight and places them next to
//!   already-filled regions, picking randomly among the best-scored slots.
//!
//! The engine works on grid cells only. Pixel geometry lives in [`geometry`],
//! and turning a placement into pixels on a canvas is left to the caller.

pub mod catalog;
pub mod engine;
pub mod geometry;
pub mod grid;
pub mod planner;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{ChunkCatalog, ChunkShape};
pub use engine::{LayoutEngine, LayoutReport, Placement};
pub use geometry::{CellMetrics, PixelRect, ScreenSize};
pub use grid::GridState;
pub use planner::{Anchor, Candidate, ScoringParams};

/// Fill strategy used by the layout engine.
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
pub enum LayoutMode {
    /// Cycle the catalog in order, first-fit in row-major order, images bleed
    /// past their cell.
    Grid,
    /// Weighted random shapes, neighbour-scored placement, images cropped to
    /// their cell.
    #[default]
    Freeflow,
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grid => write!(f, "grid"),
            Self::Freeflow => write!(f, "freeflow"),
        }
    }
}

/// Errors raised while validating a layout configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The grid has zero rows or zero columns.
    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },
    /// The chunk catalog has no shapes.
    #[error("chunk catalog is empty")]
    EmptyCatalog,
    /// A chunk shape has a zero dimension.
    #[error("chunk shape {width}x{height} must be at least 1x1")]
    ZeroSizedShape { width: usize, height: usize },
    /// A chunk shape could not be parsed.
    #[error("invalid chunk shape '{0}', expected <width>x<height>")]
    InvalidShape(String),
    /// The weight list does not line up with the shape list.
    #[error("catalog has {shapes} shapes but {weights} weights")]
    WeightMismatch { shapes: usize, weights: usize },
    /// Only some catalog entries carry a weight.
    #[error("either every catalog entry has a weight or none does")]
    PartialWeights,
    /// A weight is zero.
    #[error("weight for chunk {index} must be positive")]
    ZeroWeight { index: usize },
    /// The weights sum past what a draw can address.
    #[error("catalog weights must sum to at most {}", u32::MAX)]
    WeightOverflow,
    /// The heuristic candidate pool is empty.
    #[error("candidate pool size must be at least 1")]
    EmptyCandidatePool,
    /// Grid mode would never cycle through the catalog.
    #[error("catalog repeats must be at least 1")]
    NoCatalogRepeats,
    /// Freeflow mode would never make an attempt.
    #[error("attempt factor must be at least 1")]
    NoAttempts,
    /// The screen leaves no room for a cell once padding is removed.
    #[error(
        "screen {screen_width}x{screen_height} is too small for a {rows}x{cols} grid with the configured padding"
    )]
    ScreenTooSmall { screen_width: u32, screen_height: u32, rows: usize, cols: usize },
}

/// Immutable layout parameters handed to the engine.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Number of grid rows.
    pub rows: usize,
    /// Number of grid columns.
    pub cols: usize,
    /// Margin around the whole canvas, in pixels.
    pub outer_padding: u32,
    /// Gap between adjacent cells, in pixels.
    pub inner_padding: u32,
    /// Chunk shapes (and optional weights) to draw from.
    pub catalog: ChunkCatalog,
    /// Shapes tried in order when a freeflow draw finds no slot.
    pub fallback: Vec<ChunkShape>,
    /// Scoring parameters for the freeflow planner.
    pub scoring: ScoringParams,
    /// How many times the grid mode cycles through the catalog.
    pub catalog_repeats: usize,
    /// Freeflow attempt cap, as a multiple of the image count.
    pub attempt_factor: usize,
}

impl LayoutConfig {
    /// Preset for [`LayoutMode::Grid`]: a 6x24 grid with large chunks first.
    #[must_use]
    pub fn grid() -> Self {
        Self {
            rows: 6,
            cols: 24,
            outer_padding: 30,
            inner_padding: 12,
            catalog: ChunkCatalog::uniform(vec![
                ChunkShape::new(6, 3),
                ChunkShape::new(4, 3),
                ChunkShape::new(3, 2),
                ChunkShape::new(2, 3),
                ChunkShape::new(2, 2),
                ChunkShape::new(2, 1),
                ChunkShape::new(1, 2),
                ChunkShape::new(1, 1),
            ]),
            fallback: default_fallback(),
            scoring: ScoringParams::default(),
            catalog_repeats: 100,
            attempt_factor: 3,
        }
    }

    /// Preset for [`LayoutMode::Freeflow`]: an 8x28 grid with weighted shapes.
    #[must_use]
    pub fn freeflow() -> Self {
        let shapes = vec![
            ChunkShape::new(4, 2),
            ChunkShape::new(3, 2),
            ChunkShape::new(2, 3),
            ChunkShape::new(3, 1),
            ChunkShape::new(2, 2),
            ChunkShape::new(1, 3),
            ChunkShape::new(2, 1),
            ChunkShape::new(1, 2),
            ChunkShape::new(1, 1),
            ChunkShape::new(4, 1),
            ChunkShape::new(1, 4),
            ChunkShape::new(3, 3),
        ];
        let weights = vec![2, 3, 4, 3, 5, 3, 6, 6, 10, 2, 2, 1];

        Self {
            rows: 8,
            cols: 28,
            outer_padding: 20,
            inner_padding: 6,
            // The preset table is fixed and well-formed.
            catalog: ChunkCatalog::weighted(shapes.clone(), weights)
                .unwrap_or_else(|_| ChunkCatalog::uniform(shapes)),
            fallback: default_fallback(),
            scoring: ScoringParams::default(),
            catalog_repeats: 100,
            attempt_factor: 3,
        }
    }

    /// Returns the preset for the given mode.
    #[must_use]
    pub fn preset(mode: LayoutMode) -> Self {
        match mode {
            LayoutMode::Grid => Self::grid(),
            LayoutMode::Freeflow => Self::freeflow(),
        }
    }

    /// Checks the parameters that the type system does not already enforce.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty grid, an empty candidate pool, or a zero
    /// catalog repeat count or attempt factor.
    pub const fn validate(&self) -> Result<(), LayoutError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(LayoutError::EmptyGrid { rows: self.rows, cols: self.cols });
        }
        if self.scoring.pool_size == 0 {
            return Err(LayoutError::EmptyCandidatePool);
        }
        if self.catalog_repeats == 0 {
            return Err(LayoutError::NoCatalogRepeats);
        }
        if self.attempt_factor == 0 {
            return Err(LayoutError::NoAttempts);
        }
        Ok(())
    }
}

/// Fallback shapes shared by both presets.
fn default_fallback() -> Vec<ChunkShape> {
    vec![ChunkShape::new(2, 1), ChunkShape::new(1, 2), ChunkShape::new(1, 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_preset_matches_reference_values() {
        let config = LayoutConfig::grid();
        assert_eq!((config.rows, config.cols), (6, 24));
        assert_eq!((config.outer_padding, config.inner_padding), (30, 12));
        assert_eq!(config.catalog.len(), 8);
        assert!(!config.catalog.is_weighted());
        assert_eq!(config.catalog.shapes()[0], ChunkShape::new(6, 3));
    }

    #[test]
    fn test_freeflow_preset_is_weighted() {
        let config = LayoutConfig::freeflow();
        assert_eq!((config.rows, config.cols), (8, 28));
        assert_eq!((config.outer_padding, config.inner_padding), (20, 6));
        assert!(config.catalog.is_weighted());
        assert_eq!(config.catalog.weights().map(<[u32]>::len), Some(12));
    }

    #[test]
    fn test_presets_validate() {
        assert!(LayoutConfig::grid().validate().is_ok());
        assert!(LayoutConfig::freeflow().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_grid() {
        let config = LayoutConfig { rows: 0, ..LayoutConfig::grid() };
        assert_eq!(config.validate(), Err(LayoutError::EmptyGrid { rows: 0, cols: 24 }));
    }

    #[test]
    fn test_validate_rejects_empty_pool() {
        let mut config = LayoutConfig::freeflow();
        config.scoring.pool_size = 0;
        assert_eq!(config.validate(), Err(LayoutError::EmptyCandidatePool));
    }

    #[test]
    fn test_validate_rejects_zero_catalog_repeats() {
        let config = LayoutConfig { catalog_repeats: 0, ..LayoutConfig::grid() };
        assert_eq!(config.validate(), Err(LayoutError::NoCatalogRepeats));
    }

    #[test]
    fn test_validate_rejects_zero_attempt_factor() {
        let config = LayoutConfig { attempt_factor: 0, ..LayoutConfig::freeflow() };
        assert_eq!(config.validate(), Err(LayoutError::NoAttempts));
    }

    #[test]
    fn test_layout_mode_display_and_default() {
        assert_eq!(LayoutMode::default(), LayoutMode::Freeflow);
        assert_eq!(LayoutMode::Grid.to_string(), "grid");
        assert_eq!(LayoutMode::Freeflow.to_string(), "freeflow");
    }

    #[test]
    fn test_layout_mode_deserializes_lowercase() {
        let mode: LayoutMode = serde_json::from_str(r#""grid""#).unwrap();
        assert_eq!(mode, LayoutMode::Grid);
    }
}
