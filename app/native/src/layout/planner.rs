//! Slot finding for chunk placement.
//!
//! Two policies are provided:
//!
//! - [`find_first_fit`] scans rows top to bottom, columns left to right, and
//!   returns the first free slot.
//! - [`find_scored`] scores every free slot by how many occupied cells
//!   surround it, minus a small top-left bias, then picks uniformly among the
//!   best few.
//!
//! Neither policy mutates the grid; "no slot" is reported as `None`.

use rand::Rng;
use serde::Serialize;

use super::catalog::ChunkShape;
use super::grid::GridState;

/// Grid cell at which a chunk's top-left corner is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Anchor {
    pub row: usize,
    pub col: usize,
}

impl Anchor {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self { Self { row, col } }
}

/// Tuning for [`find_scored`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    /// Score subtracted per row index.
    pub row_penalty: f64,
    /// Score subtracted per column index.
    pub col_penalty: f64,
    /// How many of the best candidates the random pick is made from.
    pub pool_size: usize,
}

impl Default for ScoringParams {
    fn default() -> Self { Self { row_penalty: 0.1, col_penalty: 0.05, pool_size: 5 } }
}

/// A free slot together with its heuristic score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub anchor: Anchor,
    pub score: f64,
}

/// Returns the first slot in row-major order where `shape` fits.
#[must_use]
pub fn find_first_fit(grid: &GridState, shape: ChunkShape) -> Option<Anchor> {
    if shape.width > grid.cols() || shape.height > grid.rows() {
        return None;
    }

    (0..=grid.rows() - shape.height)
        .flat_map(|row| (0..=grid.cols() - shape.width).map(move |col| Anchor::new(row, col)))
        .find(|a| grid.region_free(a.row, a.col, shape.width, shape.height))
}

/// Scores a slot for `shape` anchored at `anchor`.
///
/// The score is the number of occupied cells inside the shape's bounding box
/// grown by one cell on each side (clamped to the grid), minus
/// `row_penalty * row` and `col_penalty * col`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score_slot(
    grid: &GridState,
    anchor: Anchor,
    shape: ChunkShape,
    params: &ScoringParams,
) -> f64 {
    let neighbours = grid.occupied_in(
        anchor.row.saturating_sub(1),
        anchor.col.saturating_sub(1),
        anchor.row + shape.height + 1,
        anchor.col + shape.width + 1,
    );

    (anchor.col as f64).mul_add(
        -params.col_penalty,
        (anchor.row as f64).mul_add(-params.row_penalty, neighbours as f64),
    )
}

/// Lists every free slot for `shape` with its score, in row-major order.
#[must_use]
pub fn scored_candidates(
    grid: &GridState,
    shape: ChunkShape,
    params: &ScoringParams,
) -> Vec<Candidate> {
    if shape.width > grid.cols() || shape.height > grid.rows() {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for row in 0..=grid.rows() - shape.height {
        for col in 0..=grid.cols() - shape.width {
            if grid.region_free(row, col, shape.width, shape.height) {
                let anchor = Anchor::new(row, col);
                let score = score_slot(grid, anchor, shape, params);
                candidates.push(Candidate { anchor, score });
            }
        }
    }
    candidates
}

/// Sorts candidates best first.
///
/// Equal scores are ordered by row, then column, both descending.
pub fn rank_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.anchor.row.cmp(&a.anchor.row))
            .then_with(|| b.anchor.col.cmp(&a.anchor.col))
    });
}

/// Picks a slot for `shape` among the `pool_size` best-scored candidates.
///
/// Returns `None` when the shape fits nowhere.
pub fn find_scored<R: Rng + ?Sized>(
    grid: &GridState,
    shape: ChunkShape,
    params: &ScoringParams,
    rng: &mut R,
) -> Option<Anchor> {
    let mut candidates = scored_candidates(grid, shape, params);
    if candidates.is_empty() {
        return None;
    }

    rank_candidates(&mut candidates);

    let pool = params.pool_size.clamp(1, candidates.len());
    Some(candidates[rng.random_range(0..pool)].anchor)
}
