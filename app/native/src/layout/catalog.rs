//! Chunk shapes and the catalog they are drawn from.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::{Error as WeightError, WeightedIndex};
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

use super::LayoutError;

/// A rectangular block of grid cells, `width x height`.
///
/// Serialized as the string `"<width>x<height>"`, e.g. `"4x2"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChunkShape {
    /// Width in cells.
    pub width: usize,
    /// Height in cells.
    pub height: usize,
}

impl ChunkShape {
    /// Creates a shape. Both dimensions are expected to be at least 1; use
    /// [`ChunkShape::try_new`] for untrusted input.
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self { Self { width, height } }

    /// Creates a shape, rejecting zero dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ZeroSizedShape`] if either dimension is zero.
    pub const fn try_new(width: usize, height: usize) -> Result<Self, LayoutError> {
        if width == 0 || height == 0 {
            return Err(LayoutError::ZeroSizedShape { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of cells covered by the shape.
    #[must_use]
    pub const fn area(self) -> usize { self.width * self.height }
}

impl fmt::Display for ChunkShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ChunkShape {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LayoutError::InvalidShape(s.to_string());
        let (width, height) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = width.trim().parse::<usize>().map_err(|_| invalid())?;
        let height = height.trim().parse::<usize>().map_err(|_| invalid())?;
        Self::try_new(width, height)
    }
}

impl TryFrom<String> for ChunkShape {
    type Error = LayoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl From<ChunkShape> for String {
    fn from(shape: ChunkShape) -> Self { shape.to_string() }
}

impl JsonSchema for ChunkShape {
    fn schema_name() -> Cow<'static, str> { "ChunkShape".into() }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "description": "Chunk size in grid cells, written as <width>x<height>.",
            "pattern": "^[1-9][0-9]*[xX][1-9][0-9]*$"
        })
    }
}

/// Ordered list of chunk shapes with optional selection weights.
#[derive(Debug, Clone)]
pub struct ChunkCatalog {
    shapes: Vec<ChunkShape>,
    weights: Option<Vec<u32>>,
    sampler: Option<WeightedIndex<u32>>,
}

impl ChunkCatalog {
    /// Creates an unweighted catalog. Draws pick every shape with equal odds.
    #[must_use]
    pub const fn uniform(shapes: Vec<ChunkShape>) -> Self {
        Self { shapes, weights: None, sampler: None }
    }

    /// Creates a catalog whose draws are proportional to `weights`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog is empty, the lengths differ, any
    /// weight is zero, or the weights sum past `u32::MAX`.
    pub fn weighted(shapes: Vec<ChunkShape>, weights: Vec<u32>) -> Result<Self, LayoutError> {
        if shapes.is_empty() {
            return Err(LayoutError::EmptyCatalog);
        }
        if shapes.len() != weights.len() {
            return Err(LayoutError::WeightMismatch {
                shapes: shapes.len(),
                weights: weights.len(),
            });
        }
        if let Some(index) = weights.iter().position(|w| *w == 0) {
            return Err(LayoutError::ZeroWeight { index });
        }

        let sampler = WeightedIndex::new(&weights).map_err(|err| match err {
            WeightError::Overflow => LayoutError::WeightOverflow,
            _ => LayoutError::EmptyCatalog,
        })?;

        Ok(Self { shapes, weights: Some(weights), sampler: Some(sampler) })
    }

    /// Builds a catalog from `(shape, weight)` pairs.
    ///
    /// Either every entry has a weight, or none does.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty list, a zero-sized shape, mixed weighted
    /// and unweighted entries, or a zero weight.
    pub fn from_entries<I>(entries: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = (ChunkShape, Option<u32>)>,
    {
        let (shapes, weights): (Vec<_>, Vec<_>) = entries.into_iter().unzip();

        if shapes.is_empty() {
            return Err(LayoutError::EmptyCatalog);
        }
        for shape in &shapes {
            ChunkShape::try_new(shape.width, shape.height)?;
        }

        match weights.iter().filter(|w| w.is_some()).count() {
            0 => Ok(Self::uniform(shapes)),
            n if n == weights.len() => {
                Self::weighted(shapes, weights.into_iter().flatten().collect())
            }
            _ => Err(LayoutError::PartialWeights),
        }
    }

    /// The shapes, in catalog order.
    #[must_use]
    pub fn shapes(&self) -> &[ChunkShape] { &self.shapes }

    /// The weights, if the catalog is weighted.
    #[must_use]
    pub fn weights(&self) -> Option<&[u32]> { self.weights.as_deref() }

    /// Whether draws are weighted.
    #[must_use]
    pub const fn is_weighted(&self) -> bool { self.weights.is_some() }

    /// Number of shapes.
    #[must_use]
    pub fn len(&self) -> usize { self.shapes.len() }

    /// Whether the catalog has no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    /// Iterates the catalog in order, `times` times over.
    pub fn cycled(&self, times: usize) -> impl Iterator<Item = ChunkShape> + '_ {
        std::iter::repeat_n(&self.shapes, times).flatten().copied()
    }

    /// Draws a shape. Weighted catalogs draw proportionally to their weights,
    /// unweighted ones uniformly.
    ///
    /// Returns `None` only for an empty catalog.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<ChunkShape> {
        if self.shapes.is_empty() {
            return None;
        }
        let index = match &self.sampler {
            Some(sampler) => sampler.sample(rng),
            None => rng.random_range(0..self.shapes.len()),
        };
        self.shapes.get(index).copied()
    }
}
