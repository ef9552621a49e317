//! Pixel geometry for grid cells and placed chunks.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

use super::LayoutError;
use super::catalog::ChunkShape;
use super::planner::Anchor;

/// Screen (and canvas) dimensions in pixels.
///
/// Written in config files as `"<width>x<height>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    /// Resolution used when the monitor query fails.
    pub const FALLBACK: Self = Self { width: 5120, height: 1440 };

    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self { Self { width, height } }
}

impl Default for ScreenSize {
    fn default() -> Self { Self::FALLBACK }
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ScreenSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || format!("Invalid resolution '{s}'. Expected <width>x<height>, e.g. 2560x1440.");
        let (width, height) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = height.trim().parse::<u32>().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl TryFrom<String> for ScreenSize {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl From<ScreenSize> for String {
    fn from(size: ScreenSize) -> Self { size.to_string() }
}

impl JsonSchema for ScreenSize {
    fn schema_name() -> Cow<'static, str> { "ScreenSize".into() }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "description": "Resolution in pixels, written as <width>x<height>.",
            "pattern": "^[1-9][0-9]*[xX][1-9][0-9]*$"
        })
    }
}

/// A rectangle on the canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn right(&self) -> u32 { self.x + self.width }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> u32 { self.y + self.height }

    /// Width divided by height.
    #[must_use]
    pub fn aspect(&self) -> f64 { f64::from(self.width) / f64::from(self.height) }

    /// Whether the two rectangles share at least one pixel.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Cell size and padding derived once per run from the screen and grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellMetrics {
    /// Width of one cell, in pixels.
    pub cell_width: u32,
    /// Height of one cell, in pixels.
    pub cell_height: u32,
    /// Margin around the whole canvas.
    pub outer_padding: u32,
    /// Gap between adjacent cells.
    pub inner_padding: u32,
}

impl CellMetrics {
    /// Derives the cell size for a `rows x cols` grid on `screen`.
    ///
    /// `cell = (screen - 2 * outer - (count - 1) * inner) / count`, rounded
    /// down, on each axis.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::EmptyGrid`] for a zero dimension, or
    /// [`LayoutError::ScreenTooSmall`] if the padding leaves no room for a
    /// cell.
    pub fn new(
        screen: ScreenSize,
        rows: usize,
        cols: usize,
        outer_padding: u32,
        inner_padding: u32,
    ) -> Result<Self, LayoutError> {
        if rows == 0 || cols == 0 {
            return Err(LayoutError::EmptyGrid { rows, cols });
        }

        let too_small = || LayoutError::ScreenTooSmall {
            screen_width: screen.width,
            screen_height: screen.height,
            rows,
            cols,
        };

        let cell_width = axis_cell_size(screen.width, cols, outer_padding, inner_padding)
            .ok_or_else(too_small)?;
        let cell_height = axis_cell_size(screen.height, rows, outer_padding, inner_padding)
            .ok_or_else(too_small)?;

        Ok(Self { cell_width, cell_height, outer_padding, inner_padding })
    }

    /// Pixel rectangle covered by `shape` anchored at `anchor`.
    ///
    /// Origin is `outer + index * (cell + inner)`; size is
    /// `cells * cell + (cells - 1) * inner`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn rect_for(&self, anchor: Anchor, shape: ChunkShape) -> PixelRect {
        let x = self.outer_padding + anchor.col as u32 * (self.cell_width + self.inner_padding);
        let y = self.outer_padding + anchor.row as u32 * (self.cell_height + self.inner_padding);
        let width = shape.width as u32 * self.cell_width
            + (shape.width as u32 - 1) * self.inner_padding;
        let height = shape.height as u32 * self.cell_height
            + (shape.height as u32 - 1) * self.inner_padding;

        PixelRect { x, y, width, height }
    }
}

/// Cell size along one axis, or `None` if it would not be positive.
fn axis_cell_size(extent: u32, count: usize, outer: u32, inner: u32) -> Option<u32> {
    let count = i64::try_from(count).ok()?;
    let usable = i64::from(extent) - 2 * i64::from(outer) - (count - 1) * i64::from(inner);
    let cell = usable.div_euclid(count);
    if cell <= 0 { None } else { u32::try_from(cell).ok() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_size_parses() {
        assert_eq!("2560x1440".parse::<ScreenSize>().unwrap(), ScreenSize::new(2560, 1440));
        assert!("2560".parse::<ScreenSize>().is_err());
        assert!("0x1440".parse::<ScreenSize>().is_err());
        assert!("wide x tall".parse::<ScreenSize>().is_err());
    }

    #[test]
    fn test_screen_size_serde_uses_string_form() {
        let size: ScreenSize = serde_json::from_str(r#""3440x1440""#).unwrap();
        assert_eq!(size, ScreenSize::new(3440, 1440));
        assert_eq!(serde_json::to_string(&size).unwrap(), r#""3440x1440""#);
        assert!(serde_json::from_str::<ScreenSize>(r#""3440""#).is_err());
    }

    #[test]
    fn test_screen_size_fallback() {
        assert_eq!(ScreenSize::default(), ScreenSize::new(5120, 1440));
        assert_eq!(ScreenSize::FALLBACK.to_string(), "5120x1440");
    }

    #[test]
    fn test_cell_metrics_for_grid_preset() {
        // (5120 - 60 - 23 * 12) / 24 = 199, (1440 - 60 - 5 * 12) / 6 = 220
        let metrics = CellMetrics::new(ScreenSize::FALLBACK, 6, 24, 30, 12).unwrap();
        assert_eq!(metrics.cell_width, 199);
        assert_eq!(metrics.cell_height, 220);
    }

    #[test]
    fn test_cell_metrics_for_freeflow_preset() {
        // (5120 - 40 - 27 * 6) / 28 = 175, (1440 - 40 - 7 * 6) / 8 = 169
        let metrics = CellMetrics::new(ScreenSize::FALLBACK, 8, 28, 20, 6).unwrap();
        assert_eq!(metrics.cell_width, 175);
        assert_eq!(metrics.cell_height, 169);
    }

    #[test]
    fn test_rect_for_single_cell_at_origin() {
        let metrics = CellMetrics::new(ScreenSize::FALLBACK, 6, 24, 30, 12).unwrap();
        let rect = metrics.rect_for(Anchor::new(0, 0), ChunkShape::new(1, 1));
        assert_eq!(rect, PixelRect::new(30, 30, 199, 220));
    }

    #[test]
    fn test_rect_for_multi_cell_spans_inner_padding() {
        let metrics = CellMetrics::new(ScreenSize::FALLBACK, 6, 24, 30, 12).unwrap();
        let rect = metrics.rect_for(Anchor::new(2, 3), ChunkShape::new(4, 3));

        assert_eq!(rect.x, 30 + 3 * (199 + 12));
        assert_eq!(rect.y, 30 + 2 * (220 + 12));
        assert_eq!(rect.width, 4 * 199 + 3 * 12);
        assert_eq!(rect.height, 3 * 220 + 2 * 12);
    }

    #[test]
    fn test_adjacent_rects_do_not_intersect() {
        let metrics = CellMetrics::new(ScreenSize::new(1000, 500), 4, 8, 10, 4).unwrap();
        let left = metrics.rect_for(Anchor::new(0, 0), ChunkShape::new(2, 2));
        let right = metrics.rect_for(Anchor::new(0, 2), ChunkShape::new(2, 2));
        let below = metrics.rect_for(Anchor::new(2, 0), ChunkShape::new(2, 2));

        assert!(!left.intersects(&right));
        assert!(!left.intersects(&below));
        assert_eq!(right.x - left.right(), 4);
    }

    #[test]
    fn test_cell_metrics_rejects_tiny_screen() {
        let err = CellMetrics::new(ScreenSize::new(100, 100), 6, 24, 30, 12).unwrap_err();
        assert!(matches!(err, LayoutError::ScreenTooSmall { .. }));
    }

    #[test]
    fn test_cell_metrics_rejects_empty_grid() {
        let err = CellMetrics::new(ScreenSize::FALLBACK, 0, 24, 30, 12).unwrap_err();
        assert_eq!(err, LayoutError::EmptyGrid { rows: 0, cols: 24 });
    }
}
