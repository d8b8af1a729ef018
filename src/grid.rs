//! The pattern grid: a fixed-size, row-major array of stitch cells.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{PatternError, Result};

/// A grid cell: `Some(color)` is a stitch, `None` is bare fabric.
pub type Cell = Option<Color>;

/// Rectangular array of cells addressed by `(row, col)`, zero-based.
///
/// Dimensions are fixed at creation. The interchange form is a nested array of
/// strings, one `"#RRGGBB"` per stitch and `""` for an empty cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<String>>", try_from = "Vec<Vec<String>>")]
pub struct PatternGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

/// One fabric-inch square of a pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// Section row and column, counted in squares.
    pub row: usize,
    pub col: usize,
    /// Top-left cell of the square in the full grid.
    pub origin: (usize, usize),
    pub grid: PatternGrid,
}

impl PatternGrid {
    /// A grid with every cell empty.
    pub fn blank(width: usize, height: usize) -> Result<Self> {
        Self::filled(width, height, None)
    }

    pub fn filled(width: usize, height: usize, cell: Cell) -> Result<Self> {
        let len = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![cell; len],
        })
    }

    /// Build from row-major cells already known to be `width * height` long.
    pub(crate) fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self { width, height, cells }
    }

    /// Validate and parse the interchange form.
    ///
    /// Every row must have the same, non-zero length and every cell must be
    /// `""` or a 6-digit hex color. Nothing is built if any check fails.
    pub fn from_rows<R, S>(rows: &[R]) -> Result<Self>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(PatternError::EmptyGrid);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != width {
                return Err(PatternError::RaggedRow {
                    row,
                    len: values.len(),
                    width,
                });
            }
            for value in values {
                let value = value.as_ref();
                cells.push(if value.is_empty() {
                    None
                } else {
                    Some(Color::from_hex(value)?)
                });
            }
        }
        Ok(Self { width, height, cells })
    }

    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map(Color::to_hex).unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, Cell> {
        self.cells.chunks_exact(self.width)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Set a single cell. Out-of-range coordinates leave the grid untouched.
    pub fn paint(&mut self, row: usize, col: usize, cell: Cell) -> Result<()> {
        let i = self.index(row, col).ok_or(PatternError::OutOfBounds {
            row,
            col,
            width: self.width,
            height: self.height,
        })?;
        self.cells[i] = cell;
        Ok(())
    }

    pub fn stitch_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Copy of the region starting at `(row, col)`, clipped to the grid edge.
    pub fn sub_grid(&self, row: usize, col: usize, height: usize, width: usize) -> Result<Self> {
        if row >= self.height || col >= self.width {
            return Err(PatternError::OutOfBounds {
                row,
                col,
                width: self.width,
                height: self.height,
            });
        }
        if width == 0 || height == 0 {
            return Err(PatternError::ZeroDimension { width, height });
        }
        let h = height.min(self.height - row);
        let w = width.min(self.width - col);
        let cells = self
            .rows()
            .skip(row)
            .take(h)
            .flat_map(|r| r[col..col + w].iter().copied())
            .collect();
        Ok(Self::from_cells(w, h, cells))
    }

    /// Split into `fabric_count`-cell squares, row-major. Edge squares are clipped.
    pub fn sections(&self, fabric_count: usize) -> Result<Vec<Section>> {
        if fabric_count == 0 {
            return Err(PatternError::ZeroDimension {
                width: fabric_count,
                height: fabric_count,
            });
        }
        let rows = self.height.div_ceil(fabric_count);
        let cols = self.width.div_ceil(fabric_count);
        let mut out = Vec::with_capacity(rows * cols);
        for sr in 0..rows {
            for sc in 0..cols {
                let origin = (sr * fabric_count, sc * fabric_count);
                out.push(Section {
                    row: sr,
                    col: sc,
                    origin,
                    grid: self.sub_grid(origin.0, origin.1, fabric_count, fabric_count)?,
                });
            }
        }
        Ok(out)
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }
}

/// `width * height`, rejecting zero sides and grids too big to allocate.
pub(crate) fn cell_count(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(PatternError::ZeroDimension { width, height });
    }
    width
        .checked_mul(height)
        .filter(|&n| n.checked_mul(size_of::<Cell>()).is_some_and(|b| b <= isize::MAX as usize))
        .ok_or(PatternError::DimensionOverflow { width, height })
}

impl From<PatternGrid> for Vec<Vec<String>> {
    fn from(grid: PatternGrid) -> Self {
        grid.to_rows()
    }
}

impl TryFrom<Vec<Vec<String>>> for PatternGrid {
    type Error = PatternError;

    fn try_from(rows: Vec<Vec<String>>) -> Result<Self> {
        PatternGrid::from_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_grid_is_all_empty() {
        let g = PatternGrid::blank(3, 2).unwrap();
        assert_eq!((g.width(), g.height()), (3, 2));
        assert_eq!(g.stitch_count(), 0);
        assert_eq!(g.to_rows(), vec![vec![""; 3]; 2]);
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(PatternGrid::blank(0, 4).is_err());
        assert!(PatternGrid::blank(4, 0).is_err());
    }

    #[test]
    fn oversized_dimensions_rejected() {
        assert!(matches!(
            PatternGrid::blank(usize::MAX, 2),
            Err(PatternError::DimensionOverflow { .. })
        ));
        assert!(matches!(
            PatternGrid::blank(1 << 40, 1 << 30),
            Err(PatternError::DimensionOverflow { .. })
        ));
    }

    #[test]
    fn ragged_rows_rejected() {
        let rows = vec![vec!["#000000", ""], vec!["#000000"]];
        assert!(matches!(
            PatternGrid::from_rows(&rows),
            Err(PatternError::RaggedRow { row: 1, len: 1, width: 2 })
        ));
    }

    #[test]
    fn bad_cell_rejected() {
        let rows = vec![vec!["#000000", "red"]];
        assert!(matches!(PatternGrid::from_rows(&rows), Err(PatternError::InvalidColor(_))));
        let empty: Vec<Vec<&str>> = Vec::new();
        assert!(matches!(PatternGrid::from_rows(&empty), Err(PatternError::EmptyGrid)));
    }

    #[test]
    fn lowercase_input_is_canonicalised() {
        let g = PatternGrid::from_rows(&[vec!["#c41e3a", ""]]).unwrap();
        assert_eq!(g.to_rows(), vec![vec!["#C41E3A".to_string(), String::new()]]);
    }

    #[test]
    fn paint_and_get() {
        let mut g = PatternGrid::blank(2, 2).unwrap();
        g.paint(1, 0, Some(Color::BLACK)).unwrap();
        assert_eq!(g.get(1, 0), Some(Some(Color::BLACK)));
        assert_eq!(g.get(0, 0), Some(None));
        assert_eq!(g.get(2, 0), None);
        assert!(matches!(g.paint(0, 2, None), Err(PatternError::OutOfBounds { .. })));
    }

    #[test]
    fn sub_grid_clips_at_edges() {
        let mut g = PatternGrid::blank(3, 3).unwrap();
        g.paint(2, 2, Some(Color::WHITE)).unwrap();
        let s = g.sub_grid(1, 1, 5, 5).unwrap();
        assert_eq!((s.width(), s.height()), (2, 2));
        assert_eq!(s.get(1, 1), Some(Some(Color::WHITE)));
    }

    #[test]
    fn sections_cover_the_grid() {
        let g = PatternGrid::filled(5, 3, Some(Color::BLACK)).unwrap();
        let sections = g.sections(2).unwrap();
        assert_eq!(sections.len(), 2 * 3);
        let last = sections.last().unwrap();
        assert_eq!((last.row, last.col, last.origin), (1, 2, (2, 4)));
        assert_eq!((last.grid.width(), last.grid.height()), (1, 1));
        let total: usize = sections.iter().map(|s| s.grid.stitch_count()).sum();
        assert_eq!(total, 15);
    }

    #[test]
    fn json_round_trip() {
        let g = PatternGrid::from_rows(&[vec!["#000000", ""], vec!["", "#FFFFFF"]]).unwrap();
        let json = g.to_json().unwrap();
        assert_eq!(json, r##"[["#000000",""],["","#FFFFFF"]]"##);
        assert_eq!(PatternGrid::from_json(&json).unwrap(), g);
    }

    #[test]
    fn json_rejects_non_rectangular() {
        assert!(PatternGrid::from_json(r##"[["#000000",""],[""]]"##).is_err());
        assert!(PatternGrid::from_json("[]").is_err());
    }
}
