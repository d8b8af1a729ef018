use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::color::Color;
use crate::error::{PatternError, Result};
use crate::grid::{Cell, PatternGrid, cell_count};
use crate::palette::Palette;

/// Quantize one sample per cell to the nearest palette thread.
///
/// `samples` is row-major and must hold exactly `width * height` colors. Every
/// cell of the result is a stitch whose color is a palette entry's color.
pub fn build_grid(samples: &[Color], width: usize, height: usize, palette: &Palette) -> Result<PatternGrid> {
    if samples.len() != cell_count(width, height)? {
        return Err(PatternError::SampleCountMismatch {
            len: samples.len(),
            width,
            height,
        });
    }
    debug!(width, height, palette = palette.len(), "quantizing samples to palette");

    let match_cell = |&sample: &Color| -> Cell { Some(palette.nearest(sample).color) };

    #[cfg(feature = "parallel")]
    let cells: Vec<Cell> = samples.par_iter().map(match_cell).collect();
    #[cfg(not(feature = "parallel"))]
    let cells: Vec<Cell> = samples.iter().map(match_cell).collect();

    Ok(PatternGrid::from_cells(width, height, cells))
}

/// Same as [`build_grid`] for a canvas `ImageData`-style RGBA buffer.
///
/// Alpha is ignored.
pub fn build_grid_from_rgba(rgba: &[u8], width: usize, height: usize, palette: &Palette) -> Result<PatternGrid> {
    if rgba.len() % 4 != 0 || rgba.len() / 4 != cell_count(width, height)? {
        return Err(PatternError::SampleCountMismatch {
            len: rgba.len() / 4,
            width,
            height,
        });
    }
    let samples: Vec<Color> = rgba
        .chunks_exact(4)
        .map(|px| Color::new(px[0], px[1], px[2]))
        .collect();
    build_grid(&samples, width, height, palette)
}
