use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Color;
use crate::error::{PatternError, Result};
use crate::grid::PatternGrid;

const GRID_LINE: Rgb<u8> = Rgb([0x88, 0x88, 0x88]);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Edge length of one cell in output pixels.
    pub cell_size: u32,
    pub show_grid: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cell_size: 10,
            show_grid: true,
        }
    }
}

/// Rasterize `grid`, one `cell_size` square per cell. Empty cells are white.
pub fn render_image(grid: &PatternGrid, options: &RenderOptions) -> Result<RgbImage> {
    let cell = options.cell_size;
    if cell == 0 {
        return Err(PatternError::InvalidCellSize);
    }
    let too_large = || PatternError::RenderTooLarge {
        width: grid.width(),
        height: grid.height(),
        cell_size: cell,
    };
    let side = |cells: usize| u32::try_from(cells).ok().and_then(|n| n.checked_mul(cell));
    let out_w = side(grid.width()).ok_or_else(too_large)?;
    let out_h = side(grid.height()).ok_or_else(too_large)?;
    // RGB buffer length has to fit in memory as well
    (out_w as u64 * out_h as u64)
        .checked_mul(3)
        .filter(|&bytes| bytes <= isize::MAX as u64)
        .ok_or_else(too_large)?;
    debug!(out_w, out_h, show_grid = options.show_grid, "rendering pattern");

    let img = RgbImage::from_fn(out_w, out_h, |x, y| {
        let on_line = options.show_grid
            && (x % cell == 0 || y % cell == 0 || x == out_w - 1 || y == out_h - 1);
        if on_line {
            return GRID_LINE;
        }
        let color = grid
            .get((y / cell) as usize, (x / cell) as usize)
            .flatten()
            .unwrap_or(Color::WHITE);
        Rgb([color.red, color.green, color.blue])
    });
    Ok(img)
}

/// [`render_image`] encoded as PNG.
pub fn render_png(grid: &PatternGrid, options: &RenderOptions) -> Result<Vec<u8>> {
    let img = render_image(grid, options)?;
    let mut buf = Vec::new();
    {
        let mut cursor = std::io::Cursor::new(&mut buf);
        DynamicImage::ImageRgb8(img).write_to(&mut cursor, ImageFormat::Png)?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_one() -> PatternGrid {
        PatternGrid::from_rows(&[vec!["#C41E3A", ""]]).unwrap()
    }

    #[test]
    fn cells_fill_their_squares() {
        let opts = RenderOptions { cell_size: 4, show_grid: false };
        let img = render_image(&two_by_one(), &opts).unwrap();
        assert_eq!(img.dimensions(), (8, 4));
        assert_eq!(*img.get_pixel(1, 1), Rgb([0xC4, 0x1E, 0x3A]));
        assert_eq!(*img.get_pixel(6, 2), Rgb([0xFF, 0xFF, 0xFF]));
    }

    #[test]
    fn grid_lines_on_boundaries() {
        let opts = RenderOptions { cell_size: 4, show_grid: true };
        let img = render_image(&two_by_one(), &opts).unwrap();
        assert_eq!(*img.get_pixel(0, 2), GRID_LINE);
        assert_eq!(*img.get_pixel(4, 2), GRID_LINE);
        assert_eq!(*img.get_pixel(7, 2), GRID_LINE);
        assert_eq!(*img.get_pixel(2, 2), Rgb([0xC4, 0x1E, 0x3A]));
    }

    #[test]
    fn zero_cell_size_rejected() {
        let opts = RenderOptions { cell_size: 0, show_grid: false };
        assert!(matches!(render_png(&two_by_one(), &opts), Err(PatternError::InvalidCellSize)));
    }

    #[test]
    fn oversized_output_rejected() {
        let wide = PatternGrid::blank(70_000, 1).unwrap();
        let opts = RenderOptions { cell_size: 70_000, show_grid: false };
        assert!(matches!(
            render_image(&wide, &opts),
            Err(PatternError::RenderTooLarge { width: 70_000, height: 1, cell_size: 70_000 })
        ));
        let opts = RenderOptions { cell_size: u32::MAX, show_grid: true };
        assert!(matches!(render_png(&two_by_one(), &opts), Err(PatternError::RenderTooLarge { .. })));
    }

    #[test]
    fn png_decodes_back() {
        let png = render_png(&two_by_one(), &RenderOptions::default()).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (20, 10));
    }
}
