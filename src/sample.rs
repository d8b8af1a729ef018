//! Cropping a decoded image and sampling it down to one color per grid cell.
//!
//! The resampling itself is the `image` crate's; this module only decides
//! which part of the picture ends up in the pattern.

use image::{DynamicImage, GenericImageView, imageops::FilterType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Color;
use crate::error::{PatternError, Result};

/// A rectangle of source pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropWindow {
    /// Largest centered window with the grid's aspect ratio.
    pub fn cover(img_w: u32, img_h: u32, grid_w: u32, grid_h: u32) -> Self {
        let (img_w64, img_h64) = (img_w as u64, img_h as u64);
        let (grid_w64, grid_h64) = (grid_w.max(1) as u64, grid_h.max(1) as u64);
        let (width, height) = if img_w64 * grid_h64 > img_h64 * grid_w64 {
            // wider than the grid: keep full height
            let w = (img_h64 * grid_w64 + grid_h64 / 2) / grid_h64;
            (w.max(1).min(img_w64) as u32, img_h)
        } else {
            let h = (img_w64 * grid_h64 + grid_w64 / 2) / grid_w64;
            (img_w, h.max(1).min(img_h64) as u32)
        };
        Self {
            x: img_w.saturating_sub(width) / 2,
            y: img_h.saturating_sub(height) / 2,
            width,
            height,
        }
    }

    /// Shrink around the center by `factor` (values below 1 are treated as 1).
    pub fn zoomed(self, factor: f32) -> Self {
        let factor = if factor.is_finite() { factor.max(1.0) } else { 1.0 };
        let width = ((self.width as f32 / factor).round() as u32).max(1).min(self.width);
        let height = ((self.height as f32 / factor).round() as u32).max(1).min(self.height);
        Self {
            x: self.x + (self.width - width) / 2,
            y: self.y + (self.height - height) / 2,
            width,
            height,
        }
    }

    /// Move by `(dx, dy)` source pixels, clamped so the window stays inside the image.
    pub fn panned(self, dx: i64, dy: i64, img_w: u32, img_h: u32) -> Self {
        let max_x = img_w.saturating_sub(self.width) as i64;
        let max_y = img_h.saturating_sub(self.height) as i64;
        Self {
            x: (self.x as i64).saturating_add(dx).clamp(0, max_x) as u32,
            y: (self.y as i64).saturating_add(dy).clamp(0, max_y) as u32,
            ..self
        }
    }

    fn check(&self, img_w: u32, img_h: u32) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PatternError::InvalidCropWindow(format!(
                "{}x{} window is empty",
                self.width, self.height
            )));
        }
        let right = self.x as u64 + self.width as u64;
        let bottom = self.y as u64 + self.height as u64;
        if right > img_w as u64 || bottom > img_h as u64 {
            return Err(PatternError::InvalidCropWindow(format!(
                "{}x{}+{}+{} exceeds {}x{} image",
                self.width, self.height, self.x, self.y, img_w, img_h
            )));
        }
        Ok(())
    }
}

/// How a photo becomes a pattern.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    pub width: usize,
    pub height: usize,
    pub zoom: f32,
    pub pan_x: i64,
    pub pan_y: i64,
    /// Reduce the imported grid to this many colors.
    pub max_colors: Option<usize>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            zoom: 1.0,
            pan_x: 0,
            pan_y: 0,
            max_colors: None,
        }
    }
}

impl ImportOptions {
    pub fn crop_window(&self, img_w: u32, img_h: u32) -> Result<CropWindow> {
        let (grid_w, grid_h) = grid_size(self.width, self.height)?;
        Ok(CropWindow::cover(img_w, img_h, grid_w, grid_h)
            .zoomed(self.zoom)
            .panned(self.pan_x, self.pan_y, img_w, img_h))
    }
}

/// Grid dimensions as image dimensions; the `image` crate works in `u32`.
fn grid_size(width: usize, height: usize) -> Result<(u32, u32)> {
    if width == 0 || height == 0 {
        return Err(PatternError::ZeroDimension { width, height });
    }
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(PatternError::DimensionOverflow { width, height }),
    }
}

/// Row-major RGB samples, exactly `width * height` of them.
///
/// With no `crop`, the centered cover window is used.
pub fn sample_image(img: &DynamicImage, width: usize, height: usize, crop: Option<CropWindow>) -> Result<Vec<Color>> {
    let (grid_w, grid_h) = grid_size(width, height)?;
    let (img_w, img_h) = img.dimensions();
    if img_w == 0 || img_h == 0 {
        return Err(PatternError::InvalidCropWindow(format!("source image is {img_w}x{img_h}")));
    }
    let crop = crop.unwrap_or_else(|| CropWindow::cover(img_w, img_h, grid_w, grid_h));
    crop.check(img_w, img_h)?;
    debug!(?crop, width, height, "sampling image");

    let sampled = img
        .crop_imm(crop.x, crop.y, crop.width, crop.height)
        .resize_exact(grid_w, grid_h, FilterType::Triangle)
        .to_rgb8();
    Ok(sampled.pixels().map(|p| Color::from(p.0)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn cover_centers_on_the_long_axis() {
        assert_eq!(
            CropWindow::cover(400, 200, 10, 10),
            CropWindow { x: 100, y: 0, width: 200, height: 200 }
        );
        assert_eq!(
            CropWindow::cover(200, 400, 10, 10),
            CropWindow { x: 0, y: 100, width: 200, height: 200 }
        );
        assert_eq!(
            CropWindow::cover(300, 300, 20, 10),
            CropWindow { x: 0, y: 75, width: 300, height: 150 }
        );
    }

    #[test]
    fn zoom_and_pan_stay_inside() {
        let w = CropWindow::cover(400, 200, 1, 1).zoomed(2.0);
        assert_eq!(w, CropWindow { x: 150, y: 50, width: 100, height: 100 });
        let p = w.panned(1_000, -1_000, 400, 200);
        assert_eq!(p, CropWindow { x: 300, y: 0, width: 100, height: 100 });
        assert_eq!(w.zoomed(0.5), w);
    }

    #[test]
    fn extreme_pan_saturates_at_the_edges() {
        let w = CropWindow::cover(400, 200, 1, 1);
        assert_eq!(w.panned(i64::MAX, i64::MIN, 400, 200), CropWindow { x: 200, y: 0, width: 200, height: 200 });
        assert_eq!(w.panned(i64::MIN, i64::MAX, 400, 200), CropWindow { x: 0, y: 0, width: 200, height: 200 });
    }

    #[test]
    fn samples_one_color_per_cell() {
        let img = RgbImage::from_fn(80, 4, |x, _| if x < 40 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) });
        let img = DynamicImage::ImageRgb8(img);
        let crop = CropWindow { x: 0, y: 0, width: 80, height: 4 };
        let samples = sample_image(&img, 2, 1, Some(crop)).unwrap();
        assert_eq!(samples.len(), 2);
        assert!(samples[0].red > samples[0].blue);
        assert!(samples[1].blue > samples[1].red);
    }

    #[test]
    fn default_crop_keeps_flat_colors() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(30, 20, Rgb([200, 100, 50])));
        let samples = sample_image(&img, 4, 4, None).unwrap();
        assert_eq!(samples.len(), 16);
        assert!(samples.iter().all(|&c| c.distance_sq(Color::new(200, 100, 50)) <= 3));
    }

    #[test]
    fn grid_sides_beyond_u32_are_rejected() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let huge = u32::MAX as usize + 1;
        assert!(matches!(
            sample_image(&img, huge, 1, None),
            Err(PatternError::DimensionOverflow { .. })
        ));
        let options = ImportOptions { width: 1, height: huge, ..ImportOptions::default() };
        assert!(matches!(options.crop_window(4, 4), Err(PatternError::DimensionOverflow { .. })));
        assert!(matches!(
            ImportOptions { width: 0, ..ImportOptions::default() }.crop_window(4, 4),
            Err(PatternError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn crop_outside_image_is_rejected() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let crop = CropWindow { x: 2, y: 0, width: 4, height: 4 };
        assert!(matches!(
            sample_image(&img, 2, 2, Some(crop)),
            Err(PatternError::InvalidCropWindow(_))
        ));
    }
}
