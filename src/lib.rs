//! Turn photographs into cross-stitch patterns.
//!
//! A picture is sampled down to one color per cell, every sample is snapped to
//! the nearest embroidery thread, and the resulting grid can be reduced to fewer
//! colors, tallied, estimated and rendered. The same operations are exported to
//! JavaScript through `wasm-bindgen` for the browser editor.

use js_sys::{Array, Object, Reflect, Uint8Array};
use tracing::debug;
use wasm_bindgen::prelude::*;

pub mod color;
pub mod error;
pub mod grid;
pub mod palette;
pub mod quantize;
pub mod reduce;
pub mod render;
pub mod sample;
pub mod stats;
pub mod usage;

pub use color::{Color, distance};
pub use error::{PatternError, Result};
pub use grid::{Cell, PatternGrid, Section};
pub use palette::{Palette, PaletteEntry};
pub use quantize::{build_grid, build_grid_from_rgba};
pub use reduce::reduce;
pub use render::{RenderOptions, render_image, render_png};
pub use sample::{CropWindow, ImportOptions, sample_image};
pub use stats::{FabricOptions, PatternStats, ThreadUsage, pattern_stats};
pub use usage::{UsageTable, usage};

/// Decode an image, crop and sample it to the requested grid size, snap every
/// cell to `palette`, and optionally reduce to `options.max_colors`.
pub fn pattern_from_image_bytes(input: &[u8], options: &ImportOptions, palette: &Palette) -> Result<PatternGrid> {
    let img = image::load_from_memory(input)?;
    let crop = options.crop_window(img.width(), img.height())?;
    let samples = sample_image(&img, options.width, options.height, Some(crop))?;
    let grid = build_grid(&samples, options.width, options.height, palette)?;
    debug!(colors = usage(&grid).len(), "imported pattern");
    Ok(match options.max_colors {
        Some(k) => reduce(&grid, k),
        None => grid,
    })
}

// ------------------------------------------------------------
// JavaScript bindings
// ------------------------------------------------------------

fn js_err(e: PatternError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn palette_from_js(palette: Option<Array>) -> std::result::Result<Option<Palette>, JsValue> {
    let Some(js_palette) = palette else {
        return Ok(None);
    };
    let mut hex = Vec::new();
    for val in js_palette.iter() {
        let s = val
            .as_string()
            .ok_or_else(|| JsValue::from_str("Palette values must be strings"))?;
        hex.push(s);
    }
    Palette::from_hex_list(&hex).map(Some).map_err(js_err)
}

/// `string[][]` -> grid, with the same validation as the JSON format.
fn grid_from_js(grid: &Array) -> std::result::Result<PatternGrid, JsValue> {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(grid.length() as usize);
    for row in grid.iter() {
        if !Array::is_array(&row) {
            return Err(JsValue::from_str("Grid rows must be arrays"));
        }
        let cells = Array::from(&row)
            .iter()
            .map(|cell| {
                cell.as_string()
                    .ok_or_else(|| JsValue::from_str("Grid cells must be strings"))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.push(cells);
    }
    PatternGrid::from_rows(&rows).map_err(js_err)
}

fn grid_to_js(grid: &PatternGrid) -> Array {
    let out = Array::new();
    for row in grid.to_rows() {
        let js_row = Array::new();
        for cell in row {
            js_row.push(&JsValue::from_str(&cell));
        }
        out.push(&js_row);
    }
    out
}

fn usage_to_js(table: &UsageTable) -> std::result::Result<Object, JsValue> {
    let out = Object::new();
    for (color, count) in table.iter() {
        Reflect::set(&out, &JsValue::from_str(&color.to_hex()), &JsValue::from_f64(count as f64))?;
    }
    Ok(out)
}

/// Quantize canvas `ImageData` bytes (already cropped to `width` x `height`)
/// to the DMC catalog, or to `palette` if one is given as hex strings.
#[wasm_bindgen]
pub fn build_pattern(
    rgba: Vec<u8>,
    width: u32,
    height: u32,
    palette: Option<Array>,
) -> std::result::Result<Array, JsValue> {
    let custom = palette_from_js(palette)?;
    let palette = custom.as_ref().unwrap_or_else(|| Palette::dmc());
    let grid = build_grid_from_rgba(&rgba, width as usize, height as usize, palette).map_err(js_err)?;
    Ok(grid_to_js(&grid))
}

/// Decode an encoded image and turn it into a `width` x `height` pattern.
///
/// Returns `{ grid, usage }`.
#[wasm_bindgen]
pub fn import_image(input: Vec<u8>, width: u32, height: u32) -> std::result::Result<Object, JsValue> {
    let options = ImportOptions {
        width: width as usize,
        height: height as usize,
        ..ImportOptions::default()
    };
    let grid = pattern_from_image_bytes(&input, &options, Palette::dmc()).map_err(js_err)?;

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("grid"), &grid_to_js(&grid))?;
    let usage_obj = usage_to_js(&usage(&grid))?;
    Reflect::set(&result, &JsValue::from_str("usage"), &usage_obj)?;
    Ok(result)
}

#[wasm_bindgen]
pub fn color_usage(grid: Array) -> std::result::Result<Object, JsValue> {
    let grid = grid_from_js(&grid)?;
    usage_to_js(&usage(&grid))
}

/// JS passes the target as a signed number; zero and below mean "leave as is".
fn target_from_js(target_count: i32) -> Option<usize> {
    usize::try_from(target_count).ok().filter(|&k| k > 0)
}

/// Keep the `target_count` most used colors. Zero or negative is a no-op.
#[wasm_bindgen]
pub fn reduce_colors(grid: Array, target_count: i32) -> std::result::Result<Array, JsValue> {
    let parsed = grid_from_js(&grid)?;
    match target_from_js(target_count) {
        Some(k) => Ok(grid_to_js(&reduce(&parsed, k))),
        None => Ok(grid),
    }
}

/// Statistics as a JSON string. `options_json` overrides [`FabricOptions`] fields.
#[wasm_bindgen]
pub fn pattern_stats_json(grid: Array, options_json: Option<String>) -> std::result::Result<String, JsValue> {
    let grid = grid_from_js(&grid)?;
    let options: FabricOptions = match options_json {
        Some(json) => serde_json::from_str(&json).map_err(|e| js_err(e.into()))?,
        None => FabricOptions::default(),
    };
    let stats = pattern_stats(&grid, Palette::dmc(), &options);
    serde_json::to_string(&stats).map_err(|e| js_err(e.into()))
}

#[wasm_bindgen]
pub fn render_pattern_png(grid: Array, cell_size: u32, show_grid: bool) -> std::result::Result<Uint8Array, JsValue> {
    let grid = grid_from_js(&grid)?;
    let png = render_png(&grid, &RenderOptions { cell_size, show_grid }).map_err(js_err)?;
    Ok(Uint8Array::from(png.as_slice()))
}

/// The built-in catalog as `{ name, code, hex }` objects.
#[wasm_bindgen]
pub fn dmc_palette() -> std::result::Result<Array, JsValue> {
    let out = Array::new();
    for entry in Palette::dmc().entries() {
        let obj = Object::new();
        Reflect::set(&obj, &JsValue::from_str("name"), &JsValue::from_str(&entry.name))?;
        Reflect::set(&obj, &JsValue::from_str("code"), &JsValue::from_str(&entry.code))?;
        Reflect::set(&obj, &JsValue::from_str("hex"), &JsValue::from_str(&entry.color.to_hex()))?;
        out.push(&obj);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_js_targets_leave_the_grid_alone() {
        assert_eq!(target_from_js(-1), None);
        assert_eq!(target_from_js(i32::MIN), None);
        assert_eq!(target_from_js(0), None);
        assert_eq!(target_from_js(3), Some(3));

        let grid = PatternGrid::from_rows(&[vec!["#000000", "#C41E3A", ""]]).unwrap();
        let reduced = match target_from_js(-1) {
            Some(k) => reduce(&grid, k),
            None => grid.clone(),
        };
        assert_eq!(reduced, grid);
    }
}
