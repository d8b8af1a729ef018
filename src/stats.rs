//! Derived pattern statistics: thread legend, skein estimates, finished size
//! and stitching time.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::grid::PatternGrid;
use crate::palette::{Palette, PaletteEntry};
use crate::usage::usage;

/// A DMC skein is 8 m of six-strand floss.
const SKEIN_LENGTH_IN: f64 = 315.0;
const STRANDS_PER_SKEIN: u32 = 6;

/// Front diagonals plus the back travel of one full cross, in cell widths.
const CROSS_LENGTH_CELLS: f64 = 2.0 * std::f64::consts::SQRT_2 + 2.0;

/// Fabric and stitching assumptions used for estimates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FabricOptions {
    /// Cells per inch (14 for standard Aida).
    pub fabric_count: u32,
    /// Strands stitched together.
    pub strands: u32,
    pub stitches_per_hour: u32,
    /// Multiplier for thread lost to starts, ends and travel.
    pub waste_factor: f64,
}

impl Default for FabricOptions {
    fn default() -> Self {
        Self {
            fabric_count: 14,
            strands: 2,
            stitches_per_hour: 120,
            waste_factor: 1.5,
        }
    }
}

impl FabricOptions {
    /// Full crosses one skein covers with these settings.
    pub fn stitches_per_skein(&self) -> f64 {
        let fabric_count = self.fabric_count.max(1) as f64;
        let strands = self.strands.clamp(1, STRANDS_PER_SKEIN) as f64;
        let working_thread = SKEIN_LENGTH_IN * STRANDS_PER_SKEIN as f64 / strands;
        let per_stitch = CROSS_LENGTH_CELLS / fabric_count * self.waste_factor.max(1.0);
        working_thread / per_stitch
    }

    pub fn skeins_for(&self, stitches: usize) -> u32 {
        if stitches == 0 {
            return 0;
        }
        (stitches as f64 / self.stitches_per_skein()).ceil().max(1.0) as u32
    }
}

/// One legend row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ThreadUsage {
    #[serde(rename = "hex")]
    pub color: Color,
    /// The catalog thread for this color, if it has one.
    pub thread: Option<PaletteEntry>,
    pub stitches: usize,
    /// Share of stitched cells, 0..=1.
    pub coverage: f64,
    pub skeins: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatternStats {
    pub width: usize,
    pub height: usize,
    pub total_stitches: usize,
    pub empty_cells: usize,
    pub distinct_colors: usize,
    pub finished_width_in: f64,
    pub finished_height_in: f64,
    pub estimated_hours: f64,
    pub total_skeins: u32,
    /// Most used first.
    pub legend: Vec<ThreadUsage>,
}

pub fn pattern_stats(grid: &PatternGrid, palette: &Palette, options: &FabricOptions) -> PatternStats {
    let table = usage(grid);
    let total = table.total();

    let legend: Vec<ThreadUsage> = table
        .by_frequency()
        .into_iter()
        .map(|(color, stitches)| ThreadUsage {
            color,
            thread: palette.find_by_color(color).cloned(),
            stitches,
            coverage: stitches as f64 / total as f64,
            skeins: options.skeins_for(stitches),
        })
        .collect();

    let fabric_count = options.fabric_count.max(1) as f64;
    let estimated_hours = if options.stitches_per_hour == 0 {
        0.0
    } else {
        total as f64 / options.stitches_per_hour as f64
    };

    PatternStats {
        width: grid.width(),
        height: grid.height(),
        total_stitches: total,
        empty_cells: grid.width() * grid.height() - total,
        distinct_colors: table.len(),
        finished_width_in: grid.width() as f64 / fabric_count,
        finished_height_in: grid.height() as f64 / fabric_count,
        estimated_hours,
        total_skeins: legend.iter().map(|t| t.skeins).sum(),
        legend,
    }
}
