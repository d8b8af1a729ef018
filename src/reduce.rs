use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::color::Color;
use crate::grid::{Cell, PatternGrid};
use crate::usage::usage;

/// Limit `grid` to at most `target` distinct stitch colors.
///
/// The `target` most used colors survive (equal counts are ranked by first
/// appearance in row-major order); every other stitch is recolored to its
/// nearest survivor, the earlier survivor winning a distance tie. Empty cells
/// are copied as-is. A `target` of zero, or a grid with no stitches, returns
/// an unchanged copy.
pub fn reduce(grid: &PatternGrid, target: usize) -> PatternGrid {
    if target == 0 {
        return grid.clone();
    }
    let table = usage(grid);
    let survivors: Vec<Color> = table
        .by_frequency()
        .into_iter()
        .take(target)
        .map(|(color, _)| color)
        .collect();
    if survivors.is_empty() {
        return grid.clone();
    }
    debug!(
        from = table.len(),
        to = survivors.len(),
        "reducing pattern colors"
    );
    if survivors.len() == table.len() {
        return grid.clone();
    }

    let remap = |&cell: &Cell| -> Cell { cell.map(|color| nearest_survivor(color, &survivors)) };

    #[cfg(feature = "parallel")]
    let cells: Vec<Cell> = grid.cells().par_iter().map(remap).collect();
    #[cfg(not(feature = "parallel"))]
    let cells: Vec<Cell> = grid.cells().iter().map(remap).collect();

    PatternGrid::from_cells(grid.width(), grid.height(), cells)
}

fn nearest_survivor(color: Color, survivors: &[Color]) -> Color {
    let mut best = survivors[0];
    let mut best_dist = u32::MAX;
    for &s in survivors {
        let d = color.distance_sq(s);
        if d < best_dist {
            best_dist = d;
            best = s;
            // a survivor maps to itself
            if d == 0 {
                break;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> PatternGrid {
        PatternGrid::from_rows(rows).unwrap()
    }

    #[test]
    fn minority_color_folds_into_majority() {
        let g = grid(&[&["#000000", "#000000"], &["#000000", "#C41E3A"]]);
        let r = reduce(&g, 1);
        assert_eq!(r, grid(&[&["#000000", "#000000"], &["#000000", "#000000"]]));
    }

    #[test]
    fn zero_target_is_a_noop() {
        let g = grid(&[&["#000000", "#FFFFFF"]]);
        assert_eq!(reduce(&g, 0), g);
    }

    #[test]
    fn blank_grid_is_returned_unchanged() {
        let g = PatternGrid::blank(3, 3).unwrap();
        assert_eq!(reduce(&g, 2), g);
    }

    #[test]
    fn empty_cells_stay_empty() {
        let g = grid(&[&["", "#000000", "#101010"], &["#000000", "", "#FFFFFF"]]);
        let r = reduce(&g, 1);
        assert_eq!(r, grid(&[&["", "#000000", "#000000"], &["#000000", "", "#000000"]]));
    }

    #[test]
    fn cutoff_ties_keep_the_first_seen_color() {
        // White and black both appear twice; white is seen first.
        let g = grid(&[&["#FFFFFF", "#000000", "#000000", "#FFFFFF"]]);
        assert_eq!(reduce(&g, 1), grid(&[&["#FFFFFF"; 4]]));
    }

    #[test]
    fn remap_picks_nearest_survivor() {
        let g = grid(&[
            &["#FFFFFF", "#FFFFFF", "#000000", "#000000"],
            &["#F0F0F0", "#0A0A0A", "#FFFFFF", "#000000"],
        ]);
        let r = reduce(&g, 2);
        assert_eq!(
            r,
            grid(&[
                &["#FFFFFF", "#FFFFFF", "#000000", "#000000"],
                &["#FFFFFF", "#000000", "#FFFFFF", "#000000"],
            ])
        );
    }

    #[test]
    fn distance_ties_go_to_the_more_used_survivor() {
        // #808080 is equally far from both grays.
        let g = grid(&[&["#7E7E7E", "#7E7E7E", "#7E7E7E", "#828282", "#828282", "#808080"]]);
        assert_eq!(
            reduce(&g, 2),
            grid(&[&["#7E7E7E", "#7E7E7E", "#7E7E7E", "#828282", "#828282", "#7E7E7E"]])
        );

        let g = grid(&[&["#7E7E7E", "#7E7E7E", "#828282", "#828282", "#828282", "#808080"]]);
        assert_eq!(
            reduce(&g, 2),
            grid(&[&["#7E7E7E", "#7E7E7E", "#828282", "#828282", "#828282", "#828282"]])
        );
    }

    #[test]
    fn input_is_not_mutated() {
        let g = grid(&[&["#000000", "#C41E3A", "#000000"]]);
        let before = g.clone();
        let _ = reduce(&g, 1);
        assert_eq!(g, before);
    }
}
