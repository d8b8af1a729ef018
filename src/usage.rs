use std::collections::HashMap;

use crate::color::Color;
use crate::grid::PatternGrid;

/// Stitch counts per color, remembering the order colors were first seen.
///
/// Only colors that occur are present; every count is at least 1. Equality
/// compares counts per color and ignores the order colors were seen in.
#[derive(Clone, Debug, Default)]
pub struct UsageTable {
    counts: Vec<(Color, usize)>,
    index: HashMap<Color, usize>,
}

impl UsageTable {
    fn bump(&mut self, color: Color) {
        match self.index.get(&color) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(color, self.counts.len());
                self.counts.push((color, 1));
            }
        }
    }

    pub fn get(&self, color: Color) -> Option<usize> {
        self.index.get(&color).map(|&i| self.counts[i].1)
    }

    pub fn contains(&self, color: Color) -> bool {
        self.index.contains_key(&color)
    }

    /// Number of distinct colors.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the number of stitched cells.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|&(_, n)| n).sum()
    }

    /// Entries in first-seen (row-major) order.
    pub fn iter(&self) -> impl Iterator<Item = (Color, usize)> + '_ {
        self.counts.iter().copied()
    }

    /// Entries by count, most used first. Equal counts keep first-seen order.
    pub fn by_frequency(&self) -> Vec<(Color, usize)> {
        let mut sorted = self.counts.clone();
        // stable
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}

impl PartialEq for UsageTable {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(color, n)| other.get(color) == Some(n))
    }
}

impl Eq for UsageTable {}

/// Tally the non-empty cells of `grid`. Empty cells are never keys.
pub fn usage(grid: &PatternGrid) -> UsageTable {
    let mut table = UsageTable::default();
    for color in grid.cells().iter().flatten() {
        table.bump(*color);
    }
    table
}
