//! Membership test over flagged outlier cells.

use std::collections::{HashMap, HashSet};

use crate::types::OutlierCoordinate;

/// Set of (original row index, column name) pairs flagged by the service's
/// pre-cleaning outlier detector.
///
/// Keyed by row, then by column name, so lookups never build a joined string
/// key and column names may contain any character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlierIndex {
    cells: HashMap<usize, HashSet<String>>,
}

impl OutlierIndex {
    /// Build an index from coordinates. Order and duplicates do not matter.
    pub fn build<'a, I>(coordinates: I) -> Self
    where
        I: IntoIterator<Item = &'a OutlierCoordinate>,
    {
        let mut index = Self::default();
        for coord in coordinates {
            index.insert(coord.row, &coord.column);
        }
        index
    }

    fn insert(&mut self, row: usize, column: &str) {
        let columns = self.cells.entry(row).or_default();
        if !columns.contains(column) {
            columns.insert(column.to_string());
        }
    }

    pub fn contains(&self, row: usize, column: &str) -> bool {
        self.cells
            .get(&row)
            .is_some_and(|columns| columns.contains(column))
    }

    /// Number of distinct flagged cells.
    pub fn len(&self) -> usize {
        self.cells.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<OutlierCoordinate> for OutlierIndex {
    fn from_iter<T: IntoIterator<Item = OutlierCoordinate>>(iter: T) -> Self {
        let mut index = Self::default();
        for coord in iter {
            index.cells.entry(coord.row).or_default().insert(coord.column);
        }
        index
    }
}
