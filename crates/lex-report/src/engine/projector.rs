//! Projects a snapshot preview into a classified, render-ready grid.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classifier::{CellClass, CellContext, classify};
use super::outliers::OutlierIndex;
use crate::error::Result;
use crate::types::{CellValue, Snapshot};

static MISSING: CellValue = CellValue::Null;

/// One rendered cell. A null value stays [`CellValue::Null`] so renderers can
/// draw a marker instead of the text "null".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub value: CellValue,
    pub class: CellClass,
}

impl GridCell {
    /// Display text, or `None` for the null marker.
    pub fn text(&self) -> Option<std::borrow::Cow<'_, str>> {
        (!self.value.is_null()).then(|| self.value.normalized_text())
    }
}

/// One rendered row, tagged with its position in the full dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    pub index: usize,
    pub cells: Vec<GridCell>,
}

/// Classified preview table in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub columns: Vec<String>,
    pub rows: Vec<GridRow>,
}

impl Grid {
    /// Cell at preview row `row` and the named column.
    pub fn cell(&self, row: usize, column: &str) -> Option<&GridCell> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.cells.get(col)
    }

    /// Number of cells with the given class.
    pub fn count(&self, class: CellClass) -> usize {
        self.rows
            .iter()
            .flat_map(|row| &row.cells)
            .filter(|cell| cell.class == class)
            .count()
    }

    /// All classes, row-major.
    pub fn classes(&self) -> Vec<CellClass> {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter().map(|cell| cell.class))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the classified grid for `active`.
///
/// `after` is the after-cleaning snapshot when one exists; `active` is then
/// that same snapshot. Each displayed row `i` is paired with
/// `after.original_preview.data[i]` by position. The outlier index is only
/// consulted in the before view.
///
/// Fails fast with [`crate::ReportError::DataShape`] when the active preview has no
/// column list or its row indices are misaligned.
pub fn project(
    active: &Snapshot,
    after: Option<&Snapshot>,
    outliers: &OutlierIndex,
) -> Result<Grid> {
    let preview = &active.preview;
    let columns = preview.columns()?;
    preview.check_alignment()?;

    let after_view = after.is_some();
    let original_rows = after
        .and_then(|snapshot| snapshot.original_preview.as_ref())
        .map(|original| original.data.as_slice())
        .unwrap_or_default();

    let mut rows = Vec::with_capacity(preview.data.len());
    for (i, (row, &index)) in preview.data.iter().zip(&preview.indices).enumerate() {
        let original_row = original_rows.get(i);

        let cells = columns
            .iter()
            .map(|column| {
                let current = row.get(column).unwrap_or(&MISSING);
                let original = original_row.map(|o| o.get(column).unwrap_or(&MISSING));
                let class = classify(&CellContext {
                    after_view,
                    original,
                    current,
                    flagged_outlier: outliers.contains(index, column),
                });
                GridCell {
                    value: current.clone(),
                    class,
                }
            })
            .collect();

        rows.push(GridRow { index, cells });
    }

    debug!(
        "Projected {} rows x {} columns ({} view)",
        rows.len(),
        columns.len(),
        if after_view { "after" } else { "before" }
    );

    Ok(Grid {
        columns: columns.to_vec(),
        rows,
    })
}
