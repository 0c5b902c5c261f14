//! Plain-text rendering of a classified grid.
//!
//! Highlighting is carried by markers instead of color so the output stays
//! readable when piped:
//!
//! - `*value` changed by cleaning
//! - `!value` flagged outlier
//! - `<null>` missing value

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::engine::{CellClass, Grid, GridCell};

/// Text drawn for a null cell.
pub const NULL_MARKER: &str = "<null>";

/// Longest cell text before it is cut with `...`.
pub const MAX_CELL_WIDTH: usize = 24;

/// Legend line explaining the cell markers.
pub fn legend() -> String {
    format!("legend: *changed  !outlier  {NULL_MARKER} missing")
}

/// Render `grid` as an aligned table, showing at most `max_rows` rows.
///
/// The first column is the row's position in the full dataset.
pub fn render_grid(grid: &Grid, max_rows: usize) -> String {
    let mut headers = Vec::with_capacity(grid.columns.len() + 1);
    headers.push("#".to_string());
    headers.extend(grid.columns.iter().cloned());

    let rows: Vec<Vec<String>> = grid
        .rows
        .iter()
        .take(max_rows)
        .map(|row| {
            let mut line = Vec::with_capacity(row.cells.len() + 1);
            line.push(row.index.to_string());
            line.extend(row.cells.iter().map(cell_text));
            line
        })
        .collect();

    let mut output = render_table(&headers, &rows);
    let hidden = grid.rows.len().saturating_sub(max_rows);
    if hidden > 0 {
        let _ = writeln!(output, "... {hidden} more rows");
    }
    output
}

/// Display text of one cell, with its class marker.
pub fn cell_text(cell: &GridCell) -> String {
    let text = match cell.text() {
        Some(text) => truncate(&sanitize_cell(&text)).into_owned(),
        None => NULL_MARKER.to_string(),
    };
    match cell.class {
        CellClass::Changed => format!("*{text}"),
        CellClass::Outlier => format!("!{text}"),
        CellClass::Null | CellClass::Unchanged => text,
    }
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat((*w).max(1))).collect();
    let _ = writeln!(output, "{}", format_row(&separator, &widths));

    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let padding = width.saturating_sub(display_width(value));
            format!("{value}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.truncate(line.trim_end().len());
    line
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn truncate(value: &str) -> Cow<'_, str> {
    if display_width(value) <= MAX_CELL_WIDTH {
        return Cow::Borrowed(value);
    }
    let cut: String = value.chars().take(MAX_CELL_WIDTH - 3).collect();
    Cow::Owned(format!("{cut}..."))
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
