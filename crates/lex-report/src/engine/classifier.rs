//! Per-cell display classification.

use serde::{Deserialize, Serialize};

use crate::types::CellValue;

/// Display category of one rendered cell. Exactly one applies per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellClass {
    Unchanged,
    Null,
    Outlier,
    Changed,
}

impl CellClass {
    /// Returns a human-readable name for the class.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Null => "missing",
            Self::Outlier => "outlier",
            Self::Changed => "changed by cleaning",
        }
    }

    /// Whether the cell is highlighted at all.
    pub fn is_highlighted(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Everything the classifier needs to know about one cell.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    /// An after-cleaning snapshot is being displayed.
    pub after_view: bool,
    /// Pre-cleaning value at the same row position, when that row exists.
    pub original: Option<&'a CellValue>,
    /// Value being displayed.
    pub current: &'a CellValue,
    /// The cell's (original row, column) was flagged as an outlier.
    pub flagged_outlier: bool,
}

/// Classify a single cell.
///
/// First match wins:
///
/// 1. After-view with an original value: `Changed` if the values differ,
///    otherwise only the null check below applies. Outlier flags are stale
///    once cleaning has run and are never consulted here.
/// 2. Before-view and flagged: `Outlier` (even when the value is null).
/// 3. Null value: `Null`.
/// 4. Otherwise `Unchanged`.
pub fn classify(ctx: &CellContext<'_>) -> CellClass {
    if ctx.after_view {
        if let Some(original) = ctx.original
            && values_differ(original, ctx.current)
        {
            return CellClass::Changed;
        }
    } else if ctx.flagged_outlier {
        return CellClass::Outlier;
    }

    if ctx.current.is_null() {
        CellClass::Null
    } else {
        CellClass::Unchanged
    }
}

/// Compare two values by their normalized text.
///
/// Null reads as `""`; numbers, booleans and strings compare by their text
/// form, so `"3"` and `"3.0"` differ while the string `"3"` and the number
/// `3` do not.
pub fn values_differ(a: &CellValue, b: &CellValue) -> bool {
    a.normalized_text() != b.normalized_text()
}
