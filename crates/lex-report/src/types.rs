//! Snapshot data model shared by the engine, the session and the transport.
//!
//! Everything in here is produced by the remote cleaning service and consumed
//! as already-typed data. Field names follow the service's JSON.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::error::{ReportError, Result};

/// A single scalar cell value.
///
/// Deserialized untagged, so JSON `null`, booleans, numbers and strings map
/// onto the matching variant directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text form used for change detection and display.
    ///
    /// Null becomes the empty string, so null and `""` read the same. Integral
    /// floats drop their fraction (`25.0` reads as `25`), the way the browser
    /// frontend printed numbers; strings are never reinterpreted, so `"25"`
    /// and `"25.0"` stay distinct.
    pub fn normalized_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Bool(true) => Cow::Borrowed("true"),
            CellValue::Bool(false) => Cow::Borrowed("false"),
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
            CellValue::Number(n) => Cow::Owned(format_number(n)),
        }
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value.into())
    }
}

impl From<f64> for CellValue {
    /// Non-finite floats have no JSON form and become null.
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(CellValue::Number)
            .unwrap_or(CellValue::Null)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// One preview row, keyed by column name. Column order lives in
/// [`Preview::columns`], not here.
pub type Row = BTreeMap<String, CellValue>;

/// Row-major preview window of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    /// Display order of the columns. The diff-only `original_preview` sent
    /// after cleaning omits it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    /// Rows in display order.
    pub data: Vec<Row>,
    /// Position of each row in the full dataset, parallel to `data`.
    pub indices: Vec<usize>,
}

impl Preview {
    /// Column display order, or a shape error when the preview has none.
    pub fn columns(&self) -> Result<&[String]> {
        self.columns
            .as_deref()
            .ok_or_else(|| ReportError::DataShape("preview has no column list".to_string()))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check that `data` and `indices` describe the same rows.
    pub fn check_alignment(&self) -> Result<()> {
        if self.data.len() != self.indices.len() {
            return Err(ReportError::DataShape(format!(
                "preview has {} rows but {} row indices",
                self.data.len(),
                self.indices.len()
            )));
        }
        Ok(())
    }
}

/// Aggregate quality statistics computed by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    #[serde(default)]
    pub total_rows: usize,
    #[serde(default)]
    pub total_columns: usize,
    #[serde(default)]
    pub missing_values: usize,
    #[serde(default)]
    pub duplicate_rows: usize,
    /// Quality metric between 0 and 100.
    pub health_score: f64,
}

/// Per-column issue count (`missing_info` / `outliers_info` entries).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnIssue {
    pub count: usize,
}

/// What a cleaning run changed, as reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningSummary {
    #[serde(default)]
    pub rows_removed: i64,
    #[serde(default)]
    pub missing_fixed: i64,
    #[serde(default)]
    pub duplicates_fixed: i64,
}

/// Declared chart kind of a visualization descriptor.
///
/// Unknown tags deserialize to [`ChartKind::Unsupported`] instead of failing,
/// so newer services can add chart types without breaking older clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Scatter,
    #[serde(other)]
    Unsupported,
}

/// A single plotted point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartPoint {
    /// Bar chart entry: category label and its count.
    Category { name: String, value: f64 },
    /// Scatter entry: row index against value.
    Point { x: f64, y: f64 },
    /// Anything else is carried through untouched.
    Other(serde_json::Value),
}

/// Chart-ready summary of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationDescriptor {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub column: String,
    #[serde(default)]
    pub data: Vec<ChartPoint>,
}

/// A flagged anomalous cell: (original row index, column name).
///
/// On the wire this is a two-element array, `[12, "age"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, String)", into = "(usize, String)")]
pub struct OutlierCoordinate {
    pub row: usize,
    pub column: String,
}

impl OutlierCoordinate {
    pub fn new(row: usize, column: impl Into<String>) -> Self {
        Self {
            row,
            column: column.into(),
        }
    }
}

impl From<(usize, String)> for OutlierCoordinate {
    fn from((row, column): (usize, String)) -> Self {
        Self { row, column }
    }
}

impl From<OutlierCoordinate> for (usize, String) {
    fn from(coord: OutlierCoordinate) -> Self {
        (coord.row, coord.column)
    }
}

/// Immutable point-in-time view of the dataset produced by the service.
///
/// The before snapshot comes from an upload, the after snapshot from a
/// cleaning run; only the latter carries `original_preview` and `summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub preview: Preview,
    pub stats: DatasetStats,
    #[serde(default)]
    pub visualizations: Vec<VisualizationDescriptor>,
    #[serde(default)]
    pub missing_info: BTreeMap<String, ColumnIssue>,
    #[serde(default)]
    pub outliers_info: BTreeMap<String, ColumnIssue>,
    /// Pre-cleaning values at the same row positions as `preview`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_preview: Option<Preview>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<CleaningSummary>,
}

impl Snapshot {
    /// Check the shape invariants the projector relies on.
    ///
    /// The displayed preview needs a column list and aligned indices; the
    /// diff-only original preview only needs aligned indices.
    pub fn validate(&self) -> Result<()> {
        self.preview.columns()?;
        self.preview.check_alignment()?;
        if let Some(original) = &self.original_preview {
            original.check_alignment().map_err(|e| {
                ReportError::DataShape(format!("original preview: {e}"))
            })?;
        }
        Ok(())
    }

    pub fn health_score(&self) -> f64 {
        self.stats.health_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_value_untagged() {
        let row: Row = serde_json::from_value(json!({
            "a": null, "b": true, "c": 3, "d": 2.5, "e": "x"
        }))
        .unwrap();

        assert_eq!(row["a"], CellValue::Null);
        assert_eq!(row["b"], CellValue::Bool(true));
        assert_eq!(row["c"], CellValue::from(3_i64));
        assert_eq!(row["d"], CellValue::from(2.5));
        assert_eq!(row["e"], CellValue::from("x"));
    }

    #[test]
    fn test_normalized_text() {
        assert_eq!(CellValue::Null.normalized_text(), "");
        assert_eq!(CellValue::Bool(false).normalized_text(), "false");
        assert_eq!(CellValue::from(42_i64).normalized_text(), "42");
        assert_eq!(CellValue::from(25.0).normalized_text(), "25");
        assert_eq!(CellValue::from(-0.0).normalized_text(), "0");
        assert_eq!(CellValue::from(2.5).normalized_text(), "2.5");
        assert_eq!(CellValue::from("25.0").normalized_text(), "25.0");
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert!(CellValue::from(f64::NAN).is_null());
    }

    #[test]
    fn test_outlier_coordinate_wire_format() {
        let coords: Vec<OutlierCoordinate> =
            serde_json::from_value(json!([[5, "age"], [7, "fare"]])).unwrap();
        assert_eq!(coords[0], OutlierCoordinate::new(5, "age"));
        assert_eq!(coords[1], OutlierCoordinate::new(7, "fare"));

        let back = serde_json::to_value(&coords[0]).unwrap();
        assert_eq!(back, json!([5, "age"]));
    }

    #[test]
    fn test_unknown_chart_kind() {
        let viz: VisualizationDescriptor = serde_json::from_value(json!({
            "type": "heatmap", "column": "grid", "data": []
        }))
        .unwrap();
        assert_eq!(viz.kind, ChartKind::Unsupported);
    }

    #[test]
    fn test_chart_points() {
        let viz: VisualizationDescriptor = serde_json::from_value(json!({
            "type": "bar",
            "column": "city",
            "data": [{"name": "Oslo", "value": 4}, {"x": 1, "y": 2.5}]
        }))
        .unwrap();
        assert_eq!(
            viz.data[0],
            ChartPoint::Category {
                name: "Oslo".to_string(),
                value: 4.0
            }
        );
        assert_eq!(viz.data[1], ChartPoint::Point { x: 1.0, y: 2.5 });
    }

    #[test]
    fn test_validate_missing_columns() {
        let snapshot = Snapshot::default();
        let err = snapshot.validate().unwrap_err();
        assert_eq!(err.error_code(), "DATA_SHAPE_ERROR");
    }

    #[test]
    fn test_validate_misaligned_indices() {
        let snapshot = Snapshot {
            preview: Preview {
                columns: Some(vec!["id".to_string()]),
                data: vec![Row::new(), Row::new()],
                indices: vec![0],
            },
            ..Snapshot::default()
        };
        let err = snapshot.validate().unwrap_err();
        assert!(err.to_string().contains("2 rows but 1 row indices"));
    }
}
