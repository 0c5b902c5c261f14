use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::engine::{CellClass, ChartSet, Grid};
use crate::error::Result;
use crate::session::ActiveReport;
use crate::types::{CleaningSummary, ColumnIssue, DatasetStats};

/// Which snapshot the grid and charts were built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewSide {
    Before,
    After,
}

/// Everything a front end needs to draw the report of the live session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportView {
    pub showing: ViewSide,

    // Health card
    pub health_before: f64,
    pub health_after: Option<f64>,
    pub stats_before: DatasetStats,
    pub stats_after: Option<DatasetStats>,
    pub summary: Option<CleaningSummary>,

    // Per-column issues found at upload
    pub missing_info: BTreeMap<String, ColumnIssue>,
    pub outliers_info: BTreeMap<String, ColumnIssue>,

    // Table and charts of the active snapshot
    pub grid: Grid,
    pub charts: ChartSet,
    /// Descriptors skipped because their chart kind is not drawn.
    pub dropped_charts: usize,
}

impl ReportView {
    /// Build the view of `report`, showing the after snapshot once it exists.
    pub fn build(report: &ActiveReport) -> Result<Self> {
        let grid = report.grid()?;
        let buckets = report.buckets();
        let dropped_charts = buckets.dropped;
        let after = report.after.as_ref();

        Ok(Self {
            showing: if after.is_some() {
                ViewSide::After
            } else {
                ViewSide::Before
            },
            health_before: report.before.health_score(),
            health_after: after.map(|s| s.health_score()),
            stats_before: report.before.stats.clone(),
            stats_after: after.map(|s| s.stats.clone()),
            summary: after.and_then(|s| s.summary),
            missing_info: report.before.missing_info.clone(),
            outliers_info: report.before.outliers_info.clone(),
            grid,
            charts: buckets.into_owned(),
            dropped_charts,
        })
    }

    /// Health score change from cleaning, when cleaning ran.
    pub fn health_delta(&self) -> Option<f64> {
        self.health_after.map(|after| after - self.health_before)
    }

    /// Number of grid cells per class, in display precedence order.
    pub fn class_counts(&self) -> Vec<(CellClass, usize)> {
        [
            CellClass::Changed,
            CellClass::Outlier,
            CellClass::Null,
            CellClass::Unchanged,
        ]
        .into_iter()
        .map(|class| (class, self.grid.count(class)))
        .collect()
    }
}
