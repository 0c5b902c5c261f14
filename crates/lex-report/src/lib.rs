//! Data Cleaning Report Client
//!
//! Uploads a tabular dataset to a remote cleaning service, shows a "before"
//! data-quality report, requests a cleaning pass and shows the "after" report
//! with cell-level highlighting of what changed.
//!
//! # Overview
//!
//! The cleaning itself (imputation, outlier capping, deduplication) and all
//! statistics run on the service. This crate reconciles what comes back:
//!
//! - **Outlier Index**: membership test over flagged (row, column) cells
//! - **Cell Classification**: `unchanged`, `null`, `outlier` or `changed` per cell
//! - **Grid Projection**: the active preview as an ordered, classified grid
//! - **Chart Buckets**: visualizations split into categorical and numerical
//! - **Session Lifecycle**: upload, clean and reset with stale-response protection
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_report::{CleaningOptions, HttpCollaborator, ImputationMethod, ReportController};
//!
//! let controller = ReportController::new(HttpCollaborator::new()?);
//!
//! controller.upload_path("titanic.csv").await?;
//! let before = controller.view()?.expect("uploaded");
//! println!("Health before: {:.1}", before.health_before);
//!
//! let options = CleaningOptions::builder()
//!     .imputation_method(ImputationMethod::Median)
//!     .build();
//! controller.clean(&options).await?;
//!
//! let after = controller.view()?.expect("cleaned");
//! for row in &after.grid.rows {
//!     for cell in &row.cells {
//!         if cell.class.is_highlighted() {
//!             println!("row {}: {:?}", row.index, cell.class);
//!         }
//!     }
//! }
//!
//! controller.reset().await;
//! ```
//!
//! # Collaborators
//!
//! The service is reached through the [`collaborator::Collaborator`] trait.
//! [`collaborator::HttpCollaborator`] speaks the DataCleaner HTTP API; tests
//! drive the controller with in-memory implementations.
//!
//! # Pure Reconciliation
//!
//! The [`engine`] functions need no session or network and can be used on
//! their own:
//!
//! ```rust
//! use lex_report::engine::{CellClass, CellContext, classify};
//! use lex_report::types::CellValue;
//!
//! let original = CellValue::from("25");
//! let current = CellValue::from("25.0");
//! let class = classify(&CellContext {
//!     after_view: true,
//!     original: Some(&original),
//!     current: &current,
//!     flagged_outlier: false,
//! });
//! assert_eq!(class, CellClass::Changed);
//! ```

pub mod collaborator;
pub mod config;
pub mod engine;
pub mod error;
pub mod reporting;
pub mod session;
pub mod types;

// Re-exports for convenient access
pub use collaborator::{Collaborator, DatasetFile, HttpCollaborator, UploadOutcome};
pub use config::{
    CleaningOptions, CleaningOptionsBuilder, ClientConfig, ClientConfigBuilder,
    ConfigValidationError, ImputationMethod, OutlierMethod,
};
pub use engine::{
    CellClass, CellContext, ChartSet, Grid, GridCell, GridRow, OutlierIndex, VisualizationBuckets,
    classify, partition, project, values_differ,
};
pub use error::{ReportError, Result as ReportResult, ResultExt};
pub use reporting::{ReportDocument, ReportGenerator, ReportView, ViewSide};
pub use session::{ActiveReport, Completion, ReportController, ReportSession, SessionPhase};
pub use types::{
    CellValue, ChartKind, ChartPoint, CleaningSummary, ColumnIssue, DatasetStats,
    OutlierCoordinate, Preview, Row, Snapshot, VisualizationDescriptor,
};
