//! Report output.
//!
//! - [`ReportView`] gathers the health card, the classified grid and the
//!   chart buckets of a live session
//! - [`table`] renders the grid as plain text with change markers
//! - [`ReportGenerator`] writes JSON report documents and exported artifacts
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_report::reporting::{ReportDocument, ReportGenerator, table};
//!
//! let view = controller.view()?.expect("dataset uploaded");
//! print!("{}", table::render_grid(&view.grid, 20));
//!
//! let document = ReportDocument::new("titanic.csv", "DataCleaner HTTP", None, view);
//! ReportGenerator::new("reports").write_report_to_file(&document, "titanic")?;
//! ```

mod generator;
pub mod table;
mod view;

pub use generator::{
    ARTIFACT_BASE_NAME, ReportDocument, ReportGenerator, artifact_file_name, report_stem,
};
pub use view::{ReportView, ViewSide};
