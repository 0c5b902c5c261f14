use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::ReportView;
use crate::config::CleaningOptions;
use crate::error::{Result, ResultExt};

/// Base name of exported report artifacts.
pub const ARTIFACT_BASE_NAME: &str = "data_cleaning_report";

/// Full report of one session, as printed by `--json` and written by
/// `--emit-report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Dataset that was uploaded
    pub input_file: String,
    /// Collaborator that produced the snapshots
    pub collaborator: String,
    /// Cleaning request, when cleaning ran
    pub options: Option<CleaningOptions>,
    pub report: ReportView,
}

impl ReportDocument {
    pub fn new(
        input_file: impl Into<String>,
        collaborator: impl Into<String>,
        options: Option<CleaningOptions>,
        report: ReportView,
    ) -> Self {
        Self {
            generated_at: Local::now().to_rfc3339(),
            input_file: input_file.into(),
            collaborator: collaborator.into(),
            options,
            report,
        }
    }
}

/// Writes report documents and exported artifacts to an output directory.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(crate::config::DEFAULT_OUTPUT_DIR),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `document` as `<stem>_report.json` and return its path.
    pub fn write_report_to_file(&self, document: &ReportDocument, stem: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).context(format!(
            "Failed to create {}",
            self.output_dir.display()
        ))?;

        let path = self.output_dir.join(format!("{stem}_report.json"));
        let json = serde_json::to_string_pretty(document)?;
        fs::write(&path, json).context(format!("Failed to write {}", path.display()))?;

        info!("Report saved: {}", path.display());
        Ok(path)
    }

    /// Write exported artifact bytes to `path`, or to a timestamped file in
    /// the output directory when no path is given.
    pub fn write_artifact(&self, bytes: &[u8], path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                fs::create_dir_all(&self.output_dir).context(format!(
                    "Failed to create {}",
                    self.output_dir.display()
                ))?;
                self.output_dir.join(artifact_file_name())
            }
        };

        fs::write(&path, bytes).context(format!("Failed to write {}", path.display()))?;
        info!("Report artifact saved: {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// `data_cleaning_report_<YYYYmmddHHMMSS>.pdf`
pub fn artifact_file_name() -> String {
    format!(
        "{ARTIFACT_BASE_NAME}_{}.pdf",
        Local::now().format("%Y%m%d%H%M%S")
    )
}

/// File stem used for report files, taken from the uploaded file name.
pub fn report_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "dataset".to_string())
}
