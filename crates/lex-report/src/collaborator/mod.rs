//! Boundary to the remote cleaning service.
//!
//! The report client never cleans or profiles data itself. Everything that
//! produces a [`Snapshot`] lives behind the [`Collaborator`] trait, so the
//! session controller can be driven by the real HTTP service or by an
//! in-memory stand-in.
//!
//! # Implementing a New Collaborator
//!
//! 1. Create a new file in `src/collaborator/`
//! 2. Implement [`Collaborator`] for your struct
//! 3. Export it from this module
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_report::collaborator::{DatasetFile, HttpCollaborator};
//! use lex_report::session::ReportController;
//!
//! let controller = ReportController::new(HttpCollaborator::new()?);
//! controller.upload(DatasetFile::from_path("titanic.csv").await?).await?;
//! ```

mod http;

pub use http::{HttpCollaborator, parse_clean_response, parse_upload_response};

use std::future::Future;
use std::path::Path;

use crate::config::CleaningOptions;
use crate::error::{ReportError, Result, ResultExt};
use crate::types::{OutlierCoordinate, Snapshot};

/// File extensions the cleaning service accepts.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

/// A dataset file ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFile {
    /// File name sent to the service; its extension selects the parser.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DatasetFile {
    /// Wrap in-memory bytes, rejecting unsupported extensions.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        if !is_allowed_file(&name) {
            return Err(ReportError::UnsupportedFile(name));
        }
        Ok(Self { name, bytes })
    }

    /// Read a dataset from disk.
    ///
    /// The extension is checked before the file is opened.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ReportError::UnsupportedFile(path.display().to_string()))?;

        if !is_allowed_file(&name) {
            return Err(ReportError::UnsupportedFile(name));
        }

        let bytes = tokio::fs::read(path)
            .await
            .context(format!("Failed to read {}", path.display()))?;

        Ok(Self { name, bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Check a file name against [`ALLOWED_EXTENSIONS`], ignoring case.
pub fn is_allowed_file(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(stem, ext)| {
        !stem.is_empty() && ALLOWED_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext))
    })
}

/// Result of a successful upload: the before snapshot plus the flagged cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadOutcome {
    pub snapshot: Snapshot,
    pub outliers: Vec<OutlierCoordinate>,
}

/// Remote service that owns the dataset and runs the cleaning.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`, and their futures `Send`, so a
/// controller can be shared across tasks.
///
/// # Error Handling
///
/// Network failures map to [`ReportError::Transport`], non-success answers
/// to [`ReportError::Collaborator`], and bodies that do not decode into the
/// expected shape to [`ReportError::DataShape`].
pub trait Collaborator: Send + Sync {
    /// Upload a dataset and receive its before snapshot.
    fn upload(&self, file: DatasetFile) -> impl Future<Output = Result<UploadOutcome>> + Send;

    /// Run a cleaning pass and receive the after snapshot.
    ///
    /// The returned snapshot carries `original_preview` and `summary`.
    fn clean(&self, options: &CleaningOptions) -> impl Future<Output = Result<Snapshot>> + Send;

    /// Drop the dataset on the service side.
    fn reset(&self) -> impl Future<Output = Result<()>> + Send;

    /// Fetch the rendered report artifact (a PDF on the reference service).
    fn export_report(&self) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Get the collaborator name for logging.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_allowed_extensions() {
        assert!(is_allowed_file("titanic.csv"));
        assert!(is_allowed_file("Sales.XLSX"));
        assert!(is_allowed_file("archive.v2.xls"));
        assert!(!is_allowed_file("notes.txt"));
        assert!(!is_allowed_file("csv"));
        assert!(!is_allowed_file(".csv"));
        assert!(!is_allowed_file("data.csv.gz"));
    }

    #[test]
    fn test_new_rejects_unsupported() {
        let err = DatasetFile::new("report.pdf", vec![1, 2, 3]).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FILE");
        assert!(DatasetFile::new("ok.csv", Vec::new()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_from_path_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "id,age").unwrap();
        writeln!(file, "1,30").unwrap();

        let dataset = DatasetFile::from_path(&path).await.unwrap();
        assert_eq!(dataset.name, "people.csv");
        assert_eq!(dataset.bytes, b"id,age\n1,30\n");
    }

    #[tokio::test]
    async fn test_from_path_checks_extension_before_reading() {
        let err = DatasetFile::from_path("/definitely/not/here.json")
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FILE");
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let err = DatasetFile::from_path("/definitely/not/here.csv")
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(err.to_string().contains("here.csv"));
    }
}
