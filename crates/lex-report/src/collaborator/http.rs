//! HTTP collaborator for the DataCleaner service.
//!
//! Speaks the service's JSON wire format:
//!
//! | Operation | Request | Success body |
//! |-----------|---------|--------------|
//! | upload | `POST /upload`, multipart field `file` | before snapshot + `outlier_indices` |
//! | clean | `POST /clean`, camelCase options | after snapshot + `summary` |
//! | reset | `POST /reset` | `{message}` |
//! | export | `GET /download/report` | PDF bytes |
//!
//! Failures carry `{"error": "..."}`; when the body has none, a fixed
//! per-operation message is used instead.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Collaborator, DatasetFile, UploadOutcome};
use crate::config::{CleaningOptions, ClientConfig};
use crate::error::{ReportError, Result};
use crate::types::{
    CleaningSummary, ColumnIssue, DatasetStats, OutlierCoordinate, Preview, Snapshot,
    VisualizationDescriptor,
};

const UPLOAD_FAILED: &str = "Upload failed";
const CLEAN_FAILED: &str = "Cleaning failed";
const RESET_FAILED: &str = "Reset failed";
const EXPORT_FAILED: &str = "Report export failed";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    stats: DatasetStats,
    #[serde(default)]
    missing_info: BTreeMap<String, ColumnIssue>,
    #[serde(default)]
    outliers_info: BTreeMap<String, ColumnIssue>,
    preview: Preview,
    #[serde(default)]
    visualizations: Vec<VisualizationDescriptor>,
    #[serde(default)]
    outlier_indices: Vec<OutlierCoordinate>,
}

impl From<UploadResponse> for UploadOutcome {
    fn from(body: UploadResponse) -> Self {
        UploadOutcome {
            snapshot: Snapshot {
                preview: body.preview,
                stats: body.stats,
                visualizations: body.visualizations,
                missing_info: body.missing_info,
                outliers_info: body.outliers_info,
                original_preview: None,
                summary: None,
            },
            outliers: body.outlier_indices,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CleanResponse {
    #[serde(default)]
    summary: CleaningSummary,
    // `stats_before` repeats the upload's stats and is ignored.
    stats_after: DatasetStats,
    preview: Preview,
    original_preview: Preview,
    #[serde(default)]
    visualizations: Vec<VisualizationDescriptor>,
}

impl From<CleanResponse> for Snapshot {
    fn from(body: CleanResponse) -> Self {
        Snapshot {
            preview: body.preview,
            stats: body.stats_after,
            visualizations: body.visualizations,
            missing_info: BTreeMap::new(),
            outliers_info: BTreeMap::new(),
            original_preview: Some(body.original_preview),
            summary: Some(body.summary),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Pick the service's error message out of a failure body.
fn error_message(body: &[u8], fallback: &str) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| ReportError::DataShape(format!("{what} response: {e}")))
}

/// Decode a successful `/upload` body.
pub fn parse_upload_response(body: &[u8]) -> Result<UploadOutcome> {
    decode::<UploadResponse>(body, "upload").map(UploadOutcome::from)
}

/// Decode a successful `/clean` body into the after snapshot.
pub fn parse_clean_response(body: &[u8]) -> Result<Snapshot> {
    decode::<CleanResponse>(body, "clean").map(Snapshot::from)
}

/// Collaborator backed by the DataCleaner HTTP service.
///
/// # Example
///
/// ```rust,ignore
/// use lex_report::collaborator::HttpCollaborator;
/// use lex_report::config::ClientConfig;
///
/// // Defaults: http://localhost:5000, 120 s timeout
/// let collaborator = HttpCollaborator::new()?;
///
/// let config = ClientConfig::builder()
///     .base_url("http://cleaner.internal:8080")
///     .build()?;
/// let collaborator = HttpCollaborator::with_config(config)?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpCollaborator {
    config: ClientConfig,
    client: Client,
}

impl HttpCollaborator {
    /// Create a collaborator with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a collaborator with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidConfig`] for an invalid configuration,
    /// or a transport error if the HTTP client cannot be created.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ReportError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Read the whole body, turning non-success statuses into errors.
    async fn read_body(response: Response, fallback: &str) -> Result<Vec<u8>> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(ReportError::Collaborator {
                status: status.as_u16(),
                message: error_message(&body, fallback),
            });
        }

        Ok(body.to_vec())
    }
}

impl Collaborator for HttpCollaborator {
    async fn upload(&self, file: DatasetFile) -> Result<UploadOutcome> {
        let url = self.config.endpoint("/upload");
        debug!("Uploading {} ({} bytes) to {}", file.name, file.len(), url);

        let part = Part::bytes(file.bytes).file_name(file.name);
        let form = Form::new().part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        let body = Self::read_body(response, UPLOAD_FAILED).await?;

        parse_upload_response(&body)
    }

    async fn clean(&self, options: &CleaningOptions) -> Result<Snapshot> {
        let url = self.config.endpoint("/clean");
        debug!("Requesting cleaning {:?} from {}", options, url);

        let response = self.client.post(&url).json(options).send().await?;
        let body = Self::read_body(response, CLEAN_FAILED).await?;

        parse_clean_response(&body)
    }

    async fn reset(&self) -> Result<()> {
        let url = self.config.endpoint("/reset");
        let response = self.client.post(&url).send().await?;
        Self::read_body(response, RESET_FAILED).await?;
        Ok(())
    }

    async fn export_report(&self) -> Result<Vec<u8>> {
        let url = self.config.endpoint("/download/report");
        let response = self.client.get(&url).send().await?;
        let body = Self::read_body(response, EXPORT_FAILED).await?;
        debug!("Downloaded report artifact ({} bytes)", body.len());
        Ok(body)
    }

    fn name(&self) -> &str {
        "DataCleaner HTTP"
    }
}

// ============================================================================
// Tests
// ============================================================================
