//! Custom error types for the report client.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! reconciliation engine, the session controller, and the collaborator
//! transport.
//!
//! Errors are serializable so they can be handed to a frontend (or printed
//! as JSON by the CLI) with a stable `code` next to the human-readable
//! message.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the report client.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The remote collaborator could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote collaborator answered with a non-success status.
    #[error("{message} (status {status})")]
    Collaborator { status: u16, message: String },

    /// A snapshot is missing a field, or its parallel sequences disagree.
    #[error("Malformed snapshot: {0}")]
    DataShape(String),

    /// An operation needs an uploaded dataset but the session is empty.
    #[error("No dataset uploaded")]
    NoSession,

    /// A dataset is already loaded; it must be reset before uploading another.
    #[error("A dataset is already loaded; reset the session first")]
    SessionActive,

    /// An upload is already outstanding.
    #[error("Upload already in progress")]
    UploadInProgress,

    /// A cleaning request is already outstanding.
    #[error("Cleaning already in progress")]
    CleanInProgress,

    /// The file type is not accepted by the upload collaborator.
    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ReportError>,
    },
}

impl ReportError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ReportError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Collaborator { .. } => "COLLABORATOR_ERROR",
            Self::DataShape(_) => "DATA_SHAPE_ERROR",
            Self::NoSession => "NO_SESSION",
            Self::SessionActive => "SESSION_ACTIVE",
            Self::UploadInProgress => "UPLOAD_IN_PROGRESS",
            Self::CleanInProgress => "CLEAN_IN_PROGRESS",
            Self::UnsupportedFile(_) => "UNSUPPORTED_FILE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if the same request can simply be issued again.
    ///
    /// Transport and collaborator failures never touch the session beyond the
    /// busy flag, so retrying is always safe.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Transport(_)
            | Self::Collaborator { .. }
            | Self::NoSession
            | Self::SessionActive
            | Self::UploadInProgress
            | Self::CleanInProgress => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ReportError {
    fn from(err: reqwest::Error) -> Self {
        ReportError::Transport(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ReportError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ReportError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ReportError::Io(e).with_context(context))
    }
}
