//! Async orchestration of the report session.
//!
//! The controller owns one [`ReportSession`] behind a `parking_lot::RwLock`
//! and one [`Collaborator`]. Each operation takes the lock only to begin or
//! complete a request; the lock is never held across a network round-trip.

use std::path::Path;

use parking_lot::RwLock;
use tracing::{info, warn};

use super::state::{Completion, ReportSession, SessionPhase};
use crate::collaborator::{Collaborator, DatasetFile, HttpCollaborator};
use crate::config::CleaningOptions;
use crate::error::{ReportError, Result};
use crate::reporting::ReportView;

/// Drives one report session against a collaborator.
///
/// # Example
///
/// ```rust,ignore
/// use lex_report::collaborator::HttpCollaborator;
/// use lex_report::config::CleaningOptions;
/// use lex_report::session::ReportController;
///
/// let controller = ReportController::new(HttpCollaborator::new()?);
/// controller.upload_path("titanic.csv").await?;
/// controller.clean(&CleaningOptions::default()).await?;
/// let view = controller.view()?.expect("report after upload");
/// println!("health {:.1}", view.health_after.unwrap_or(view.health_before));
/// controller.reset().await;
/// ```
pub struct ReportController<C> {
    collaborator: C,
    session: RwLock<ReportSession>,
}

static_assertions::assert_impl_all!(ReportController<HttpCollaborator>: Send, Sync);

impl<C: Collaborator> ReportController<C> {
    pub fn new(collaborator: C) -> Self {
        Self {
            collaborator,
            session: RwLock::new(ReportSession::new()),
        }
    }

    pub fn collaborator(&self) -> &C {
        &self.collaborator
    }

    /// Upload a dataset and install its before report.
    pub async fn upload(&self, file: DatasetFile) -> Result<Completion> {
        let ticket = self.session.write().begin_upload()?;
        info!(
            "Uploading {} ({} bytes) via {}",
            file.name,
            file.len(),
            self.collaborator.name()
        );

        let result = self.collaborator.upload(file).await;
        self.session.write().complete_upload(ticket, result)
    }

    /// Read a dataset from disk and upload it.
    ///
    /// Unsupported extensions are rejected before any request is made.
    pub async fn upload_path(&self, path: impl AsRef<Path>) -> Result<Completion> {
        let file = match DatasetFile::from_path(path).await {
            Ok(file) => file,
            Err(e) => {
                self.session.write().record_error(&e);
                return Err(e);
            }
        };
        self.upload(file).await
    }

    /// Run a cleaning pass and install the after report.
    pub async fn clean(&self, options: &CleaningOptions) -> Result<Completion> {
        let ticket = self.session.write().begin_clean()?;
        info!(
            "Cleaning with imputation={:?}, outliers={:?}, remove_duplicates={}",
            options.imputation_method, options.outlier_method, options.remove_duplicates
        );

        let result = self.collaborator.clean(options).await;
        self.session.write().complete_clean(ticket, result)
    }

    /// Drop the dataset locally and on the service.
    ///
    /// The service is notified first. A failed notification is logged and the
    /// local session is cleared regardless.
    pub async fn reset(&self) {
        if let Err(e) = self.collaborator.reset().await {
            warn!("{} reset failed: {}", self.collaborator.name(), e);
        }
        self.session.write().reset();
        info!("Session reset");
    }

    /// Fetch the rendered report artifact for the live dataset.
    pub async fn export_report(&self) -> Result<Vec<u8>> {
        if self.session.read().report().is_none() {
            return Err(ReportError::NoSession);
        }
        self.collaborator.export_report().await
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.read().phase()
    }

    pub fn is_busy(&self) -> bool {
        self.session.read().is_busy()
    }

    pub fn last_error(&self) -> Option<String> {
        self.session.read().last_error().map(str::to_string)
    }

    /// Report view of the current state, `None` when nothing is uploaded.
    pub fn view(&self) -> Result<Option<ReportView>> {
        self.session.read().view()
    }
}
