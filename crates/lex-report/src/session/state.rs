//! Report session state machine.
//!
//! ```text
//!            begin_upload            complete_upload(Ok)
//!   Empty ───────────────► Uploading ───────────────────► Reported
//!     ▲                        │ complete_upload(Err)         │ begin_clean
//!     │                        ▼                              ▼
//!     │                      Empty                         Cleaning ◄──┐
//!     │                                    complete_clean(Ok) │        │ begin_clean
//!     │          reset (from any phase)                       ▼        │
//!     └────────────────────────────────────────────────── Cleaned ─────┘
//! ```
//!
//! A failed clean leaves the phase it started from untouched. Every
//! `begin_*` hands out a ticket stamped with the current generation; `reset`
//! bumps the generation, so completions of requests issued before a reset
//! are discarded instead of resurrecting a cleared session.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::collaborator::UploadOutcome;
use crate::engine::{Grid, OutlierIndex, VisualizationBuckets, partition, project};
use crate::error::{ReportError, Result};
use crate::reporting::ReportView;
use crate::types::Snapshot;

/// Coarse lifecycle phase, derived from the session contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Nothing uploaded.
    Empty,
    /// Upload request in flight.
    Uploading,
    /// Before report available.
    Reported,
    /// Cleaning request in flight.
    Cleaning,
    /// After report available.
    Cleaned,
}

/// What a completion did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result was installed.
    Applied,
    /// The session was reset while the request was in flight.
    Discarded,
}

/// Proof that an upload was started in a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct UploadTicket {
    generation: u64,
}

/// Proof that a cleaning run was started in a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct CleanTicket {
    generation: u64,
}

/// Snapshots of the live dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveReport {
    pub before: Snapshot,
    pub after: Option<Snapshot>,
    pub outliers: OutlierIndex,
}

impl ActiveReport {
    /// Snapshot currently on display: the after snapshot once cleaning ran.
    pub fn active(&self) -> &Snapshot {
        self.after.as_ref().unwrap_or(&self.before)
    }

    pub fn is_cleaned(&self) -> bool {
        self.after.is_some()
    }

    /// Classified grid of the active snapshot.
    pub fn grid(&self) -> Result<Grid> {
        project(self.active(), self.after.as_ref(), &self.outliers)
    }

    /// Chart buckets of the active snapshot.
    pub fn buckets(&self) -> VisualizationBuckets<'_> {
        partition(&self.active().visualizations)
    }
}

/// The one live report session of a controller.
#[derive(Debug, Default)]
pub struct ReportSession {
    generation: u64,
    report: Option<ActiveReport>,
    busy: bool,
    last_error: Option<String>,
}

impl ReportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.report, self.busy) {
            (None, false) => SessionPhase::Empty,
            (None, true) => SessionPhase::Uploading,
            (Some(_), true) => SessionPhase::Cleaning,
            (Some(report), false) if report.is_cleaned() => SessionPhase::Cleaned,
            (Some(_), false) => SessionPhase::Reported,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn report(&self) -> Option<&ActiveReport> {
        self.report.as_ref()
    }

    /// Most recent user-visible error, cleared by the next request.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Remember an error raised outside a request, such as a rejected file.
    pub fn record_error(&mut self, error: &ReportError) {
        self.last_error = Some(error.to_string());
    }

    /// Start an upload. Switching datasets requires a reset first.
    pub fn begin_upload(&mut self) -> Result<UploadTicket> {
        if self.report.is_some() {
            return Err(ReportError::SessionActive);
        }
        if self.busy {
            return Err(ReportError::UploadInProgress);
        }

        self.busy = true;
        self.last_error = None;
        Ok(UploadTicket {
            generation: self.generation,
        })
    }

    /// Finish an upload started with `ticket`.
    ///
    /// On success the before report is installed and the outlier index built.
    /// A failure, or a snapshot that does not pass shape validation, leaves
    /// the session empty and is returned after being recorded.
    pub fn complete_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<UploadOutcome>,
    ) -> Result<Completion> {
        if ticket.generation != self.generation {
            warn!(
                "Discarding upload response from generation {} (current {})",
                ticket.generation, self.generation
            );
            return Ok(Completion::Discarded);
        }

        self.busy = false;
        let outcome = self.keep_error(result.and_then(|outcome| {
            outcome.snapshot.validate()?;
            Ok(outcome)
        }))?;

        let outliers = OutlierIndex::build(&outcome.outliers);
        info!(
            "Upload applied: {} rows, health {:.1}, {} flagged cells",
            outcome.snapshot.stats.total_rows,
            outcome.snapshot.health_score(),
            outliers.len()
        );

        self.report = Some(ActiveReport {
            before: outcome.snapshot,
            after: None,
            outliers,
        });
        Ok(Completion::Applied)
    }

    /// Start a cleaning run. Re-entrant requests are rejected, never queued.
    pub fn begin_clean(&mut self) -> Result<CleanTicket> {
        if self.report.is_none() {
            return Err(ReportError::NoSession);
        }
        if self.busy {
            return Err(ReportError::CleanInProgress);
        }

        self.busy = true;
        self.last_error = None;
        Ok(CleanTicket {
            generation: self.generation,
        })
    }

    /// Finish a cleaning run started with `ticket`.
    ///
    /// On success the new after snapshot replaces any previous one. On
    /// failure only the busy flag and the recorded error change.
    pub fn complete_clean(
        &mut self,
        ticket: CleanTicket,
        result: Result<Snapshot>,
    ) -> Result<Completion> {
        if ticket.generation != self.generation {
            warn!(
                "Discarding clean response from generation {} (current {})",
                ticket.generation, self.generation
            );
            return Ok(Completion::Discarded);
        }

        self.busy = false;
        let after = self.keep_error(result.and_then(|snapshot| {
            snapshot.validate()?;
            Ok(snapshot)
        }))?;

        let report = self.report.as_mut().ok_or(ReportError::NoSession)?;
        info!(
            "Cleaning applied: health {:.1} -> {:.1}",
            report.before.health_score(),
            after.health_score()
        );
        report.after = Some(after);
        Ok(Completion::Applied)
    }

    /// Clear everything and invalidate outstanding tickets.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.report = None;
        self.busy = false;
        self.last_error = None;
    }

    /// Report view of the current state, `None` when nothing is uploaded.
    pub fn view(&self) -> Result<Option<ReportView>> {
        self.report.as_ref().map(ReportView::build).transpose()
    }

    fn keep_error<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.record_error(e);
        }
        result
    }
}
