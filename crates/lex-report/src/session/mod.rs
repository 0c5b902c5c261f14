//! Report session lifecycle.
//!
//! - [`ReportSession`] - synchronous state machine holding the before and
//!   after snapshots, the outlier index, the busy flag and the last error
//! - [`ReportController`] - async driver pairing a session with a
//!   [`Collaborator`](crate::collaborator::Collaborator)

mod controller;
mod state;

pub use controller::ReportController;
pub use state::{
    ActiveReport, CleanTicket, Completion, ReportSession, SessionPhase, UploadTicket,
};
