//! Per-item outcome records
//!
//! Every catalog item that passes through the download pool ends in
//! exactly one of these records, whether or not a request was made.

use chrono::{DateTime, Utc};

/// Terminal status of one item's download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeStatus {
    /// Document fetched and stored during this run
    Success,

    /// Document was already in the cache; no request was made
    Skipped,

    /// Every attempt failed, or the fetched document could not be stored
    Failed,
}

impl OutcomeStatus {
    /// Tag the outcome log writes for this status
    ///
    /// The log grammar has two tags. A skipped item was saved by an
    /// earlier run, so it files under SUCCESS.
    pub fn log_tag(&self) -> &'static str {
        match self {
            OutcomeStatus::Success | OutcomeStatus::Skipped => "SUCCESS",
            OutcomeStatus::Failed => "ERROR",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, OutcomeStatus::Failed)
    }
}

/// Result of one catalog item passing through the download pool
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Site-assigned object id
    pub id: String,

    /// How the item ended up
    pub status: OutcomeStatus,

    /// Error text, present only for failed items
    pub error: Option<String>,

    /// When the outcome was observed
    pub timestamp: DateTime<Utc>,
}

impl FetchOutcome {
    pub fn success(id: impl Into<String>) -> Self {
        FetchOutcome {
            id: id.into(),
            status: OutcomeStatus::Success,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn skipped(id: impl Into<String>) -> Self {
        FetchOutcome {
            id: id.into(),
            status: OutcomeStatus::Skipped,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(id: impl Into<String>, error: impl Into<String>) -> Self {
        FetchOutcome {
            id: id.into(),
            status: OutcomeStatus::Failed,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }

    /// Renders the outcome as one log line: `<TAG>: <id> <message>`
    pub fn log_line(&self) -> String {
        let message = match self.status {
            OutcomeStatus::Success => "saved",
            OutcomeStatus::Skipped => "already saved",
            OutcomeStatus::Failed => self.error.as_deref().unwrap_or("unknown error"),
        };
        format!("{}: {} {}", self.status.log_tag(), self.id, message)
    }
}
