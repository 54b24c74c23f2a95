//! Run reporting
//!
//! Outcome records, the append-only outcome log, and progress estimates.

mod log;
mod outcome;
mod progress;

pub use log::{read_log_summary, LogSummary, OutcomeLog};
pub use outcome::{FetchOutcome, OutcomeStatus};
pub use progress::{ProgressReporter, ProgressSnapshot};
