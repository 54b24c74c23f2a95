//! Append-only outcome log
//!
//! The log is the run's transcript: one line per item outcome, appended
//! and flushed as soon as the outcome is observed. Lines are only ever
//! added, so logs accumulate across runs on the same output path.

use crate::report::FetchOutcome;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Append-only writer for the outcome log
///
/// All outcomes go through a single writer, so lines never interleave.
#[derive(Debug)]
pub struct OutcomeLog {
    file: File,
}

impl OutcomeLog {
    /// Opens the log for appending, creating the file if missing
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(OutcomeLog { file })
    }

    /// Appends one outcome line and flushes it to disk
    pub fn append(&mut self, outcome: &FetchOutcome) -> std::io::Result<()> {
        writeln!(self.file, "{}", outcome.log_line())?;
        self.file.flush()
    }
}

/// Tallies read back from an outcome log
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogSummary {
    pub success_lines: u64,
    pub error_lines: u64,
}

impl LogSummary {
    pub fn total(&self) -> u64 {
        self.success_lines + self.error_lines
    }
}

/// Reads an outcome log and tallies its lines by tag
pub fn read_log_summary(path: &Path) -> std::io::Result<LogSummary> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut summary = LogSummary::default();
    for line in reader.lines() {
        let line = line?;
        if line.starts_with("SUCCESS:") {
            summary.success_lines += 1;
        } else if line.starts_with("ERROR:") {
            summary.error_lines += 1;
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_append_writes_one_line_per_outcome() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");

        let mut log = OutcomeLog::open(&path).unwrap();
        log.append(&FetchOutcome::success("1")).unwrap();
        log.append(&FetchOutcome::skipped("2")).unwrap();
        log.append(&FetchOutcome::failed("3", "Failed after retries"))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "SUCCESS: 1 saved",
                "SUCCESS: 2 already saved",
                "ERROR: 3 Failed after retries",
            ]
        );
    }

    #[test]
    fn test_reopen_appends_after_existing_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");

        {
            let mut log = OutcomeLog::open(&path).unwrap();
            log.append(&FetchOutcome::success("1")).unwrap();
        }
        {
            let mut log = OutcomeLog::open(&path).unwrap();
            log.append(&FetchOutcome::success("2")).unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "SUCCESS: 1 saved\nSUCCESS: 2 saved\n");
    }

    #[test]
    fn test_read_log_summary_tallies_by_tag() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");

        let mut log = OutcomeLog::open(&path).unwrap();
        log.append(&FetchOutcome::success("1")).unwrap();
        log.append(&FetchOutcome::skipped("2")).unwrap();
        log.append(&FetchOutcome::failed("3", "timeout")).unwrap();
        log.append(&FetchOutcome::failed("4", "timeout")).unwrap();

        let summary = read_log_summary(&path).unwrap();
        assert_eq!(summary.success_lines, 2);
        assert_eq!(summary.error_lines, 2);
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn test_read_log_summary_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let result = read_log_summary(&dir.path().join("absent.txt"));
        assert!(result.is_err());
    }
}
