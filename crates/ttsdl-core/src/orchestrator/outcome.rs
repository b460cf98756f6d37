//! Per-item outcomes and the run summary.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::catalog::FieldTypeTag;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    /// Fetch, HTTP or filesystem failure.
    Failed(String),
    /// Payload rejected by the acceptance policy.
    Skipped(String),
}

/// Terminal result for one record.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadOutcome {
    /// 1-based position in the record list.
    pub index: usize,
    pub url: String,
    pub field_type: FieldTypeTag,
    /// Written file; set only on success.
    pub filename: Option<PathBuf>,
    pub status: OutcomeStatus,
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

impl fmt::Display for DownloadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            OutcomeStatus::Success => {
                let name = self
                    .filename
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                write!(f, "[{}] ok      {} -> {}", self.index, self.url, name)
            }
            OutcomeStatus::Failed(reason) => {
                write!(f, "[{}] failed  {}: {}", self.index, self.url, reason)
            }
            OutcomeStatus::Skipped(reason) => {
                write!(f, "[{}] skipped {}: {}", self.index, self.url, reason)
            }
        }
    }
}

/// Counters for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Unique URLs handed to the run.
    pub extracted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome.status {
            OutcomeStatus::Success => self.succeeded += 1,
            OutcomeStatus::Failed(_) => self.failed += 1,
            OutcomeStatus::Skipped(_) => self.skipped += 1,
        }
    }

    /// Items that reached a terminal outcome.
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} URLs extracted, {} downloaded, {} failed, {} skipped",
            self.extracted, self.succeeded, self.failed, self.skipped
        )
    }
}
