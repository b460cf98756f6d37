//! Download orchestration.
//!
//! Records are processed strictly one after another. For each record the
//! orchestrator fetches the URL (with retry and backoff), classifies the
//! first bytes, applies the acceptance policy and persists accepted
//! payloads under a unique name.

mod item;
mod outcome;

pub use outcome::{DownloadOutcome, OutcomeStatus, RunSummary};

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::classify::AssetTypeClassifier;
use crate::config::TtsdlConfig;
use crate::fetch::{CurlTransport, Transport};
use crate::namer::FileNamer;
use crate::retry::{run_with_retry, FetchError, RetryPolicy, Sleeper, ThreadSleeper};
use crate::scanner::UrlRecord;
use item::{ItemResult, ItemSink};

/// Drives the fetch, classify and persist pipeline for a list of records.
pub struct DownloadOrchestrator {
    transport: Box<dyn Transport>,
    sleeper: Box<dyn Sleeper>,
    policy: RetryPolicy,
    classifier: AssetTypeClassifier,
    stop: Option<Arc<AtomicBool>>,
}

impl DownloadOrchestrator {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            sleeper: Box::new(ThreadSleeper),
            policy: RetryPolicy::default(),
            classifier: AssetTypeClassifier::default(),
            stop: None,
        }
    }

    /// Curl transport, retry policy and extension precedence from config.
    pub fn from_config(cfg: &TtsdlConfig) -> Self {
        Self::new(Box::new(CurlTransport::from_config(&cfg.http)))
            .with_retry_policy(RetryPolicy::from_config(&cfg.retry))
            .with_classifier(AssetTypeClassifier::new(cfg.extension_precedence))
    }

    pub fn with_sleeper(mut self, sleeper: Box<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_classifier(mut self, classifier: AssetTypeClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Flag checked between items; once set, no further item is started.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|s| s.load(Ordering::SeqCst))
    }

    /// Downloads every record into `dest`, reporting each outcome to
    /// `observer` as soon as it is known.
    pub fn run<F>(&mut self, records: &[UrlRecord], dest: &Path, mut observer: F) -> RunSummary
    where
        F: FnMut(&DownloadOutcome),
    {
        let namer = FileNamer::new(dest);
        let mut summary = RunSummary {
            extracted: records.len(),
            ..Default::default()
        };
        tracing::info!(count = records.len(), dest = %dest.display(), "starting downloads");

        for (i, record) in records.iter().enumerate() {
            if self.stop_requested() {
                tracing::info!(remaining = records.len() - i, "stop requested, not starting further items");
                break;
            }
            let outcome = self.process(record, i + 1, &namer);
            summary.record(&outcome);
            observer(&outcome);
        }

        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            "downloads finished"
        );
        summary
    }

    /// Processes one record at 1-based `index`.
    pub fn process(&mut self, record: &UrlRecord, index: usize, namer: &FileNamer) -> DownloadOutcome {
        let transport = &mut self.transport;
        let classifier = &self.classifier;

        let result = run_with_retry(&self.policy, self.sleeper.as_mut(), |attempt| {
            tracing::debug!(url = %record.url, attempt, "fetching");
            let mut sink = ItemSink::new(record, index, classifier, namer);
            transport.get(&record.url, &mut sink)?;
            if let Some(code) = sink.bad_status() {
                return Err(FetchError::Http(code));
            }
            Ok(sink.finish())
        });

        let (filename, status) = match result {
            Ok(ItemResult::Saved(path)) => (Some(path), OutcomeStatus::Success),
            Ok(ItemResult::Rejected(reason)) => (None, OutcomeStatus::Skipped(reason.to_string())),
            Ok(ItemResult::Failed(reason)) => (None, OutcomeStatus::Failed(reason)),
            Err(e) => (None, OutcomeStatus::Failed(e.to_string())),
        };
        match &status {
            OutcomeStatus::Success => tracing::info!(index, url = %record.url, "downloaded"),
            OutcomeStatus::Skipped(reason) => tracing::info!(index, url = %record.url, %reason, "skipped"),
            OutcomeStatus::Failed(reason) => tracing::warn!(index, url = %record.url, %reason, "failed"),
        }
        DownloadOutcome {
            index,
            url: record.url.clone(),
            field_type: record.field_type,
            filename,
            status,
        }
    }
}
