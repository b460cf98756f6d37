//! `ttsdl download <blob>` – extract, then download every asset.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use ttsdl_core::config::TtsdlConfig;
use ttsdl_core::orchestrator::{DownloadOrchestrator, RunSummary};
use ttsdl_core::scanner::UrlRecord;

use super::default_dest;
use super::extract::extract_from_file;
use crate::cli::interrupt::install_stop_handler;

pub fn run_download(cfg: &TtsdlConfig, blob: &Path, dest: Option<&Path>) -> Result<RunSummary> {
    let records = extract_from_file(cfg, blob)?;
    let dest = dest.map(Path::to_path_buf).unwrap_or_else(|| default_dest(blob));
    download_records(cfg, &records, &dest, install_stop_handler()?)
}

/// Downloads `records` into `dest` (created if missing), printing one line
/// per item and the summary. No new item starts once `stop` is set.
pub(crate) fn download_records(
    cfg: &TtsdlConfig,
    records: &[UrlRecord],
    dest: &Path,
    stop: Arc<AtomicBool>,
) -> Result<RunSummary> {
    fs::create_dir_all(dest)
        .with_context(|| format!("create destination {}", dest.display()))?;
    println!("Downloading {} assets into {}", records.len(), dest.display());

    let mut orchestrator = DownloadOrchestrator::from_config(cfg).with_stop_flag(stop);
    let summary = orchestrator.run(records, dest, |outcome| println!("  {}", outcome));
    if summary.processed() < summary.extracted {
        println!(
            "Interrupted: {} of {} assets not attempted",
            summary.extracted - summary.processed(),
            summary.extracted
        );
    }

    println!("{}", summary);
    Ok(summary)
}
