//! `ttsdl fetch-list <file>` – download a plain URL list.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use ttsdl_core::config::TtsdlConfig;
use ttsdl_core::export::read_url_list;

use super::default_dest;
use super::download::download_records;
use crate::cli::interrupt::install_stop_handler;

pub fn run_fetch_list(cfg: &TtsdlConfig, list: &Path, dest: Option<&Path>) -> Result<()> {
    let text = fs::read_to_string(list)
        .with_context(|| format!("read URL list {}", list.display()))?;
    let records = read_url_list(&text, &cfg.normalizer());
    if records.is_empty() {
        anyhow::bail!("no valid URLs in {}", list.display());
    }
    let dest = dest.map(Path::to_path_buf).unwrap_or_else(|| default_dest(list));
    download_records(cfg, &records, &dest, install_stop_handler()?)?;
    Ok(())
}
