//! `ttsdl workshop <id>` – resolve a workshop item, fetch its blob, download its assets.

use anyhow::{Context, Result};
use std::path::Path;
use ttsdl_core::config::TtsdlConfig;
use ttsdl_core::fetch::CurlTransport;
use ttsdl_core::resolver::Resolver;
use ttsdl_core::workshop::{fetch_blob, WorkshopResolver};

use super::download::run_download;

pub fn run_workshop(cfg: &TtsdlConfig, id: &str, dest: Option<&Path>, keep_blob: bool) -> Result<()> {
    let mut transport = CurlTransport::from_config(&cfg.http);
    let resolved = WorkshopResolver::new(id, cfg.workshop_api.clone(), &mut transport)?.resolve()?;
    println!("Workshop item {}: {}", id, resolved.title);

    let cwd = std::env::current_dir().context("current directory")?;
    let blob = fetch_blob(&mut transport, &resolved, &cwd)?;
    println!("Blob saved to {}", blob.display());

    let result = run_download(cfg, &blob, dest);

    if !keep_blob {
        match std::fs::remove_file(&blob) {
            Ok(()) => tracing::debug!(path = %blob.display(), "removed blob"),
            Err(e) => tracing::warn!(path = %blob.display(), "could not remove blob: {}", e),
        }
    }
    result.map(|_| ())
}
