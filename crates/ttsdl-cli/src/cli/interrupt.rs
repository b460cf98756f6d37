//! Ctrl-C handling for download runs.
//!
//! The first interrupt sets the stop flag so the orchestrator finishes the
//! item in flight and starts no further ones; a second interrupt exits.

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Exit status after a second Ctrl-C (128 + SIGINT).
const INTERRUPTED_EXIT: i32 = 130;

/// Spawns a thread waiting for Ctrl-C and returns the flag it sets.
pub(crate) fn install_stop_handler() -> Result<Arc<AtomicBool>> {
    let stop = Arc::new(AtomicBool::new(false));
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build signal runtime")?;

    let flag = Arc::clone(&stop);
    std::thread::Builder::new()
        .name("ttsdl-interrupt".to_string())
        .spawn(move || {
            rt.block_on(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!("could not listen for Ctrl-C: {}", e);
                    return;
                }
                flag.store(true, Ordering::SeqCst);
                tracing::info!("interrupt received, stopping after the current item");
                eprintln!("Interrupted: finishing the current item (Ctrl-C again to quit now)");

                if tokio::signal::ctrl_c().await.is_ok() {
                    std::process::exit(INTERRUPTED_EXIT);
                }
            })
        })
        .context("spawn interrupt thread")?;

    Ok(stop)
}
