//! CLI command handlers. Each command is in its own file.

mod completions;
mod download;
mod extract;
mod fetch_list;
mod workshop;

pub use completions::{run_completions, run_man};
pub use download::run_download;
pub(crate) use download::download_records;
pub use extract::run_extract;
pub use fetch_list::run_fetch_list;
pub use workshop::run_workshop;

use std::path::{Path, PathBuf};

/// Default destination: the input path without its extension
/// (`saves/Chess.bin` → `saves/Chess`).
pub(crate) fn default_dest(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "ttsdl-assets".into());
    input.with_file_name(stem)
}
