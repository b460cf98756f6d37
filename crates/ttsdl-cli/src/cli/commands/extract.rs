//! `ttsdl extract <blob>` – print or save the asset URL list.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufWriter};
use std::path::Path;
use ttsdl_core::config::TtsdlConfig;
use ttsdl_core::export::{write_records, ExportFormat};
use ttsdl_core::scanner::{FieldScanner, UrlRecord};

/// Reads a blob and extracts its records; extraction errors are fatal.
pub(crate) fn extract_from_file(cfg: &TtsdlConfig, blob: &Path) -> Result<Vec<UrlRecord>> {
    let bytes = fs::read(blob).with_context(|| format!("read blob {}", blob.display()))?;
    let scanner = FieldScanner::new(&cfg.catalog(), cfg.normalizer(), cfg.denylist())?;
    let records = scanner
        .extract_records(&bytes)
        .with_context(|| format!("extract URLs from {}", blob.display()))?;
    Ok(records)
}

pub fn run_extract(
    cfg: &TtsdlConfig,
    blob: &Path,
    format: Option<ExportFormat>,
    output: Option<&Path>,
) -> Result<()> {
    let records = extract_from_file(cfg, blob)?;
    let format = format
        .or_else(|| output.and_then(ExportFormat::from_path))
        .unwrap_or_default();

    match output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("create {}", path.display()))?;
            write_records(&records, format, BufWriter::new(file))?;
            eprintln!("{} URLs written to {} ({})", records.len(), path.display(), format);
        }
        None => write_records(&records, format, io::stdout().lock())?,
    }
    Ok(())
}
