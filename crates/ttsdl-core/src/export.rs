//! Record list persistence: text, CSV and JSON dumps of extracted URLs,
//! plus reading plain URL lists back in.

use anyhow::{Context, Result};
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::catalog::FieldTypeTag;
use crate::scanner::UrlRecord;
use crate::url_model::UrlNormalizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// `<Tag> <url>` per line.
    #[default]
    Text,
    /// `field_type,url` with a header row.
    Csv,
    /// Array of `{ "field_type", "url" }` objects.
    Json,
}

#[derive(Debug, Error)]
#[error("unknown export format {0:?} (expected text, csv or json)")]
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Text => "text",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        })
    }
}

impl ExportFormat {
    /// Guesses the format from an output file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }
}

/// Writes `records` to `out` in the given format.
pub fn write_records<W: Write>(records: &[UrlRecord], format: ExportFormat, mut out: W) -> Result<()> {
    match format {
        ExportFormat::Text => {
            for r in records {
                writeln!(out, "{} {}", r.field_type, r.url)?;
            }
        }
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut out);
            if records.is_empty() {
                writer.write_record(["field_type", "url"])?;
            }
            for r in records {
                writer.serialize(r).context("write CSV row")?;
            }
            writer.flush()?;
        }
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, records).context("write JSON")?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Parses a plain URL list (one per line, `#` comments) into generic records.
///
/// Lines that do not normalize to a URL are skipped; duplicates keep their
/// first position.
pub fn read_url_list(text: &str, normalizer: &UrlNormalizer) -> Vec<UrlRecord> {
    let mut seen = std::collections::HashSet::new();
    let mut records = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match normalizer.normalize(line) {
            Some(url) if seen.insert(url.clone()) => {
                records.push(UrlRecord::new(FieldTypeTag::GenericAsset, url));
            }
            Some(_) => {}
            None => tracing::warn!(line = lineno + 1, "skipping invalid URL: {}", line),
        }
    }
    records
}
