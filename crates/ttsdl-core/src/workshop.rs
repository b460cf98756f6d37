//! Workshop blob acquisition.
//!
//! A lookup service maps a numeric workshop id to the item's title and a
//! direct download URL for its save blob. The blob is then fetched into a
//! local `<Title>.bin` file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fetch::{BodySink, MemorySink, ResponseHead, SinkControl, Transport};
use crate::resolver::{ResolvedBlob, Resolver};
use crate::retry::FetchError;
use crate::storage::{temp_path, StorageWriter};
use crate::url_model::{clean_url, sanitize_file_stem};

/// Title used when the lookup response has none.
pub const DEFAULT_TITLE: &str = "WorkshopItem";

/// Largest lookup response accepted.
const MAX_LOOKUP_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum WorkshopError {
    #[error("workshop id must be numeric, got {0:?}")]
    InvalidId(String),
    #[error("lookup request failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("lookup response exceeds 1 MiB")]
    ResponseTooLarge,
    #[error("invalid lookup response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("lookup response has no usable download_url")]
    MissingDownloadUrl,
    #[error("could not save blob")]
    Storage(#[source] anyhow::Error),
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
}

/// Checks that `id` is a non-empty string of ASCII digits.
pub fn validate_id(id: &str) -> Result<&str, WorkshopError> {
    let id = id.trim();
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WorkshopError::InvalidId(id.to_string()));
    }
    Ok(id)
}

/// Substitutes `{id}` in the lookup URL template.
pub fn lookup_url(template: &str, id: &str) -> String {
    template.replace("{id}", id)
}

/// Parses the lookup service's JSON answer.
pub fn parse_lookup(body: &[u8]) -> Result<ResolvedBlob, WorkshopError> {
    let resp: LookupResponse = serde_json::from_slice(body)?;
    let url = resp
        .download_url
        .as_deref()
        .and_then(clean_url)
        .ok_or(WorkshopError::MissingDownloadUrl)?;
    let title = resp
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    Ok(ResolvedBlob { title, url })
}

/// Local file name for a blob: the title without whitespace, plus `.bin`.
pub fn blob_file_name(title: &str) -> String {
    let squeezed: String = title.chars().filter(|c| !c.is_whitespace()).collect();
    let stem = sanitize_file_stem(&squeezed).unwrap_or_else(|| DEFAULT_TITLE.to_string());
    format!("{}.bin", stem)
}

/// Resolves one workshop id through the lookup service.
pub struct WorkshopResolver<'t> {
    id: String,
    api_template: String,
    transport: &'t mut dyn Transport,
}

impl<'t> WorkshopResolver<'t> {
    pub fn new(
        id: &str,
        api_template: impl Into<String>,
        transport: &'t mut dyn Transport,
    ) -> Result<Self, WorkshopError> {
        Ok(Self {
            id: validate_id(id)?.to_string(),
            api_template: api_template.into(),
            transport,
        })
    }

    pub fn lookup(&mut self) -> Result<ResolvedBlob, WorkshopError> {
        let url = lookup_url(&self.api_template, &self.id);
        tracing::info!(id = %self.id, %url, "looking up workshop item");
        let mut sink = MemorySink::new(MAX_LOOKUP_BYTES);
        let report = self.transport.get(&url, &mut sink)?;
        if report.head.status != 200 {
            return Err(FetchError::Http(report.head.status).into());
        }
        if sink.is_truncated() {
            return Err(WorkshopError::ResponseTooLarge);
        }
        let blob = parse_lookup(&sink.into_body())?;
        tracing::info!(title = %blob.title, url = %blob.url, "workshop item resolved");
        Ok(blob)
    }
}

impl Resolver for WorkshopResolver<'_> {
    fn resolve(&mut self) -> anyhow::Result<ResolvedBlob> {
        Ok(self.lookup()?)
    }
}

/// Streams a body into a temp file; non-200 responses are not written.
struct FileSink {
    path: PathBuf,
    writer: Option<StorageWriter>,
    status: Option<u32>,
    error: Option<anyhow::Error>,
}

impl BodySink for FileSink {
    fn on_head(&mut self, head: &ResponseHead) -> SinkControl {
        self.status = Some(head.status);
        if head.status != 200 {
            return SinkControl::Stop;
        }
        match StorageWriter::create(&temp_path(&self.path)) {
            Ok(w) => {
                self.writer = Some(w);
                SinkControl::Continue
            }
            Err(e) => {
                self.error = Some(e);
                SinkControl::Stop
            }
        }
    }

    fn on_chunk(&mut self, chunk: &[u8]) -> SinkControl {
        let Some(writer) = self.writer.as_mut() else {
            return SinkControl::Stop;
        };
        match writer.write_all(chunk) {
            Ok(()) => SinkControl::Continue,
            Err(e) => {
                self.error = Some(e);
                self.writer = None;
                SinkControl::Stop
            }
        }
    }
}

/// Downloads the resolved blob into `dir` and returns its path.
pub fn fetch_blob(
    transport: &mut dyn Transport,
    blob: &ResolvedBlob,
    dir: &Path,
) -> Result<PathBuf, WorkshopError> {
    let path = dir.join(blob_file_name(&blob.title));
    let mut sink = FileSink {
        path: path.clone(),
        writer: None,
        status: None,
        error: None,
    };
    tracing::info!(url = %blob.url, path = %path.display(), "downloading blob");
    transport.get(&blob.url, &mut sink)?;

    if let Some(e) = sink.error.take() {
        return Err(WorkshopError::Storage(e));
    }
    match sink.status {
        Some(200) => {}
        Some(code) => return Err(FetchError::Http(code).into()),
        None => return Err(WorkshopError::Storage(anyhow::anyhow!("no response received"))),
    }
    let Some(mut writer) = sink.writer.take() else {
        return Err(WorkshopError::Storage(anyhow::anyhow!("blob transfer aborted")));
    };
    writer
        .sync()
        .and_then(|_| writer.finalize(&path))
        .map_err(WorkshopError::Storage)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::TransferReport;

    /// Answers every GET with one canned response.
    struct Canned {
        status: u32,
        body: Vec<u8>,
        urls: Vec<String>,
    }

    impl Canned {
        fn new(status: u32, body: &[u8]) -> Self {
            Self {
                status,
                body: body.to_vec(),
                urls: Vec::new(),
            }
        }
    }

    impl Transport for Canned {
        fn get(&mut self, url: &str, sink: &mut dyn BodySink) -> Result<TransferReport, FetchError> {
            self.urls.push(url.to_string());
            let head = ResponseHead {
                status: self.status,
                content_type: Some("application/json".to_string()),
            };
            let mut stopped = sink.on_head(&head) == SinkControl::Stop;
            if !stopped {
                stopped = sink.on_chunk(&self.body) == SinkControl::Stop;
            }
            Ok(TransferReport { head, stopped })
        }
    }

    #[test]
    fn ids_must_be_numeric() {
        assert_eq!(validate_id(" 123456 ").unwrap(), "123456");
        assert!(matches!(validate_id("12ab"), Err(WorkshopError::InvalidId(_))));
        assert!(matches!(validate_id(""), Err(WorkshopError::InvalidId(_))));
    }

    #[test]
    fn lookup_url_substitutes_id() {
        assert_eq!(
            lookup_url("https://api.example.com/json?id={id}", "42"),
            "https://api.example.com/json?id=42"
        );
    }

    #[test]
    fn parse_lookup_fields() {
        let blob = parse_lookup(br#"{"title":"My Deck","download_url":"https://cdn.example.com/x.bin"}"#).unwrap();
        assert_eq!(blob.title, "My Deck");
        assert_eq!(blob.url, "https://cdn.example.com/x.bin");

        let untitled = parse_lookup(br#"{"download_url":"https://cdn.example.com/x.bin"}"#).unwrap();
        assert_eq!(untitled.title, DEFAULT_TITLE);

        assert!(matches!(
            parse_lookup(br#"{"title":"No Link"}"#),
            Err(WorkshopError::MissingDownloadUrl)
        ));
        assert!(matches!(parse_lookup(b"not json"), Err(WorkshopError::Json(_))));
    }

    #[test]
    fn blob_names_drop_whitespace() {
        assert_eq!(blob_file_name("My Cool  Deck"), "MyCoolDeck.bin");
        assert_eq!(blob_file_name("   "), "WorkshopItem.bin");
        assert_eq!(blob_file_name("A/B"), "A_B.bin");
    }

    #[test]
    fn resolver_uses_template_and_json() {
        let mut transport = Canned::new(
            200,
            br#"{"title":"Chess","download_url":"https://cdn.example.com/chess.bin"}"#,
        );
        let blob = {
            let mut resolver =
                WorkshopResolver::new("777", "https://api.example.com/json?id={id}", &mut transport).unwrap();
            resolver.resolve().unwrap()
        };
        assert_eq!(blob.title, "Chess");
        assert_eq!(transport.urls, ["https://api.example.com/json?id=777"]);
    }

    #[test]
    fn resolver_reports_http_status() {
        let mut transport = Canned::new(503, b"busy");
        let mut resolver = WorkshopResolver::new("1", "https://api.example.com/{id}", &mut transport).unwrap();
        assert!(matches!(resolver.lookup(), Err(WorkshopError::Fetch(FetchError::Http(503)))));
    }

    #[test]
    fn fetch_blob_writes_title_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut transport = Canned::new(200, b"\x00FaceURL\x00http://example.com/a.png\x00");
        let blob = ResolvedBlob {
            title: "Big Box".to_string(),
            url: "https://cdn.example.com/blob".to_string(),
        };
        let path = fetch_blob(&mut transport, &blob, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("BigBox.bin"));
        assert_eq!(std::fs::read(&path).unwrap(), b"\x00FaceURL\x00http://example.com/a.png\x00");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn fetch_blob_error_status_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut transport = Canned::new(404, b"missing");
        let blob = ResolvedBlob {
            title: "Gone".to_string(),
            url: "https://cdn.example.com/gone".to_string(),
        };
        assert!(matches!(
            fetch_blob(&mut transport, &blob, dir.path()),
            Err(WorkshopError::Fetch(FetchError::Http(404)))
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
