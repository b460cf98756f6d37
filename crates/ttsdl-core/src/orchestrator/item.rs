//! Body sink for one download attempt.
//!
//! Buffers the first [`SAMPLE_LEN`] bytes, classifies them, then either
//! stops the transfer (rejected payload) or streams everything into a temp
//! file named by the [`FileNamer`].

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::catalog::FieldRole;
use crate::classify::{
    sniff, AssetTypeClassifier, Evidence, EvidenceSource, RejectReason, TypeDecision, Verdict, SAMPLE_LEN,
};
use crate::fetch::{BodySink, ResponseHead, SinkControl};
use crate::namer::FileNamer;
use crate::scanner::UrlRecord;
use crate::storage::{temp_path, StorageWriter};
use crate::url_model::url_extension;

enum State {
    Sampling,
    Writing {
        writer: StorageWriter,
        path: PathBuf,
        decision: TypeDecision,
    },
    /// Final status was not 200; nothing is read or written.
    Status(u32),
    Rejected(RejectReason),
    Failed(String),
}

/// Result of a completed transfer, before post-write verification.
pub(super) enum ItemResult {
    Saved(PathBuf),
    Rejected(RejectReason),
    Failed(String),
}

pub(super) struct ItemSink<'a> {
    record: &'a UrlRecord,
    index: usize,
    classifier: &'a AssetTypeClassifier,
    namer: &'a FileNamer,
    url_extension: Option<String>,
    content_type: Option<String>,
    sample: Vec<u8>,
    state: State,
}

impl<'a> ItemSink<'a> {
    pub(super) fn new(
        record: &'a UrlRecord,
        index: usize,
        classifier: &'a AssetTypeClassifier,
        namer: &'a FileNamer,
    ) -> Self {
        Self {
            record,
            index,
            classifier,
            namer,
            url_extension: url_extension(&record.url),
            content_type: None,
            sample: Vec::with_capacity(SAMPLE_LEN),
            state: State::Sampling,
        }
    }

    /// Non-200 status seen by the sink, if any.
    pub(super) fn bad_status(&self) -> Option<u32> {
        match self.state {
            State::Status(code) => Some(code),
            _ => None,
        }
    }

    fn evidence<'s>(&'s self, sample: &'s [u8]) -> Evidence<'s> {
        Evidence {
            sample,
            content_type: self.content_type.as_deref(),
            url_extension: self.url_extension.as_deref(),
        }
    }

    /// Classify the buffered sample and open the temp file on accept.
    fn decide(&mut self) -> SinkControl {
        let decision = self
            .classifier
            .classify(self.record.field_type, &self.evidence(&self.sample));
        let ext = match (&decision.verdict, decision.accepted_extension()) {
            (Verdict::Accept, Some(ext)) => ext.to_string(),
            (Verdict::Reject(reason), _) => {
                tracing::debug!(url = %self.record.url, %reason, "payload rejected");
                self.state = State::Rejected(reason.clone());
                return SinkControl::Stop;
            }
            (Verdict::Accept, None) => {
                self.state = State::Rejected(RejectReason::NoValidExtension);
                return SinkControl::Stop;
            }
        };

        let path = self
            .namer
            .next_path(self.record.field_type, &self.record.url, self.index, &ext);
        let opened = StorageWriter::create(&temp_path(&path)).and_then(|mut writer| {
            writer.write_all(&self.sample)?;
            Ok(writer)
        });
        match opened {
            Ok(writer) => {
                tracing::debug!(url = %self.record.url, path = %path.display(), mime = ?decision.mime, "writing payload");
                self.state = State::Writing {
                    writer,
                    path,
                    decision,
                };
                SinkControl::Continue
            }
            Err(e) => {
                self.state = State::Failed(format!("{:#}", e));
                SinkControl::Stop
            }
        }
    }

    /// Ends the attempt after a successful transfer: classify short bodies,
    /// then rename the temp file into place.
    pub(super) fn finish(mut self) -> ItemResult {
        if matches!(self.state, State::Sampling) {
            if self.sample.is_empty() {
                return ItemResult::Failed("empty response body".to_string());
            }
            self.decide();
        }
        match std::mem::replace(&mut self.state, State::Sampling) {
            State::Writing {
                mut writer,
                path,
                decision,
            } => {
                if writer.written() == 0 {
                    return ItemResult::Failed("empty response body".to_string());
                }
                let written = writer.written();
                if let Err(e) = writer.sync().and_then(|_| writer.finalize(&path)) {
                    return ItemResult::Failed(format!("{:#}", e));
                }
                self.verify(path, &decision, written)
            }
            State::Sampling => ItemResult::Failed("transfer ended before classification".to_string()),
            State::Status(code) => ItemResult::Failed(format!("HTTP {}", code)),
            State::Rejected(reason) => ItemResult::Rejected(reason),
            State::Failed(reason) => ItemResult::Failed(reason),
        }
    }

    /// Generic-role fields re-confirm their extension from the bytes on disk.
    fn verify(&self, path: PathBuf, decision: &TypeDecision, written: u64) -> ItemResult {
        if self.record.field_type.role() != FieldRole::Generic
            || confirm_written(&path, decision, written)
        {
            return ItemResult::Saved(path);
        }
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::warn!(path = %path.display(), "could not remove unconfirmed file: {}", e);
        }
        ItemResult::Failed("could not confirm file extension".to_string())
    }
}

/// True when the file at `path` holds the `written` bytes that were streamed
/// and, for a signature-based decision, still opens with that signature.
fn confirm_written(path: &Path, decision: &TypeDecision, written: u64) -> bool {
    let Some(ext) = decision.accepted_extension() else {
        return false;
    };
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() == written && written > 0 => {}
        _ => return false,
    }
    if decision.source != Some(EvidenceSource::Signature) {
        return true;
    }
    read_prefix(path)
        .ok()
        .and_then(|prefix| sniff(&prefix, FieldRole::Generic))
        .is_some_and(|s| s.extension == ext)
}

fn read_prefix(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(SAMPLE_LEN);
    File::open(path)?
        .take(SAMPLE_LEN as u64)
        .read_to_end(&mut buf)?;
    Ok(buf)
}

impl BodySink for ItemSink<'_> {
    fn on_head(&mut self, head: &ResponseHead) -> SinkControl {
        if head.status != 200 {
            self.state = State::Status(head.status);
            return SinkControl::Stop;
        }
        self.content_type = head.content_type.clone();
        SinkControl::Continue
    }

    fn on_chunk(&mut self, chunk: &[u8]) -> SinkControl {
        match &mut self.state {
            State::Sampling => {
                let room = SAMPLE_LEN - self.sample.len();
                let (head, rest) = chunk.split_at(room.min(chunk.len()));
                self.sample.extend_from_slice(head);
                if self.sample.len() < SAMPLE_LEN {
                    return SinkControl::Continue;
                }
                if self.decide() == SinkControl::Stop {
                    return SinkControl::Stop;
                }
                if rest.is_empty() {
                    SinkControl::Continue
                } else {
                    self.on_chunk(rest)
                }
            }
            State::Writing { writer, .. } => match writer.write_all(chunk) {
                Ok(()) => SinkControl::Continue,
                Err(e) => {
                    self.state = State::Failed(format!("{:#}", e));
                    SinkControl::Stop
                }
            },
            State::Status(_) | State::Rejected(_) | State::Failed(_) => SinkControl::Stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JPEG: &[u8] = b"\xff\xd8\xff\xe0\0\x10JFIF";

    fn png_decision() -> TypeDecision {
        TypeDecision::accept("image/png", ".png", EvidenceSource::Signature)
    }

    #[test]
    fn written_file_confirms() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck_1.png");
        std::fs::write(&path, PNG).unwrap();
        assert!(confirm_written(&path, &png_decision(), PNG.len() as u64));
    }

    #[test]
    fn replaced_bytes_do_not_confirm() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck_1.png");
        std::fs::write(&path, JPEG).unwrap();
        assert!(!confirm_written(&path, &png_decision(), JPEG.len() as u64));
    }

    #[test]
    fn size_mismatch_does_not_confirm() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck_1.png");
        std::fs::write(&path, PNG).unwrap();
        assert!(!confirm_written(&path, &png_decision(), PNG.len() as u64 + 10));
        assert!(!confirm_written(&dir.path().join("gone.png"), &png_decision(), 4));
    }

    #[test]
    fn header_decision_only_checks_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes_1.txt");
        std::fs::write(&path, b"plain notes").unwrap();
        let decision = TypeDecision::accept("text/plain", ".txt", EvidenceSource::Header);
        assert!(confirm_written(&path, &decision, 11));
        let rejected = TypeDecision::reject(RejectReason::NoValidExtension);
        assert!(!confirm_written(&path, &rejected, 11));
    }

    #[test]
    fn generic_role_file_removed_when_unconfirmed() {
        let dir = tempfile::tempdir().unwrap();
        let record = UrlRecord::new(crate::catalog::FieldTypeTag::DiffuseTexture, "http://x.com/t.png");
        let classifier = AssetTypeClassifier::default();
        let namer = FileNamer::new(dir.path());
        let sink = ItemSink::new(&record, 1, &classifier, &namer);

        let path = dir.path().join("DiffuseTexture_1.png");
        std::fs::write(&path, JPEG).unwrap();
        match sink.verify(path.clone(), &png_decision(), JPEG.len() as u64) {
            ItemResult::Failed(reason) => assert_eq!(reason, "could not confirm file extension"),
            _ => panic!("expected failure"),
        }
        assert!(!path.exists());
    }
}
