//! Blob field scanner.
//!
//! Save blobs are mostly binary with NUL-separated strings. Each catalog
//! marker is followed by a NUL and, somewhere after it, the URL token of
//! that field. The scanner finds those tokens, normalizes them and yields
//! de-duplicated [`UrlRecord`]s.

mod denylist;

pub use denylist::ScriptDenylist;

use regex::{CaptureMatches, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::catalog::{FieldCatalog, FieldTypeTag};
use crate::url_model::UrlNormalizer;

/// One extracted asset reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub field_type: FieldTypeTag,
    pub url: String,
}

impl UrlRecord {
    pub fn new(field_type: FieldTypeTag, url: impl Into<String>) -> Self {
        Self {
            field_type,
            url: url.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("blob is empty")]
    Empty,
    #[error("no asset URLs found in blob")]
    NoUrls,
    #[error("invalid field marker {marker:?}: {source}")]
    Marker {
        marker: String,
        #[source]
        source: regex::Error,
    },
}

struct FieldPattern {
    tag: FieldTypeTag,
    regex: Regex,
}

/// Scans decoded blob text for catalog fields.
pub struct FieldScanner {
    patterns: Vec<FieldPattern>,
    normalizer: UrlNormalizer,
    denylist: ScriptDenylist,
}

impl FieldScanner {
    pub fn new(
        catalog: &FieldCatalog,
        normalizer: UrlNormalizer,
        denylist: ScriptDenylist,
    ) -> Result<Self, ScanError> {
        let patterns = catalog
            .entries()
            .iter()
            .map(|entry| {
                let pattern = format!(
                    r"(?s){}\x00.*?(http[^\x00]+)\x00",
                    regex::escape(&entry.marker)
                );
                Regex::new(&pattern)
                    .map(|regex| FieldPattern {
                        tag: entry.tag,
                        regex,
                    })
                    .map_err(|source| ScanError::Marker {
                        marker: entry.marker.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            patterns,
            normalizer,
            denylist,
        })
    }

    /// Lazily scans `text`. Each call starts a fresh de-duplication set.
    pub fn scan<'s>(&'s self, text: &'s str) -> Scan<'s> {
        Scan {
            scanner: self,
            text,
            pattern: 0,
            matches: None,
            seen: HashSet::new(),
        }
    }

    /// Decodes `blob` permissively and collects every record.
    pub fn extract_records(&self, blob: &[u8]) -> Result<Vec<UrlRecord>, ScanError> {
        if blob.is_empty() {
            return Err(ScanError::Empty);
        }
        let text = String::from_utf8_lossy(blob);
        let records: Vec<UrlRecord> = self.scan(&text).collect();
        if records.is_empty() {
            return Err(ScanError::NoUrls);
        }
        tracing::info!(count = records.len(), "extracted asset URLs");
        Ok(records)
    }

    fn candidate(&self, raw: &str) -> Option<String> {
        let Some(url) = self.normalizer.normalize(raw) else {
            tracing::debug!(raw, "discarding invalid URL");
            return None;
        };
        if let Some(token) = self.denylist.matched_token(&url) {
            tracing::debug!(%url, token, "discarding script-like URL");
            return None;
        }
        Some(url)
    }
}

/// Lazy record iterator returned by [`FieldScanner::scan`].
///
/// Markers are visited in catalog order, matches within a marker in
/// document order. The first occurrence of a URL decides its tag.
pub struct Scan<'s> {
    scanner: &'s FieldScanner,
    text: &'s str,
    pattern: usize,
    matches: Option<CaptureMatches<'s, 's>>,
    seen: HashSet<String>,
}

impl Iterator for Scan<'_> {
    type Item = UrlRecord;

    fn next(&mut self) -> Option<UrlRecord> {
        let scanner = self.scanner;
        loop {
            let field = scanner.patterns.get(self.pattern)?;
            let text = self.text;
            let matches = self
                .matches
                .get_or_insert_with(|| field.regex.captures_iter(text));

            let Some(caps) = matches.next() else {
                self.matches = None;
                self.pattern += 1;
                continue;
            };
            let Some(raw) = caps.get(1) else { continue };
            let Some(url) = scanner.candidate(raw.as_str()) else {
                continue;
            };
            if !self.seen.insert(url.clone()) {
                continue;
            }
            return Some(UrlRecord::new(field.tag, url));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FieldMarker;

    fn scanner() -> FieldScanner {
        FieldScanner::new(
            &FieldCatalog::default(),
            UrlNormalizer::default(),
            ScriptDenylist::default(),
        )
        .unwrap()
    }

    #[test]
    fn captures_url_after_marker() {
        let blob = b"FaceURL\x00junk\x00http://example.com/a.jpg\x00";
        let records = scanner().extract_records(blob).unwrap();
        assert_eq!(
            records,
            vec![UrlRecord::new(
                FieldTypeTag::FrontImage,
                "http://example.com/a.jpg"
            )]
        );
    }

    #[test]
    fn catalog_order_then_document_order() {
        let blob = b"\x01MeshURL\x00http://example.com/m1.obj\x00\
            FaceURL\x00http://example.com/f.png\x00\
            MeshURL\x00http://example.com/m2.obj\x00";
        let records = scanner().extract_records(blob).unwrap();
        let urls: Vec<&str> = records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            [
                "http://example.com/f.png",
                "http://example.com/m1.obj",
                "http://example.com/m2.obj"
            ]
        );
        assert_eq!(records[0].field_type, FieldTypeTag::FrontImage);
        assert_eq!(records[2].field_type, FieldTypeTag::MeshAsset);
    }

    #[test]
    fn duplicates_keep_first_field_type() {
        let blob = b"BackURL\x00http://example.com/card.png\x00\
            ImageURL\x00http://example.com/card.png\x00";
        let records = scanner().extract_records(blob).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field_type, FieldTypeTag::Image);
    }

    #[test]
    fn rewritten_urls_dedup_after_normalization() {
        let blob = b"FaceURL\x00http://cloud-3.steamusercontent.com/ugc/1/AB/\x00\
            BackURL\x00https://steamusercontent-a.akamaihd.net/ugc/1/AB/\x00";
        let records = scanner().extract_records(blob).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://steamusercontent-a.akamaihd.net/ugc/1/AB/");
        assert_eq!(records[0].field_type, FieldTypeTag::FrontImage);
    }

    #[test]
    fn script_and_invalid_candidates_are_dropped() {
        let blob = b"ImageURL\x00http://example.com/scripts/main.lua\x00\
            FaceURL\x00httpnotaurl\x00\
            BackURL\x00http://example.com/back.jpg\x00";
        let records = scanner().extract_records(blob).unwrap();
        assert_eq!(
            records,
            vec![UrlRecord::new(
                FieldTypeTag::BackImage,
                "http://example.com/back.jpg"
            )]
        );
    }

    #[test]
    fn tolerates_invalid_utf8() {
        let blob = b"\xff\xfeFaceURL\x00\xc3\x28\x00http://example.com/a.png\x00\xff";
        let records = scanner().extract_records(blob).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn repeated_scans_are_identical() {
        let blob = b"FaceURL\x00http://example.com/1.png\x00\
            MeshURL\x00http://example.com/2.obj\x00\
            PDFUrl\x00http://example.com/rules.pdf\x00";
        let s = scanner();
        let text = String::from_utf8_lossy(blob);
        let first: Vec<UrlRecord> = s.scan(&text).collect();
        let second: Vec<UrlRecord> = s.scan(&text).collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_and_urlless_blobs() {
        let s = scanner();
        assert!(matches!(s.extract_records(b""), Err(ScanError::Empty)));
        assert!(matches!(
            s.extract_records(b"FaceURL\x00nothing here\x00"),
            Err(ScanError::NoUrls)
        ));
    }

    #[test]
    fn custom_catalog_markers_are_escaped() {
        let catalog = FieldCatalog::new(vec![FieldMarker::new("Odd.Marker(1)", FieldTypeTag::SkyImage)]);
        let s = FieldScanner::new(&catalog, UrlNormalizer::default(), ScriptDenylist::none()).unwrap();
        let records = s
            .extract_records(b"Odd.Marker(1)\x00http://example.com/sky.jpg\x00OddXMarker(1)\x00http://example.com/no.jpg\x00")
            .unwrap();
        assert_eq!(records, vec![UrlRecord::new(FieldTypeTag::SkyImage, "http://example.com/sky.jpg")]);
    }
}
