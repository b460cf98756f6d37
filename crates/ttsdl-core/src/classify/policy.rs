//! Per-role acceptance policy.
//!
//! Each role has one function; together they are the decision table that
//! reconciles the sniffed signature, the declared `Content-Type` and the URL
//! extension.

use serde::{Deserialize, Serialize};

use super::mime::{extension_for_mime, is_known_extension, mime_for_extension, PLACEHOLDER_EXTENSION};
use super::signature::{Sniffed, MESH_MIME, PDF_MIME};
use super::{EvidenceSource, RejectReason, TypeDecision};

/// Declared types a mesh field may carry without a matching signature.
const MESH_HEADER_WHITELIST: &[&str] = &[MESH_MIME, "text/plain", "application/octet-stream"];

const MESH_EXTENSION: &str = ".obj";
const PDF_EXTENSION: &str = ".pdf";

/// Which signal wins for generic fields when several resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtensionPrecedence {
    /// Sniffed signature, then URL extension, then header.
    #[default]
    SignatureFirst,
    /// URL extension, then sniffed signature, then header.
    UrlFirst,
}

pub(super) fn image(sniffed: Option<Sniffed>, url_ext: Option<&str>) -> TypeDecision {
    match sniffed {
        Some(s) if s.is_image() => TypeDecision::accept(s.mime, s.extension, EvidenceSource::Signature),
        _ if url_ext == Some(PLACEHOLDER_EXTENSION) => {
            TypeDecision::reject(RejectReason::PlaceholderExtension)
        }
        other => TypeDecision::reject(RejectReason::NotAnImage {
            detected: other.map(|s| s.mime.to_string()),
        }),
    }
}

pub(super) fn mesh(sniffed: Option<Sniffed>, header: Option<&str>) -> TypeDecision {
    if let Some(s) = sniffed.filter(|s| s.mime == MESH_MIME) {
        return TypeDecision::accept(s.mime, MESH_EXTENSION, EvidenceSource::Signature);
    }
    match header {
        Some(h) if MESH_HEADER_WHITELIST.contains(&h) => {
            TypeDecision::accept(h, MESH_EXTENSION, EvidenceSource::Header)
        }
        _ => TypeDecision::reject(RejectReason::NotAMesh {
            detected: sniffed.map(|s| s.mime.to_string()).or(header.map(str::to_string)),
        }),
    }
}

pub(super) fn document(sniffed: Option<Sniffed>, header: Option<&str>) -> TypeDecision {
    if sniffed.is_some_and(|s| s.mime == PDF_MIME) {
        return TypeDecision::accept(PDF_MIME, PDF_EXTENSION, EvidenceSource::Signature);
    }
    if header == Some(PDF_MIME) {
        return TypeDecision::accept(PDF_MIME, PDF_EXTENSION, EvidenceSource::Header);
    }
    TypeDecision::reject(RejectReason::NotAPdf {
        detected: sniffed.map(|s| s.mime.to_string()).or(header.map(str::to_string)),
    })
}

pub(super) fn generic(
    sniffed: Option<Sniffed>,
    header: Option<&str>,
    url_ext: Option<&str>,
    precedence: ExtensionPrecedence,
) -> TypeDecision {
    let from_signature = sniffed.map(|s| (s.mime, s.extension, EvidenceSource::Signature));
    let from_url = url_ext
        .filter(|e| is_known_extension(e))
        .and_then(|e| mime_for_extension(e).map(|m| (m, e, EvidenceSource::Url)));
    let header_ext = header.and_then(extension_for_mime);
    let from_header = header
        .zip(header_ext)
        .filter(|(_, e)| *e != PLACEHOLDER_EXTENSION)
        .map(|(m, e)| (m, e, EvidenceSource::Header));

    let ordered = match precedence {
        ExtensionPrecedence::SignatureFirst => [from_signature, from_url, from_header],
        ExtensionPrecedence::UrlFirst => [from_url, from_signature, from_header],
    };
    if let Some((mime, ext, source)) = ordered.into_iter().flatten().next() {
        return TypeDecision::accept(mime, ext, source);
    }

    if header_ext == Some(PLACEHOLDER_EXTENSION) {
        TypeDecision::reject(RejectReason::PlaceholderExtension)
    } else {
        TypeDecision::reject(RejectReason::NoValidExtension)
    }
}
