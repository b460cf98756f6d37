//! Asset type classification.
//!
//! Resolves the authoritative MIME type and extension of a fetched payload
//! from three signals of unequal trust: the sniffed byte signature, the
//! declared `Content-Type` and the URL path extension. The per-role policy
//! in [`policy`] decides whether the payload is kept at all.

mod mime;
mod policy;
mod signature;

use std::fmt;

use crate::catalog::{FieldRole, FieldTypeTag};

pub use mime::{
    extension_for_mime, is_known_extension, mime_for_extension, normalize_content_type,
    PLACEHOLDER_EXTENSION,
};
pub use policy::ExtensionPrecedence;
pub use signature::{sniff, Sniffed, SAMPLE_LEN};

/// Which signal an accepted type was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceSource {
    Signature,
    Url,
    Header,
}

/// Why a payload was not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Image field whose bytes are not a JPEG or PNG.
    NotAnImage { detected: Option<String> },
    /// Mesh field with neither an OBJ signature nor a whitelisted header.
    NotAMesh { detected: Option<String> },
    /// Document field that is not a PDF.
    NotAPdf { detected: Option<String> },
    /// The only resolvable extension is the `.bin` placeholder.
    PlaceholderExtension,
    /// Nothing resolved to a known extension.
    NoValidExtension,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detected = |d: &Option<String>| d.clone().unwrap_or_else(|| "unknown".to_string());
        match self {
            RejectReason::NotAnImage { detected: d } => {
                write!(f, "signature is not an image ({})", detected(d))
            }
            RejectReason::NotAMesh { detected: d } => {
                write!(f, "signature or content type is not a mesh ({})", detected(d))
            }
            RejectReason::NotAPdf { detected: d } => {
                write!(f, "signature or content type is not a PDF ({})", detected(d))
            }
            RejectReason::PlaceholderExtension => write!(
                f,
                "would be named with placeholder extension {}",
                PLACEHOLDER_EXTENSION
            ),
            RejectReason::NoValidExtension => write!(f, "no valid extension detected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(RejectReason),
}

/// Outcome of classification: a resolved type or a rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecision {
    pub mime: Option<String>,
    pub extension: Option<String>,
    pub source: Option<EvidenceSource>,
    pub verdict: Verdict,
}

impl TypeDecision {
    pub fn accept(mime: &str, extension: &str, source: EvidenceSource) -> Self {
        Self {
            mime: Some(mime.to_string()),
            extension: Some(extension.to_string()),
            source: Some(source),
            verdict: Verdict::Accept,
        }
    }

    pub fn reject(reason: RejectReason) -> Self {
        Self {
            mime: None,
            extension: None,
            source: None,
            verdict: Verdict::Reject(reason),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accept
    }

    /// Extension of an accepted decision.
    pub fn accepted_extension(&self) -> Option<&str> {
        match self.verdict {
            Verdict::Accept => self.extension.as_deref(),
            Verdict::Reject(_) => None,
        }
    }
}

/// Everything known about a payload at decision time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evidence<'a> {
    /// Leading body bytes (only the first [`SAMPLE_LEN`] are inspected).
    pub sample: &'a [u8],
    /// Raw `Content-Type` header of the final response.
    pub content_type: Option<&'a str>,
    /// Lowercased URL path extension with leading dot.
    pub url_extension: Option<&'a str>,
}

/// Applies the acceptance policy for a field tag.
///
/// Classification is a pure function of (role, evidence, precedence).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetTypeClassifier {
    precedence: ExtensionPrecedence,
}

impl AssetTypeClassifier {
    pub fn new(precedence: ExtensionPrecedence) -> Self {
        Self { precedence }
    }

    pub fn classify(&self, tag: FieldTypeTag, evidence: &Evidence<'_>) -> TypeDecision {
        self.classify_role(tag.role(), evidence)
    }

    pub fn classify_role(&self, role: FieldRole, evidence: &Evidence<'_>) -> TypeDecision {
        let sniffed = sniff(evidence.sample, role);
        let header = evidence.content_type.and_then(normalize_content_type);
        let header = header.as_deref();
        match role {
            FieldRole::Image => policy::image(sniffed, evidence.url_extension),
            FieldRole::Mesh => policy::mesh(sniffed, header),
            FieldRole::Document => policy::document(sniffed, header),
            FieldRole::Generic => {
                policy::generic(sniffed, header, evidence.url_extension, self.precedence)
            }
        }
    }
}
