//! Field marker catalog.
//!
//! A save blob stores asset references under well-known field names
//! (`FaceURL`, `MeshURL`, ...). The catalog maps each marker to a
//! [`FieldTypeTag`], and each tag to the [`FieldRole`] whose acceptance
//! policy applies to the downloaded payload.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic category of an extracted reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldTypeTag {
    Image,
    FrontImage,
    BackImage,
    MeshAsset,
    DiffuseTexture,
    AssetBundle,
    AssetBundleSecondary,
    SecondaryImage,
    PdfDocument,
    ColliderMesh,
    NormalMap,
    SkyImage,
    TableImage,
    LutImage,
    /// Untyped reference (e.g. from a plain URL list). Named after its URL path.
    GenericAsset,
}

/// Which acceptance policy governs a field's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Card faces: must be a sniffed JPEG or PNG.
    Image,
    /// Wavefront OBJ meshes.
    Mesh,
    /// PDF rulebooks.
    Document,
    /// Anything else: any corroborated extension is accepted.
    Generic,
}

impl FieldTypeTag {
    pub fn role(self) -> FieldRole {
        match self {
            FieldTypeTag::FrontImage | FieldTypeTag::BackImage => FieldRole::Image,
            FieldTypeTag::MeshAsset | FieldTypeTag::ColliderMesh => FieldRole::Mesh,
            FieldTypeTag::PdfDocument => FieldRole::Document,
            FieldTypeTag::Image
            | FieldTypeTag::DiffuseTexture
            | FieldTypeTag::AssetBundle
            | FieldTypeTag::AssetBundleSecondary
            | FieldTypeTag::SecondaryImage
            | FieldTypeTag::NormalMap
            | FieldTypeTag::SkyImage
            | FieldTypeTag::TableImage
            | FieldTypeTag::LutImage
            | FieldTypeTag::GenericAsset => FieldRole::Generic,
        }
    }

    /// True for tags that name their files after the tag rather than the URL.
    pub fn is_typed(self) -> bool {
        self != FieldTypeTag::GenericAsset
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldTypeTag::Image => "Image",
            FieldTypeTag::FrontImage => "FrontImage",
            FieldTypeTag::BackImage => "BackImage",
            FieldTypeTag::MeshAsset => "MeshAsset",
            FieldTypeTag::DiffuseTexture => "DiffuseTexture",
            FieldTypeTag::AssetBundle => "AssetBundle",
            FieldTypeTag::AssetBundleSecondary => "AssetBundleSecondary",
            FieldTypeTag::SecondaryImage => "SecondaryImage",
            FieldTypeTag::PdfDocument => "PdfDocument",
            FieldTypeTag::ColliderMesh => "ColliderMesh",
            FieldTypeTag::NormalMap => "NormalMap",
            FieldTypeTag::SkyImage => "SkyImage",
            FieldTypeTag::TableImage => "TableImage",
            FieldTypeTag::LutImage => "LutImage",
            FieldTypeTag::GenericAsset => "GenericAsset",
        }
    }
}

impl fmt::Display for FieldTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog entry: the textual marker preceding a URL field in the blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMarker {
    pub marker: String,
    pub tag: FieldTypeTag,
}

impl FieldMarker {
    pub fn new(marker: impl Into<String>, tag: FieldTypeTag) -> Self {
        Self {
            marker: marker.into(),
            tag,
        }
    }
}

/// Built-in markers, in scan order. Order matters: when the same URL appears
/// under several markers, the earliest entry decides its tag.
const DEFAULT_MARKERS: &[(&str, FieldTypeTag)] = &[
    ("ImageURL", FieldTypeTag::Image),
    ("FaceURL", FieldTypeTag::FrontImage),
    ("BackURL", FieldTypeTag::BackImage),
    ("MeshURL", FieldTypeTag::MeshAsset),
    ("DiffuseURL", FieldTypeTag::DiffuseTexture),
    ("AssetbundleURL", FieldTypeTag::AssetBundle),
    ("AssetbundleSecondaryURL", FieldTypeTag::AssetBundleSecondary),
    ("ImageSecondaryURL", FieldTypeTag::SecondaryImage),
    ("PDFUrl", FieldTypeTag::PdfDocument),
    ("ColliderURL", FieldTypeTag::ColliderMesh),
    ("NormalURL", FieldTypeTag::NormalMap),
    ("SkyURL", FieldTypeTag::SkyImage),
    ("TableURL", FieldTypeTag::TableImage),
    ("LutURL", FieldTypeTag::LutImage),
];

/// Ordered list of field markers handed to the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCatalog {
    entries: Vec<FieldMarker>,
}

impl FieldCatalog {
    pub fn new(entries: Vec<FieldMarker>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[FieldMarker] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::new(
            DEFAULT_MARKERS
                .iter()
                .map(|(marker, tag)| FieldMarker::new(*marker, *tag))
                .collect(),
        )
    }
}
