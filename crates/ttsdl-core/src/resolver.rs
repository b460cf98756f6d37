//! Resolver interface for turning higher-level inputs into a blob URL.
//!
//! The download pipeline only needs a URL to fetch the save blob from;
//! where that URL comes from (a workshop lookup today) sits behind this trait.

/// A save blob that can be fetched directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBlob {
    /// Human-readable item title, used to name the local blob file.
    pub title: String,
    pub url: String,
}

/// Implemented by blob sources (e.g. the workshop lookup service).
pub trait Resolver {
    fn resolve(&mut self) -> anyhow::Result<ResolvedBlob>;
}
