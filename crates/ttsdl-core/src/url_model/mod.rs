//! URL modeling: cleaning, CDN rewriting and filename hints.
//!
//! Raw strings captured from a blob are turned into canonical absolute URLs
//! here; the URL path also supplies extension and stem hints for naming.

mod normalize;
mod path;
mod rewrite;
mod sanitize;

pub use normalize::clean_url;
pub use path::{filename_from_url_path, url_extension, url_file_stem};
pub use rewrite::CdnRewrite;
pub use sanitize::{sanitize_file_stem, MAX_NAME_CHARS};

/// Cleans raw candidates and rewrites deprecated CDN hosts.
///
/// `normalize` is idempotent: normalizing an already normalized URL returns
/// it unchanged.
#[derive(Debug, Clone)]
pub struct UrlNormalizer {
    rewrites: Vec<CdnRewrite>,
}

impl UrlNormalizer {
    /// Builds a normalizer from rewrite rules.
    ///
    /// Malformed rules and rules whose target would itself be rewritten again
    /// are dropped, so that a second pass never changes a URL.
    pub fn new(rewrites: Vec<CdnRewrite>) -> Self {
        let well_formed: Vec<CdnRewrite> = rewrites
            .into_iter()
            .filter(|r| {
                let ok = r.is_well_formed();
                if !ok {
                    tracing::warn!(from = %r.from, to = %r.to, "ignoring malformed CDN rewrite");
                }
                ok
            })
            .collect();

        let rewrites = well_formed
            .iter()
            .filter(|r| {
                let chained = rewrite::apply_first(&well_formed, &r.to).is_some();
                if chained {
                    tracing::warn!(from = %r.from, to = %r.to, "ignoring chained CDN rewrite");
                }
                !chained
            })
            .cloned()
            .collect();

        Self { rewrites }
    }

    pub fn rewrites(&self) -> &[CdnRewrite] {
        &self.rewrites
    }

    /// Cleans `raw` and applies the first matching CDN rewrite.
    /// Returns `None` when `raw` holds no valid URL.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let url = clean_url(raw)?;
        match rewrite::apply_first(&self.rewrites, &url) {
            Some(rewritten) => {
                tracing::debug!(from = %url, to = %rewritten, "rewrote CDN host");
                Some(rewritten)
            }
            None => Some(url),
        }
    }
}

impl Default for UrlNormalizer {
    fn default() -> Self {
        Self::new(CdnRewrite::defaults())
    }
}
