//! Rewriting of deprecated CDN hosts to their current replacements.

use serde::{Deserialize, Serialize};

use super::normalize::clean_url;

/// Replace a scheme+host prefix with another one. Path and query are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdnRewrite {
    pub from: String,
    pub to: String,
}

impl CdnRewrite {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Built-in rewrites: the retired Steam cloud host moved to Akamai.
    pub fn defaults() -> Vec<CdnRewrite> {
        vec![
            CdnRewrite::new(
                "http://cloud-3.steamusercontent.com",
                "https://steamusercontent-a.akamaihd.net",
            ),
            CdnRewrite::new(
                "https://cloud-3.steamusercontent.com",
                "https://steamusercontent-a.akamaihd.net",
            ),
        ]
    }

    /// Returns the rewritten URL if `url` starts with `from` on a host boundary.
    pub fn apply(&self, url: &str) -> Option<String> {
        let rest = strip_prefix_ignore_case(url, &self.from)?;
        if !(rest.is_empty() || rest.starts_with(['/', '?', ':'])) {
            return None;
        }
        Some(format!("{}{}", self.to, rest))
    }

    /// A rewrite is usable when both sides are bare `scheme://host[:port]`
    /// prefixes that survive URL cleaning unchanged.
    pub(super) fn is_well_formed(&self) -> bool {
        let is_origin = |s: &str| {
            clean_url(s).as_deref() == Some(s)
                && s.split_once("://")
                    .is_some_and(|(_, authority)| !authority.contains(['/', '?']))
        };
        is_origin(&self.from) && is_origin(&self.to)
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// Applies the first matching rewrite, if any.
pub(super) fn apply_first(rewrites: &[CdnRewrite], url: &str) -> Option<String> {
    rewrites.iter().find_map(|r| r.apply(url))
}
