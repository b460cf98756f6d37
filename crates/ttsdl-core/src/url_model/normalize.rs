//! Cleaning and validation of raw URL candidates lifted out of a blob.

use regex::Regex;
use std::sync::OnceLock;

/// Allowed-character URL grammar: scheme, host, optional port, path, query.
/// Quotes, parentheses, whitespace and control characters end the URL.
fn url_grammar() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^https?://(?P<host>[A-Za-z0-9.\-]+)(?::[0-9]{1,5})?(?:/[A-Za-z0-9\-._~%!$&*+,;=:@/]*)?(?:\?[A-Za-z0-9\-._~%!$&*+,;=:@/?]*)?",
        )
        .expect("URL grammar is a valid regex")
    })
}

fn markup_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("markup pattern is a valid regex"))
}

fn is_wrapping_char(c: char) -> bool {
    c.is_whitespace() || matches!(c, '"' | '\'' | '`')
}

/// Cleans a raw candidate into a canonical absolute URL.
///
/// Trims whitespace and quotes, strips markup tags, then keeps the longest
/// prefix matching the URL grammar. Returns `None` when no prefix matches or
/// the host has no dot.
pub fn clean_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim_matches(is_wrapping_char);
    let untagged = markup_tag().replace_all(trimmed, "");
    let untagged = untagged.trim_matches(is_wrapping_char);

    let caps = url_grammar().captures(untagged)?;
    let host = caps.name("host")?.as_str();
    if !host.contains('.') {
        return None;
    }
    let url = caps.get(0)?.as_str();
    Some(url.to_string())
}
