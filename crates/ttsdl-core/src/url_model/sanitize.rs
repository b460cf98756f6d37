//! Filesystem-safe file stems derived from URL text.

/// Longest URL path segment, extension included, kept as a filename base;
/// longer ones fall back to a generic `file_<n>` name.
pub const MAX_NAME_CHARS: usize = 100;

/// Sanitizes a URL-derived file stem for use in a local filename.
///
/// - Replaces NUL, `/`, `\`, whitespace and control characters with `_`
/// - Replaces characters Windows refuses in names (`<>:"|?*`) with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores
///
/// Returns `None` when nothing usable is left or the stem is longer than
/// [`MAX_NAME_CHARS`].
pub fn sanitize_file_stem(stem: &str) -> Option<String> {
    let mut out = String::with_capacity(stem.len());
    let mut prev_underscore = false;

    for c in stem.chars() {
        let unsafe_char = c == '\0'
            || c == '/'
            || c == '\\'
            || c.is_control()
            || c.is_whitespace()
            || matches!(c, '<' | '>' | ':' | '"' | '|' | '?' | '*');
        let c = if unsafe_char { '_' } else { c };

        if c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_CHARS {
        return None;
    }
    Some(trimmed.to_string())
}
