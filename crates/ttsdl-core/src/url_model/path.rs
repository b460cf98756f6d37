//! Filename hints taken from the URL path.

use std::path::Path;

/// Extracts the last path segment from a URL for use as a filename hint.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// Lowercased extension (with leading dot) of the URL's last path segment.
///
/// `https://x.com/a/Card.PNG?v=1` → `.png`; no segment or no extension → `None`.
pub fn url_extension(url: &str) -> Option<String> {
    let segment = filename_from_url_path(url)?;
    let ext = Path::new(&segment).extension()?.to_str()?;
    if ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}

/// Last path segment without its extension (`/a/deck.png` → `deck`).
pub fn url_file_stem(url: &str) -> Option<String> {
    let segment = filename_from_url_path(url)?;
    let stem = Path::new(&segment).file_stem()?.to_str()?;
    Some(stem.to_string())
}
