//! Fixed MIME ↔ extension table.

/// Extension that says nothing about the content. Never accepted on its own.
pub const PLACEHOLDER_EXTENSION: &str = ".bin";

const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("image/jpeg", ".jpg"),
    ("image/png", ".png"),
    ("image/gif", ".gif"),
    ("image/webp", ".webp"),
    ("image/bmp", ".bmp"),
    ("application/pdf", ".pdf"),
    ("model/obj", ".obj"),
    ("text/plain", ".txt"),
    ("audio/mpeg", ".mp3"),
    ("audio/ogg", ".ogg"),
    ("audio/wav", ".wav"),
    ("video/mp4", ".mp4"),
    ("application/octet-stream", PLACEHOLDER_EXTENSION),
];

/// Lowercases a `Content-Type` value and drops parameters (`; charset=...`).
pub fn normalize_content_type(raw: &str) -> Option<String> {
    let mime = raw.split(';').next()?.trim().to_ascii_lowercase();
    if mime.is_empty() {
        None
    } else {
        Some(mime)
    }
}

/// Extension for a (normalized) MIME type, including the placeholder `.bin`.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    MIME_EXTENSIONS
        .iter()
        .find(|(m, _)| *m == mime)
        .map(|(_, ext)| *ext)
}

/// MIME type for a lowercased extension with leading dot.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    if ext == ".jpeg" {
        return Some("image/jpeg");
    }
    MIME_EXTENSIONS
        .iter()
        .find(|(_, e)| *e == ext)
        .map(|(m, _)| *m)
}

/// True if a URL extension is trusted as a type hint. `.bin` never is.
pub fn is_known_extension(ext: &str) -> bool {
    ext != PLACEHOLDER_EXTENSION && mime_for_extension(ext).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_parameters_dropped() {
        assert_eq!(
            normalize_content_type("Image/PNG; charset=binary").as_deref(),
            Some("image/png")
        );
        assert_eq!(normalize_content_type("  "), None);
    }

    #[test]
    fn mime_lookup_both_ways() {
        assert_eq!(extension_for_mime("image/jpeg"), Some(".jpg"));
        assert_eq!(extension_for_mime("application/octet-stream"), Some(".bin"));
        assert_eq!(extension_for_mime("application/x-unknown"), None);
        assert_eq!(mime_for_extension(".jpeg"), Some("image/jpeg"));
        assert_eq!(mime_for_extension(".obj"), Some("model/obj"));
    }

    #[test]
    fn placeholder_is_not_known() {
        assert!(is_known_extension(".png"));
        assert!(is_known_extension(".jpeg"));
        assert!(!is_known_extension(".bin"));
        assert!(!is_known_extension(".unity3d"));
    }
}
