//! Byte-signature sniffing on the leading sample of a payload.

use crate::catalog::FieldRole;

/// Number of leading body bytes buffered before a type decision is made.
pub const SAMPLE_LEN: usize = 4096;

pub const JPEG_MIME: &str = "image/jpeg";
pub const PNG_MIME: &str = "image/png";
pub const PDF_MIME: &str = "application/pdf";
pub const MESH_MIME: &str = "model/obj";

/// Type identified from magic bytes or the mesh text heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sniffed {
    pub mime: &'static str,
    pub extension: &'static str,
}

impl Sniffed {
    pub fn is_image(&self) -> bool {
        self.mime == JPEG_MIME || self.mime == PNG_MIME
    }
}

const MAGIC: &[(&[u8], Sniffed)] = &[
    (
        b"\xFF\xD8\xFF",
        Sniffed {
            mime: JPEG_MIME,
            extension: ".jpg",
        },
    ),
    (
        b"\x89PNG\r\n\x1A\n",
        Sniffed {
            mime: PNG_MIME,
            extension: ".png",
        },
    ),
    (
        b"%PDF-",
        Sniffed {
            mime: PDF_MIME,
            extension: ".pdf",
        },
    ),
];

/// Statements an OBJ file typically opens with.
const OBJ_LEADERS: &[&str] = &["#", "v ", "f ", "mtllib ", "o ", "g "];

/// Identifies the payload type from its first bytes.
///
/// Magic numbers are checked for every role; the OBJ text heuristic only runs
/// for mesh fields, since plain text elsewhere proves nothing.
pub fn sniff(sample: &[u8], role: FieldRole) -> Option<Sniffed> {
    let sample = &sample[..sample.len().min(SAMPLE_LEN)];
    if let Some((_, sniffed)) = MAGIC.iter().find(|(magic, _)| sample.starts_with(magic)) {
        return Some(*sniffed);
    }
    if role == FieldRole::Mesh && looks_like_obj(sample) {
        return Some(Sniffed {
            mime: MESH_MIME,
            extension: ".obj",
        });
    }
    None
}

fn looks_like_obj(sample: &[u8]) -> bool {
    let printable = sample
        .iter()
        .all(|&b| b.is_ascii_graphic() || matches!(b, b' ' | b'\n' | b'\r' | b'\t'));
    if !printable {
        return false;
    }
    let Ok(text) = std::str::from_utf8(sample) else {
        return false;
    };
    let text = text.trim_start();
    !text.is_empty() && OBJ_LEADERS.iter().any(|leader| text.starts_with(leader))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_numbers() {
        assert_eq!(sniff(b"\xFF\xD8\xFF\xE0rest", FieldRole::Generic).unwrap().mime, JPEG_MIME);
        assert_eq!(
            sniff(b"\x89PNG\r\n\x1A\n\0\0", FieldRole::Image).unwrap().extension,
            ".png"
        );
        assert_eq!(sniff(b"%PDF-1.7\n", FieldRole::Document).unwrap().mime, PDF_MIME);
        assert_eq!(sniff(b"GIF89a", FieldRole::Generic), None);
    }

    #[test]
    fn obj_heuristic_only_for_mesh() {
        let obj = b"# Blender export\nmtllib table.mtl\nv 0.0 1.0 2.0\n";
        assert_eq!(sniff(obj, FieldRole::Mesh).unwrap().mime, MESH_MIME);
        assert_eq!(sniff(obj, FieldRole::Generic), None);
    }

    #[test]
    fn obj_heuristic_skips_leading_whitespace() {
        assert!(sniff(b"\n\n  v 1 2 3\nf 1 2 3\n", FieldRole::Mesh).is_some());
        assert!(sniff(b"o Cube\n", FieldRole::Mesh).is_some());
    }

    #[test]
    fn obj_heuristic_rejects_binary_and_html() {
        assert_eq!(sniff(b"v 1 2 3\n\x00\x01", FieldRole::Mesh), None);
        assert_eq!(sniff(b"<!DOCTYPE html><html>", FieldRole::Mesh), None);
        assert_eq!(sniff(b"   \n\t", FieldRole::Mesh), None);
        assert_eq!(sniff(b"", FieldRole::Mesh), None);
    }
}
