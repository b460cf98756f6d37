//! Destination filenames.
//!
//! Typed fields are named after their tag (`MeshAsset_3.obj`); generic
//! assets keep their URL stem (`deck_3.png`). Collisions get a `_<n>`
//! counter appended to the unsuffixed base.

use std::path::{Path, PathBuf};

use crate::catalog::FieldTypeTag;
use crate::url_model::{filename_from_url_path, sanitize_file_stem, url_file_stem, MAX_NAME_CHARS};

/// Picks collision-free names inside one destination directory.
#[derive(Debug, Clone)]
pub struct FileNamer {
    dir: PathBuf,
}

impl FileNamer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Base name (no extension) for the record at 1-based `index`.
    pub fn base_name(tag: FieldTypeTag, url: &str, index: usize) -> String {
        if tag.is_typed() {
            return format!("{}_{}", tag, index);
        }
        let stem = filename_from_url_path(url)
            .filter(|segment| segment.chars().count() <= MAX_NAME_CHARS)
            .and_then(|_| url_file_stem(url))
            .and_then(|s| sanitize_file_stem(&s));
        match stem {
            Some(stem) => format!("{}_{}", stem, index),
            None => format!("file_{}", index),
        }
    }

    /// Free path for `base` + `ext`, see [`unique_path`].
    pub fn next_path(&self, tag: FieldTypeTag, url: &str, index: usize, ext: &str) -> PathBuf {
        unique_path(&self.dir, &Self::base_name(tag, url, index), ext)
    }
}

/// Returns `dir/base+ext` if nothing exists there, else the first free
/// `dir/base_<n>+ext` for n = 1, 2, ...
pub fn unique_path(dir: &Path, base: &str, ext: &str) -> PathBuf {
    let candidate = dir.join(format!("{}{}", base, ext));
    if !candidate.exists() {
        return candidate;
    }
    let mut counter: u32 = 1;
    loop {
        let candidate = dir.join(format!("{}_{}{}", base, counter, ext));
        if !candidate.exists() {
            tracing::debug!(path = %candidate.display(), "name collision resolved");
            return candidate;
        }
        counter += 1;
    }
}
