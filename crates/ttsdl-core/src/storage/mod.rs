//! Temp file lifecycle for downloads.
//!
//! Bytes go to `<final>.part`; a finished download is renamed into place,
//! anything else removes the temp file.

mod writer;

pub use writer::StorageWriter;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `MeshAsset_1.obj` → `MeshAsset_1.obj.part`).
pub fn temp_path(final_path: &std::path::Path) -> std::path::PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    std::path::PathBuf::from(o)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("card.png"));
        assert_eq!(p.to_string_lossy(), "card.png.part");
        let p2 = temp_path(Path::new("/tmp/deck/rules.pdf"));
        assert_eq!(p2.to_string_lossy(), "/tmp/deck/rules.pdf.part");
    }

    #[test]
    fn create_write_finalize() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("FrontImage_1.png");
        let tp = temp_path(&final_path);

        let mut writer = StorageWriter::create(&tp).unwrap();
        writer.write_all(b"hello ").unwrap();
        writer.write_all(b"world").unwrap();
        assert_eq!(writer.written(), 11);
        writer.sync().unwrap();
        writer.finalize(&final_path).unwrap();

        assert!(!tp.exists());
        assert_eq!(std::fs::read(&final_path).unwrap(), b"hello world");
    }

    #[test]
    fn discard_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let tp = dir.path().join("x.bin.part");
        let mut writer = StorageWriter::create(&tp).unwrap();
        writer.write_all(b"partial").unwrap();
        assert!(tp.exists());
        writer.discard();
        assert!(!tp.exists());
    }

    #[test]
    fn dropped_writer_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let tp = dir.path().join("y.obj.part");
        {
            let mut writer = StorageWriter::create(&tp).unwrap();
            writer.write_all(b"v 0 0 0").unwrap();
        }
        assert!(!tp.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
