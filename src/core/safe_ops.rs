//! Crash-safe file replacement
//!
//! The registry and the profile script are rewritten in full on every save.
//! Both go through [`atomic_write_file_sync`] so a reader never observes a
//! half-written file.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Write `contents` to `path` by filling a sibling temporary file and
/// renaming it over the target.
///
/// The temporary file lives in the target's directory so the final rename
/// never crosses a filesystem boundary.
pub fn atomic_write_file_sync<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    contents: C,
) -> std::io::Result<()> {
    let path = path.as_ref();

    if path.as_os_str().is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Path cannot be empty",
        ));
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(contents.as_ref())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_parent_and_writes() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested/dir/file.json");

        atomic_write_file_sync(&target, b"{}").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"{}");
    }

    #[test]
    fn replaces_existing_and_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("file.json");
        std::fs::write(&target, b"old contents").unwrap();

        atomic_write_file_sync(&target, b"new").unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"new");
        let leftovers = std::fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn empty_path_is_rejected() {
        assert!(atomic_write_file_sync("", b"x").is_err());
    }
}
