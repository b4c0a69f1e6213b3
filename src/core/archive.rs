//! Pure Rust archive extraction utilities
//!
//! JDK archives wrap everything in a single top-level directory
//! (`jdk-21.0.5+11/`), so callers usually strip one component.
//!
//! Every entry must land inside the destination: `..`, absolute paths and
//! writes through a symlink that leaves the destination fail the extraction.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;

use crate::core::{JvError, Result};

fn extract_err(archive_path: &Path, err: impl std::fmt::Display) -> JvError {
    JvError::Extract(format!("{}: {err}", archive_path.display()))
}

/// Nearest existing ancestor of `path` (or `path` itself), canonicalized
fn existing_ancestor(path: &Path) -> std::io::Result<PathBuf> {
    let mut current = path;
    loop {
        match current.canonicalize() {
            Ok(canonical) => return Ok(canonical),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => match current.parent() {
                Some(parent) => current = parent,
                None => return Err(e),
            },
            Err(e) => return Err(e),
        }
    }
}

/// Where an entry's stripped path lands under `dest_dir`; errors when it would
/// end up outside `root` (the canonical `dest_dir`)
fn contained_destination(
    archive_path: &Path,
    dest_dir: &Path,
    root: &Path,
    relative: &Path,
) -> Result<PathBuf> {
    let escapes = || {
        extract_err(
            archive_path,
            format!("entry {} points outside the destination", relative.display()),
        )
    };

    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(escapes());
    }

    let dest_path = dest_dir.join(relative);
    if let Some(parent) = dest_path.parent() {
        let anchor = existing_ancestor(parent).map_err(|e| extract_err(archive_path, e))?;
        if !anchor.starts_with(root) {
            return Err(escapes());
        }
        fs::create_dir_all(parent)?;
    }
    Ok(dest_path)
}

/// Extract a .tar.gz archive, stripping the first N path components
pub fn extract_tar_gz_strip(archive_path: &Path, dest_dir: &Path, strip: usize) -> Result<()> {
    let file = File::open(archive_path).map_err(|e| extract_err(archive_path, e))?;
    let mut archive = Archive::new(GzDecoder::new(BufReader::new(file)));

    fs::create_dir_all(dest_dir)?;
    let root = dest_dir
        .canonicalize()
        .map_err(|e| extract_err(archive_path, e))?;

    let entries = archive.entries().map_err(|e| extract_err(archive_path, e))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| extract_err(archive_path, e))?;
        let path = entry
            .path()
            .map_err(|e| extract_err(archive_path, e))?
            .into_owned();

        let Some(stripped) = strip_components(&path, strip) else {
            continue;
        };
        let dest_path = contained_destination(archive_path, dest_dir, &root, &stripped)?;

        if entry.header().entry_type().is_dir() {
            fs::create_dir_all(&dest_path)?;
        } else {
            entry
                .unpack(&dest_path)
                .map_err(|e| extract_err(archive_path, e))?;
        }
    }

    Ok(())
}

/// Extract a .zip archive, stripping the first N path components
pub fn extract_zip_strip(archive_path: &Path, dest_dir: &Path, strip: usize) -> Result<()> {
    let file = File::open(archive_path).map_err(|e| extract_err(archive_path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| extract_err(archive_path, e))?;

    fs::create_dir_all(dest_dir)?;
    let root = dest_dir
        .canonicalize()
        .map_err(|e| extract_err(archive_path, e))?;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| extract_err(archive_path, e))?;
        let Some(name) = file.enclosed_name() else {
            return Err(extract_err(
                archive_path,
                format!("entry {} points outside the destination", file.name()),
            ));
        };
        let Some(stripped) = strip_components(&name, strip) else {
            continue;
        };
        let outpath = contained_destination(archive_path, dest_dir, &root, &stripped)?;

        if file.is_dir() {
            fs::create_dir_all(&outpath)?;
        } else {
            let mut outfile = File::create(&outpath)?;
            std::io::copy(&mut file, &mut outfile)?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = file.unix_mode() {
                fs::set_permissions(&outpath, fs::Permissions::from_mode(mode))?;
            }
        }
    }

    Ok(())
}

/// Detect archive type from the file name and extract with strip
pub fn extract_auto_strip(archive_path: &Path, dest_dir: &Path, strip: usize) -> Result<()> {
    let filename = archive_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if filename.ends_with(".tar.gz")
        || Path::new(filename)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("tgz"))
    {
        extract_tar_gz_strip(archive_path, dest_dir, strip)
    } else if Path::new(filename)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
    {
        extract_zip_strip(archive_path, dest_dir, strip)
    } else {
        Err(extract_err(archive_path, "unknown archive format"))
    }
}

fn strip_components(path: &Path, strip: usize) -> Option<PathBuf> {
    let stripped: PathBuf = path.components().skip(strip).collect();
    (!stripped.as_os_str().is_empty()).then_some(stripped)
}
