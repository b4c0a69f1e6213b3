//! Installation pipeline
//!
//! resolve -> download -> verify -> unpack -> record -> persist.
//!
//! Each step is a commit point; nothing is rolled back. A failed download or
//! extraction leaves the registry untouched. A failed registry save after a
//! successful unpack only warns: the JDK stays on disk under the install base,
//! which the detector scans, so it is found again on the next `jv list`.
//! The pipeline never touches `JAVA_HOME`.

use std::fs;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use jiff::Timestamp;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use crate::config::{InstalledRecord, Registry, Settings};
use crate::core::http::download_client;
use crate::core::paths::normalize_path;
use crate::core::{Architecture, JvError, Result, Scope, extract_auto_strip};
use crate::runtimes::common::validate_version;
use crate::runtimes::detect::resolve_installation_root;
use crate::runtimes::distributors::{DownloadArtifact, Distributor};

/// Progress bar style for downloads
pub fn download_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░")
}

/// Progress spinner style for extraction
pub fn extract_progress_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn io_error_at(path: &Path, e: std::io::Error) -> JvError {
    if e.kind() == std::io::ErrorKind::PermissionDenied {
        JvError::PermissionDenied(format!("cannot write to {}", path.display()))
    } else {
        JvError::Io(e)
    }
}

/// Fail unless `destination` is absent or an empty directory (which is
/// removed so the staged tree can be renamed into place).
fn ensure_destination_free(destination: &Path) -> Result<()> {
    let mut entries = match fs::read_dir(destination) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(_) => {
            return Err(JvError::Extract(format!(
                "{} already exists and is not a directory",
                destination.display()
            )));
        }
    };

    if entries.next().is_some() {
        return Err(JvError::Extract(format!(
            "{} already exists and is not empty",
            destination.display()
        )));
    }
    fs::remove_dir(destination).map_err(|e| io_error_at(destination, e))
}

/// File name the downloaded archive is stored under; keeps the extension
/// extraction relies on and drops any directory part
fn archive_file_name(artifact: &DownloadArtifact) -> String {
    Path::new(&artifact.file_name)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| {
            if artifact.url.ends_with(".zip") {
                "jdk.zip".to_string()
            } else {
                "jdk.tar.gz".to_string()
            }
        })
}

/// Fetch `artifact` into `dest`. `file://` locators are copied.
pub async fn download_artifact(
    artifact: &DownloadArtifact,
    dest: &Path,
    show_progress: bool,
) -> Result<()> {
    if let Some(local) = artifact.url.strip_prefix("file://") {
        tokio::fs::copy(local, dest)
            .await
            .map_err(|e| JvError::Download(format!("{local}: {e}")))?;
        return Ok(());
    }

    let response = download_client()
        .get(&artifact.url)
        .send()
        .await
        .map_err(|e| JvError::Download(format!("failed to reach {}: {e}", artifact.url)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(JvError::Download(format!(
            "HTTP {status} for {}",
            artifact.url
        )));
    }

    let total_size = response.content_length().unwrap_or(artifact.size_bytes);
    let pb = if show_progress {
        ProgressBar::new(total_size)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(download_progress_style());

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| JvError::Download(format!("cannot create {}: {e}", dest.display())))?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;
    while let Some(item) = stream.next().await {
        let chunk = item.map_err(|e| JvError::Download(format!("interrupted: {e}")))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| JvError::Download(format!("write failed: {e}")))?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    file.flush()
        .await
        .map_err(|e| JvError::Download(format!("write failed: {e}")))?;
    pb.finish_and_clear();
    Ok(())
}

/// Check size and SHA-256 of a downloaded archive against the artifact
pub fn verify_artifact(path: &Path, artifact: &DownloadArtifact) -> Result<()> {
    let actual_size = fs::metadata(path)
        .map_err(|e| JvError::Download(format!("{}: {e}", path.display())))?
        .len();
    if artifact.size_bytes > 0 && actual_size != artifact.size_bytes {
        return Err(JvError::Download(format!(
            "size mismatch for {}: expected {} bytes, got {actual_size}",
            artifact.file_name, artifact.size_bytes
        )));
    }

    if let Some(expected) = &artifact.sha256 {
        let mut file = fs::File::open(path)
            .map_err(|e| JvError::Download(format!("{}: {e}", path.display())))?;
        let mut hasher = Sha256::new();
        std::io::copy(&mut file, &mut hasher)
            .map_err(|e| JvError::Download(format!("{}: {e}", path.display())))?;
        let actual: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(JvError::Download(format!(
                "checksum mismatch for {}: expected {expected}, got {actual}",
                artifact.file_name
            )));
        }
        tracing::debug!("Checksum verified for {}", artifact.file_name);
    }
    Ok(())
}

/// Unpack into a staging directory under `base`, then rename it to
/// `destination`. Returns the JDK root inside `destination`.
fn unpack_into(archive: &Path, base: &Path, destination: &Path) -> Result<PathBuf> {
    let staging = tempfile::Builder::new()
        .prefix(".jv-staging-")
        .tempdir_in(base)
        .map_err(|e| io_error_at(base, e))?;

    extract_auto_strip(archive, staging.path(), 1)?;
    let layout = resolve_installation_root(staging.path()).ok_or_else(|| {
        JvError::Extract(format!(
            "{} does not contain a JDK (bin/java missing)",
            archive.display()
        ))
    })?;
    let relative_root = layout
        .strip_prefix(staging.path())
        .map(Path::to_path_buf)
        .unwrap_or_default();

    ensure_destination_free(destination)?;
    let staged = staging.keep();
    if let Err(e) = fs::rename(&staged, destination) {
        let _ = fs::remove_dir_all(&staged);
        return Err(JvError::Extract(format!(
            "cannot move JDK into {}: {e}",
            destination.display()
        )));
    }

    if relative_root.as_os_str().is_empty() {
        Ok(destination.to_path_buf())
    } else {
        Ok(destination.join(relative_root))
    }
}

pub struct Installer<'a> {
    registry: &'a mut Registry,
    system_base: PathBuf,
    user_base: PathBuf,
    show_progress: bool,
}

impl<'a> Installer<'a> {
    #[must_use]
    pub fn new(registry: &'a mut Registry, settings: &Settings) -> Self {
        Self::with_bases(
            registry,
            settings.system_install_dir.clone(),
            settings.user_install_dir.clone(),
        )
    }

    #[must_use]
    pub fn with_bases(registry: &'a mut Registry, system_base: PathBuf, user_base: PathBuf) -> Self {
        Self {
            registry,
            system_base,
            user_base,
            show_progress: false,
        }
    }

    /// Draw download progress on stderr
    #[must_use]
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    #[must_use]
    pub fn base_dir(&self, is_privileged: bool) -> &Path {
        if is_privileged {
            &self.system_base
        } else {
            &self.user_base
        }
    }

    /// `<base>/<distributor-id>-<version>`
    #[must_use]
    pub fn destination(&self, distributor_id: &str, version: &str, is_privileged: bool) -> PathBuf {
        self.base_dir(is_privileged)
            .join(format!("{distributor_id}-{version}"))
    }

    /// Download and unpack `version` from `distributor`, then record it
    pub async fn install(
        &mut self,
        distributor: &dyn Distributor,
        version: &str,
        arch: Architecture,
        is_privileged: bool,
    ) -> Result<InstalledRecord> {
        let version = version.trim();
        validate_version(version)?;

        let base = self.base_dir(is_privileged).to_path_buf();
        let destination = self.destination(distributor.id(), version, is_privileged);
        ensure_destination_free(&destination)?;

        let artifact = distributor.resolve_download(version, arch).await?;
        tracing::info!(
            "Installing {} {version} ({arch}) from {}",
            distributor.name(),
            artifact.url
        );

        tokio::fs::create_dir_all(&base)
            .await
            .map_err(|e| io_error_at(&base, e))?;
        let download_dir = tempfile::Builder::new()
            .prefix(".jv-download-")
            .tempdir_in(&base)
            .map_err(|e| io_error_at(&base, e))?;
        let archive = download_dir.path().join(archive_file_name(&artifact));

        download_artifact(&artifact, &archive, self.show_progress).await?;

        let verify_archive = archive.clone();
        let verify_target = artifact.clone();
        tokio::task::spawn_blocking(move || verify_artifact(&verify_archive, &verify_target))
            .await
            .map_err(|e| JvError::Download(format!("verification task failed: {e}")))??;

        let spinner = if self.show_progress {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        spinner.set_style(extract_progress_style());
        spinner.set_message(format!("Extracting {}", artifact.file_name));
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));

        let unpack_dest = destination.clone();
        let root = tokio::task::spawn_blocking(move || unpack_into(&archive, &base, &unpack_dest))
            .await
            .map_err(|e| JvError::Extract(format!("extraction task failed: {e}")))??;
        spinner.finish_and_clear();
        drop(download_dir);

        let root = normalize_path(&root);
        tracing::info!("Unpacked into {}", root.display());

        let record = InstalledRecord {
            version: version.to_string(),
            path: root.clone(),
            distributor: distributor.name().to_string(),
            installed_at: Timestamp::now(),
            scope: Scope::for_privilege(is_privileged),
        };
        self.registry.add_installed_record(record.clone());
        self.registry.add_custom_path(&root);

        if let Err(e) = self.registry.save() {
            tracing::warn!(
                "Java {version} is installed at {} but the registry could not be saved: {e}",
                root.display()
            );
        }

        Ok(record)
    }
}
