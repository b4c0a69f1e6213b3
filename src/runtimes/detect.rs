//! JDK detection
//!
//! Scans the built-in platform directories, the registry's search paths and
//! its custom paths for JDK roots (directories holding `bin/java`). A path
//! reached both by scanning and through `custom_paths` is reported once, as
//! custom.
//!
//! Results are ordered by descending major version; equal majors (and
//! unknown versions, which sort last) are ordered by normalized path
//! ([`path_key`]), ascending. `jv repair --yes` relies on this order when it picks the
//! first installation.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use serde::Serialize;
use wait_timeout::ChildExt;

use crate::config::{Registry, Settings};
use crate::core::paths::{normalize_path, path_key};
use crate::core::{JvError, Result};
use crate::runtimes::common::{
    UNKNOWN_VERSION, java_executable, major_version, parse_release_file, parse_version_output,
};

const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// How an installation was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    AutoDetected,
    CustomRegistered,
}

impl Origin {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AutoDetected => "auto",
            Self::CustomRegistered => "custom",
        }
    }
}

/// A JDK found on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Installation {
    pub version: String,
    pub path: PathBuf,
    pub origin: Origin,
}

impl Installation {
    #[must_use]
    pub fn major(&self) -> Option<u32> {
        major_version(&self.version)
    }

    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.origin == Origin::CustomRegistered
    }
}

/// Conventional JDK parent directories for this platform
#[cfg(windows)]
#[must_use]
pub fn platform_search_roots() -> Vec<PathBuf> {
    [
        r"C:\Program Files\Java",
        r"C:\Program Files (x86)\Java",
        r"C:\Program Files\Eclipse Adoptium",
        r"C:\Program Files\Eclipse Foundation",
        r"C:\Program Files\Zulu",
        r"C:\Program Files\Amazon Corretto",
        r"C:\Program Files\Microsoft",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

/// Conventional JDK parent directories for this platform
#[cfg(not(windows))]
#[must_use]
pub fn platform_search_roots() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = [
        "/usr/lib/jvm",
        "/usr/java",
        "/usr/local/java",
        "/opt/java",
        "/opt/jdk",
        "/Library/Java/JavaVirtualMachines",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect();

    if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".sdkman").join("candidates").join("java"));
        roots.push(home.join(".jdks"));
        roots.push(home.join("Library/Java/JavaVirtualMachines"));
    }
    roots
}

/// Platform roots plus jv's own install bases
#[must_use]
pub fn builtin_search_roots(settings: &Settings) -> Vec<PathBuf> {
    let mut roots = platform_search_roots();
    roots.push(settings.system_install_dir.clone());
    roots.push(settings.user_install_dir.clone());
    roots
}

/// True if `path` is a directory containing `bin/java`
#[must_use]
pub fn is_valid_installation(path: &Path) -> bool {
    path.is_dir() && path.join("bin").join(java_executable()).is_file()
}

/// True if `path` exists and is a directory
#[must_use]
pub fn is_valid_search_path(path: &Path) -> bool {
    path.is_dir()
}

/// Installation root under `candidate`, accepting macOS bundles
/// (`<bundle>/Contents/Home`).
#[must_use]
pub fn resolve_installation_root(candidate: &Path) -> Option<PathBuf> {
    if is_valid_installation(candidate) {
        return Some(candidate.to_path_buf());
    }
    let bundle_home = candidate.join("Contents").join("Home");
    is_valid_installation(&bundle_home).then_some(bundle_home)
}

/// Version of the JDK at `path`, or [`UNKNOWN_VERSION`]
#[must_use]
pub fn get_version(path: &Path) -> String {
    get_version_with_timeout(path, DEFAULT_QUERY_TIMEOUT)
}

/// Version of the JDK at `path`: the `release` manifest first, then
/// `java -version`. Never fails.
#[must_use]
pub fn get_version_with_timeout(path: &Path, timeout: Duration) -> String {
    if let Ok(release) = std::fs::read_to_string(path.join("release"))
        && let Some(version) = parse_release_file(&release)
    {
        return version;
    }

    query_java_version(path, timeout).unwrap_or_else(|| {
        tracing::debug!("Could not determine version of {}", path.display());
        UNKNOWN_VERSION.to_string()
    })
}

fn query_java_version(path: &Path, timeout: Duration) -> Option<String> {
    let java = path.join("bin").join(java_executable());
    let mut child = Command::new(&java)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .ok()?;

    match child.wait_timeout(timeout) {
        Ok(Some(_)) => {}
        Ok(None) | Err(_) => {
            tracing::warn!("{} -version timed out", java.display());
            let _ = child.kill();
            let _ = child.wait();
            return None;
        }
    }

    let mut banner = String::new();
    child.stderr.take()?.read_to_string(&mut banner).ok()?;
    parse_version_output(&banner)
}

/// Pick the installation matching a user query: exact version, then major
/// version, then substring. `installations` is expected in detector order.
#[must_use]
pub fn find_matching<'a>(installations: &'a [Installation], query: &str) -> Option<&'a Installation> {
    let query = query.trim();
    installations
        .iter()
        .find(|i| i.version == query)
        .or_else(|| {
            let major: u32 = query.parse().ok()?;
            installations.iter().find(|i| i.major() == Some(major))
        })
        .or_else(|| installations.iter().find(|i| i.version.contains(query)))
}

/// Detection engine over a registry snapshot
pub struct Detector<'a> {
    registry: &'a Registry,
    builtin_roots: Vec<PathBuf>,
    query_timeout: Duration,
}

impl<'a> Detector<'a> {
    /// Detector scanning the platform directories and jv's install bases
    #[must_use]
    pub fn new(registry: &'a Registry, settings: &Settings) -> Self {
        Self {
            registry,
            builtin_roots: builtin_search_roots(settings),
            query_timeout: settings.version_query_timeout(),
        }
    }

    /// Detector with an explicit list of built-in roots
    #[must_use]
    pub fn with_builtin_roots(registry: &'a Registry, builtin_roots: Vec<PathBuf>) -> Self {
        Self {
            registry,
            builtin_roots,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Discover every installation, deduplicated and ordered
    pub fn find_all(&self) -> Result<Vec<Installation>> {
        let mut found: HashMap<String, (PathBuf, Origin)> = HashMap::new();

        let mut seen_roots = Vec::new();
        let mut existing_roots = 0usize;
        let mut failed_roots = Vec::new();

        let roots = self
            .builtin_roots
            .iter()
            .chain(self.registry.search_paths());
        for root in roots {
            let key = path_key(root);
            if seen_roots.contains(&key) {
                continue;
            }
            seen_roots.push(key);

            let entries = match std::fs::read_dir(root) {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    existing_roots += 1;
                    tracing::warn!("Skipping search path {}: {e}", root.display());
                    failed_roots.push(format!("{}: {e}", root.display()));
                    continue;
                }
            };
            existing_roots += 1;

            for entry in entries.flatten() {
                let child = entry.path();
                if !child.is_dir() {
                    continue;
                }
                if let Some(install_root) = resolve_installation_root(&child) {
                    let install_root = normalize_path(&install_root);
                    tracing::debug!("Detected JDK at {}", install_root.display());
                    found
                        .entry(path_key(&install_root))
                        .or_insert((install_root, Origin::AutoDetected));
                }
            }
        }

        if existing_roots > 0
            && failed_roots.len() == existing_roots
            && self.registry.custom_paths().is_empty()
        {
            return Err(JvError::Scan(failed_roots.join("; ")));
        }

        for custom in self.registry.custom_paths() {
            if !is_valid_installation(custom) {
                tracing::debug!(
                    "Custom path {} is not a valid JDK, skipping",
                    custom.display()
                );
                continue;
            }
            let path = normalize_path(custom);
            found.insert(path_key(&path), (path, Origin::CustomRegistered));
        }

        let mut installations: Vec<(String, Installation)> = found
            .into_iter()
            .map(|(key, (path, origin))| {
                let version = get_version_with_timeout(&path, self.query_timeout);
                (
                    key,
                    Installation {
                        version,
                        path,
                        origin,
                    },
                )
            })
            .collect();

        installations.sort_by(|(a_key, a), (b_key, b)| {
            b.major()
                .cmp(&a.major())
                .then_with(|| a_key.cmp(b_key))
        });

        Ok(installations.into_iter().map(|(_, i)| i).collect())
    }
}
