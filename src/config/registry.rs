//! Persisted registry of known JDK locations
//!
//! One JSON document per user (`jv.json`) holding:
//! - `custom_paths`: installation roots added explicitly (`jv add`)
//! - `search_paths`: extra directories the detector scans (`jv add-path`)
//! - `installed_jdks`: JDKs installed by jv itself, keyed by path
//!
//! Path membership compares normalized paths (case-insensitively on Windows
//! and macOS), and every add/remove is idempotent.

use std::path::{Path, PathBuf};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::core::paths::{self, normalize_path, same_path};
use crate::core::safe_ops::atomic_write_file_sync;
use crate::core::{JvError, Result, Scope};

/// A JDK installed by the installation pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledRecord {
    pub version: String,
    pub path: PathBuf,
    pub distributor: String,
    pub installed_at: Timestamp,
    pub scope: Scope,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Registry {
    custom_paths: Vec<PathBuf>,
    search_paths: Vec<PathBuf>,
    #[serde(rename = "installed_jdks")]
    installed_records: Vec<InstalledRecord>,
    #[serde(skip)]
    file: PathBuf,
}

impl Registry {
    /// Empty registry that will be saved to `file`
    #[must_use]
    pub fn empty_at(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    /// Load the registry from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(paths::registry_path())
    }

    /// Load the registry from `file`; a missing file yields an empty registry
    pub fn load_from(file: impl Into<PathBuf>) -> Result<Self> {
        let file = file.into();

        let content = match std::fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No registry at {}, starting empty", file.display());
                return Ok(Self::empty_at(file));
            }
            Err(e) => return Err(JvError::registry(&file, e)),
        };

        let parsed: Self =
            serde_json::from_str(&content).map_err(|e| JvError::registry(&file, e))?;

        // Hand-edited files may carry duplicates; fold them through the same
        // normalization the add_* operations apply.
        let mut registry = Self::empty_at(file);
        for path in parsed.custom_paths {
            registry.add_custom_path(&path);
        }
        for path in parsed.search_paths {
            registry.add_search_path(&path);
        }
        for record in parsed.installed_records {
            registry.add_installed_record(record);
        }
        Ok(registry)
    }

    /// Persist the registry, replacing the previous file atomically
    pub fn save(&self) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| JvError::registry(&self.file, e))?;
        atomic_write_file_sync(&self.file, json).map_err(|e| JvError::registry(&self.file, e))?;
        tracing::debug!("Saved registry to {}", self.file.display());
        Ok(())
    }

    /// Location this registry loads from and saves to
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file
    }

    #[must_use]
    pub fn custom_paths(&self) -> &[PathBuf] {
        &self.custom_paths
    }

    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    #[must_use]
    pub fn installed_records(&self) -> &[InstalledRecord] {
        &self.installed_records
    }

    /// Add an installation root. Returns false if it was already present.
    pub fn add_custom_path(&mut self, path: &Path) -> bool {
        add_unique(&mut self.custom_paths, path)
    }

    /// Remove an installation root together with its install record.
    /// Returns false if the path was not registered.
    pub fn remove_custom_path(&mut self, path: &Path) -> bool {
        let removed = remove_matching(&mut self.custom_paths, path);
        if removed {
            self.remove_installed_record(path);
        }
        removed
    }

    #[must_use]
    pub fn has_custom_path(&self, path: &Path) -> bool {
        self.custom_paths.iter().any(|p| same_path(p, path))
    }

    /// Add a directory to scan. Returns false if it was already present.
    pub fn add_search_path(&mut self, path: &Path) -> bool {
        add_unique(&mut self.search_paths, path)
    }

    /// Returns false if the directory was not registered.
    pub fn remove_search_path(&mut self, path: &Path) -> bool {
        remove_matching(&mut self.search_paths, path)
    }

    #[must_use]
    pub fn has_search_path(&self, path: &Path) -> bool {
        self.search_paths.iter().any(|p| same_path(p, path))
    }

    /// Track a JDK installed by jv. A record for the same path is replaced.
    pub fn add_installed_record(&mut self, mut record: InstalledRecord) {
        record.path = normalize_path(&record.path);
        self.installed_records
            .retain(|r| !same_path(&r.path, &record.path));
        self.installed_records.push(record);
    }

    pub fn remove_installed_record(&mut self, path: &Path) -> bool {
        let before = self.installed_records.len();
        self.installed_records.retain(|r| !same_path(&r.path, path));
        self.installed_records.len() != before
    }

    /// Install record for `path`, if jv installed it
    #[must_use]
    pub fn record_for(&self, path: &Path) -> Option<&InstalledRecord> {
        self.installed_records
            .iter()
            .find(|r| same_path(&r.path, path))
    }
}

fn add_unique(set: &mut Vec<PathBuf>, path: &Path) -> bool {
    if set.iter().any(|p| same_path(p, path)) {
        return false;
    }
    set.push(normalize_path(path));
    true
}

fn remove_matching(set: &mut Vec<PathBuf>, path: &Path) -> bool {
    let before = set.len();
    set.retain(|p| !same_path(p, path));
    set.len() != before
}
