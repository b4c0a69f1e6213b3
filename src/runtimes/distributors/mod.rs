//! JDK distributors
//!
//! A distributor lists the Java versions it publishes and resolves a
//! (version, architecture) pair to a downloadable archive. Distributors are
//! registered in a [`Distributors`] table under a stable id; the pipeline
//! only ever sees `&dyn Distributor`.

mod adoptium;

use async_trait::async_trait;
use serde::Serialize;

use crate::core::{Architecture, Result};

pub use adoptium::AdoptiumDistributor;

/// A version offered by a distributor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    pub version: String,
    pub lts: bool,
}

/// Archive a distributor resolved for one version/architecture pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub size_bytes: u64,
    /// `https://` for remote archives, `file://` for local mirrors
    pub url: String,
    pub architecture: Architecture,
    /// Lowercase hex SHA-256, when the distributor publishes one
    pub sha256: Option<String>,
}

#[async_trait]
pub trait Distributor: Send + Sync {
    /// Stable lookup key (`adoptium`)
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Versions available for download, newest first
    async fn list_available_versions(&self) -> Result<Vec<Release>>;

    /// Resolve the archive for `version` on `arch`
    async fn resolve_download(&self, version: &str, arch: Architecture)
    -> Result<DownloadArtifact>;
}

/// List a distributor's versions, degrading to an empty list on failure.
///
/// The failure is logged as a warning; callers still accept a version typed
/// in directly.
pub async fn list_versions_or_empty(distributor: &dyn Distributor) -> Vec<Release> {
    match distributor.list_available_versions().await {
        Ok(releases) => releases,
        Err(e) => {
            tracing::warn!(
                "Could not fetch versions from {}: {e}",
                distributor.name()
            );
            Vec::new()
        }
    }
}

/// Lookup table of known distributors, in menu order
pub struct Distributors {
    entries: Vec<Box<dyn Distributor>>,
}

impl Distributors {
    /// Empty table
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Table with every distributor jv ships
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.register(Box::new(AdoptiumDistributor::new()));
        table
    }

    /// Add a distributor; an existing entry with the same id is replaced
    pub fn register(&mut self, distributor: Box<dyn Distributor>) {
        if let Some(slot) = self
            .entries
            .iter_mut()
            .find(|d| d.id().eq_ignore_ascii_case(distributor.id()))
        {
            *slot = distributor;
        } else {
            self.entries.push(distributor);
        }
    }

    /// Find by id (case-insensitive) or by 1-based menu position
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&dyn Distributor> {
        let key = key.trim();
        if let Ok(index) = key.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|i| self.entries.get(i))
                .map(AsRef::as_ref);
        }
        self.entries
            .iter()
            .find(|d| d.id().eq_ignore_ascii_case(key))
            .map(AsRef::as_ref)
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|d| d.id()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Distributors {
    fn default() -> Self {
        Self::builtin()
    }
}
