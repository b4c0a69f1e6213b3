//! Mock implementations for testing

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::fixtures::sha256_file;
use crate::core::{Architecture, JvError, Result};
use crate::env::EnvStore;
use crate::runtimes::distributors::{DownloadArtifact, Distributor, Release};

/// Distributor with canned releases and an optional artifact
pub struct MockDistributor {
    id: String,
    name: String,
    releases: Vec<Release>,
    artifact: Option<DownloadArtifact>,
    fail_listing: bool,
    resolve_calls: AtomicUsize,
}

impl MockDistributor {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: format!("Mock ({id})"),
            id,
            releases: Vec::new(),
            artifact: None,
            fail_listing: false,
            resolve_calls: AtomicUsize::new(0),
        }
    }

    /// Distributor resolving every version to a local archive via `file://`
    pub fn serving_file(id: impl Into<String>, archive: &Path) -> Self {
        let artifact = DownloadArtifact {
            file_name: archive
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            size_bytes: std::fs::metadata(archive).unwrap().len(),
            url: format!("file://{}", archive.display()),
            architecture: Architecture::current().unwrap_or(Architecture::X64),
            sha256: Some(sha256_file(archive)),
        };
        Self::new(id).with_artifact(artifact)
    }

    #[must_use]
    pub fn with_release(mut self, version: &str, lts: bool) -> Self {
        self.releases.push(Release {
            version: version.to_string(),
            lts,
        });
        self
    }

    #[must_use]
    pub fn with_artifact(mut self, artifact: DownloadArtifact) -> Self {
        self.artifact = Some(artifact);
        self
    }

    /// Listing fails with a network error
    #[must_use]
    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// Mutable access to the served artifact (to corrupt size or checksum)
    pub fn artifact_mut(&mut self) -> Option<&mut DownloadArtifact> {
        self.artifact.as_mut()
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Distributor for MockDistributor {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn list_available_versions(&self) -> Result<Vec<Release>> {
        if self.fail_listing {
            return Err(JvError::Network("mock listing unavailable".to_string()));
        }
        Ok(self.releases.clone())
    }

    async fn resolve_download(
        &self,
        version: &str,
        arch: Architecture,
    ) -> Result<DownloadArtifact> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.artifact
            .clone()
            .map(|artifact| DownloadArtifact {
                architecture: arch,
                ..artifact
            })
            .ok_or_else(|| JvError::NotFound {
                distributor: self.id.clone(),
                version: version.to_string(),
                arch: arch.to_string(),
            })
    }
}

/// Environment store kept in memory, with injectable write failures
#[derive(Default)]
pub struct MemoryEnvStore {
    vars: Mutex<HashMap<String, String>>,
    failing: Vec<String>,
    atomic_batches: bool,
    writes: AtomicUsize,
}

impl MemoryEnvStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_var(self, name: &str, value: &str) -> Self {
        self.lock().insert(name.to_string(), value.to_string());
        self
    }

    /// Writes to `name` fail with a path error
    #[must_use]
    pub fn failing_writes_for(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self
    }

    /// Batched writes commit all values or none
    #[must_use]
    pub fn with_atomic_batches(mut self) -> Self {
        self.atomic_batches = true;
        self
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.lock().get(name).cloned()
    }

    /// Successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.vars.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EnvStore for MemoryEnvStore {
    fn read_var(&self, name: &str) -> Result<Option<String>> {
        Ok(self.get(name))
    }

    fn write_var(&self, name: &str, value: &str) -> Result<()> {
        if self.failing.iter().any(|n| n == name) {
            return Err(JvError::Path(format!("simulated failure writing {name}")));
        }
        self.lock().insert(name.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn write_vars(&self, vars: &[(&str, &str)]) -> Result<()> {
        if !self.atomic_batches {
            for (name, value) in vars {
                self.write_var(name, value)?;
            }
            return Ok(());
        }
        if let Some((name, _)) = vars
            .iter()
            .find(|(name, _)| self.failing.iter().any(|n| n == name))
        {
            return Err(JvError::Path(format!("simulated failure writing {name}")));
        }
        let mut stored = self.lock();
        for (name, value) in vars {
            stored.insert((*name).to_string(), (*value).to_string());
        }
        self.writes.fetch_add(vars.len(), Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
