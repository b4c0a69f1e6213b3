//! Eclipse Adoptium (Temurin) distributor
//!
//! Talks to the Adoptium v3 API: `info/available_releases` for the version
//! menu, `assets/latest/{feature}/hotspot` for a bare major version and
//! `assets/version/{version}` for an exact one. An exact request only
//! resolves to a release whose name carries that version.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Deserialize;

use super::{DownloadArtifact, Distributor, Release};
use crate::core::http::shared_client;
use crate::core::{Architecture, JvError, Result};
use crate::runtimes::common::{dotted_numeric, version_cmp};

const ADOPTIUM_API: &str = "https://api.adoptium.net/v3";

#[derive(Debug, Deserialize)]
struct AvailableReleases {
    available_lts_releases: Vec<u32>,
    available_releases: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct AdoptiumAsset {
    binary: AdoptiumBinary,
}

/// Entry of `assets/version/{version}`
#[derive(Debug, Deserialize)]
struct AdoptiumRelease {
    release_name: String,
    #[serde(default)]
    binaries: Vec<AdoptiumBinary>,
}

#[derive(Debug, Deserialize)]
struct AdoptiumBinary {
    package: AdoptiumPackage,
}

#[derive(Debug, Deserialize)]
struct AdoptiumPackage {
    link: String,
    name: String,
    #[serde(default)]
    size: u64,
    checksum: Option<String>,
}

pub struct AdoptiumDistributor {
    base_url: String,
    client: reqwest::Client,
}

impl AdoptiumDistributor {
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(ADOPTIUM_API)
    }

    /// Point at a mirror or a test server
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: shared_client().clone(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        tracing::debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| JvError::Network(format!("failed to reach Adoptium: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(JvError::Network(format!("Adoptium returned HTTP {status}")));
        }

        response
            .json()
            .await
            .map(Some)
            .map_err(|e| JvError::Network(format!("unusable Adoptium response: {e}")))
    }
}

impl Default for AdoptiumDistributor {
    fn default() -> Self {
        Self::new()
    }
}

/// Adoptium's `os` query value for the running platform
fn adoptium_os() -> Option<&'static str> {
    match std::env::consts::OS {
        "linux" => Some("linux"),
        "macos" => Some("mac"),
        "windows" => Some("windows"),
        "aix" => Some("aix"),
        "solaris" => Some("solaris"),
        _ => None,
    }
}

fn releases_from(available: AvailableReleases) -> Vec<Release> {
    let lts: HashSet<u32> = available.available_lts_releases.into_iter().collect();

    let mut releases: Vec<Release> = available
        .available_releases
        .into_iter()
        .map(|v| Release {
            version: v.to_string(),
            lts: lts.contains(&v),
        })
        .collect();

    releases.sort_by(|a, b| version_cmp(&b.version, &a.version));
    releases
}

fn artifact_from(assets: Vec<AdoptiumAsset>, arch: Architecture) -> Option<DownloadArtifact> {
    let package = assets.into_iter().next()?.binary.package;
    Some(package_artifact(package, arch))
}

/// Whether `release_name` (`jdk-17.0.9+9`) is the build `version` asks for
fn release_matches(release_name: &str, version: &str) -> bool {
    let name = release_name.strip_prefix("jdk-").unwrap_or(release_name);
    name == version || dotted_numeric(name).is_some_and(|numeric| numeric == version)
}

fn exact_artifact_from(
    releases: Vec<AdoptiumRelease>,
    version: &str,
    arch: Architecture,
) -> Option<DownloadArtifact> {
    let release = releases
        .into_iter()
        .find(|r| release_matches(&r.release_name, version))?;
    let package = release.binaries.into_iter().next()?.package;
    Some(package_artifact(package, arch))
}

/// A bare feature release (`21`) resolves to its latest build
fn feature_release(version: &str) -> Option<u32> {
    if version.chars().all(|c| c.is_ascii_digit()) {
        version.parse().ok()
    } else {
        None
    }
}

fn package_artifact(package: AdoptiumPackage, arch: Architecture) -> DownloadArtifact {
    DownloadArtifact {
        file_name: package.name,
        size_bytes: package.size,
        url: package.link,
        architecture: arch,
        sha256: package.checksum.map(|c| c.to_lowercase()),
    }
}

#[async_trait]
impl Distributor for AdoptiumDistributor {
    fn id(&self) -> &str {
        "adoptium"
    }

    fn name(&self) -> &str {
        "Eclipse Adoptium (Temurin)"
    }

    async fn list_available_versions(&self) -> Result<Vec<Release>> {
        let url = format!("{}/info/available_releases", self.base_url);
        let available: AvailableReleases = self
            .get_json(&url)
            .await?
            .ok_or_else(|| JvError::Network("Adoptium release list not found".to_string()))?;
        Ok(releases_from(available))
    }

    async fn resolve_download(
        &self,
        version: &str,
        arch: Architecture,
    ) -> Result<DownloadArtifact> {
        let not_found = || JvError::NotFound {
            distributor: self.id().to_string(),
            version: version.to_string(),
            arch: arch.to_string(),
        };

        let os = adoptium_os().ok_or_else(|| {
            JvError::InvalidInput(format!(
                "Adoptium publishes no builds for {}",
                std::env::consts::OS
            ))
        })?;
        let filters = format!("architecture={arch}&image_type=jdk&os={os}&vendor=eclipse");

        if let Some(feature) = feature_release(version) {
            let url = format!("{}/assets/latest/{feature}/hotspot?{filters}", self.base_url);
            let assets: Vec<AdoptiumAsset> = self.get_json(&url).await?.unwrap_or_default();
            return artifact_from(assets, arch).ok_or_else(not_found);
        }

        let url = format!(
            "{}/assets/version/{}?{filters}&jvm_impl=hotspot&release_type=ga&page_size=20&sort_order=DESC",
            self.base_url,
            version.replace('+', "%2B")
        );
        let releases: Vec<AdoptiumRelease> = self.get_json(&url).await?.unwrap_or_default();
        exact_artifact_from(releases, version, arch).ok_or_else(not_found)
    }
}
