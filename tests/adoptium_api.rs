//! Adoptium distributor against a stubbed v3 API

#![cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
#![allow(clippy::unwrap_used)]

use jv_lib::core::{Architecture, JvError};
use jv_lib::runtimes::Distributor;
use jv_lib::runtimes::distributors::AdoptiumDistributor;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn release(name: &str, file: &str) -> serde_json::Value {
    json!({
        "release_name": name,
        "binaries": [{
            "architecture": "x64",
            "image_type": "jdk",
            "package": {
                "link": format!("https://downloads.example/{file}"),
                "name": file,
                "size": 1024,
                "checksum": "ABC123"
            }
        }]
    })
}

fn distributor(server: &MockServer) -> AdoptiumDistributor {
    AdoptiumDistributor::with_base_url(format!("{}/v3", server.uri()))
}

/// The latest-build endpoint must never answer an exact version
async fn forbid_latest(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/v3/assets/latest/.*"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn exact_version_without_matching_build_is_not_found() {
    let server = MockServer::start().await;
    forbid_latest(&server).await;
    Mock::given(method("GET"))
        .and(path("/v3/assets/version/17.0.9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([release(
            "jdk-17.0.13+11",
            "OpenJDK17U-jdk_x64_linux_hotspot_17.0.13_11.tar.gz"
        )])))
        .mount(&server)
        .await;

    let err = distributor(&server)
        .resolve_download("17.0.9", Architecture::X64)
        .await
        .unwrap_err();

    assert!(
        matches!(&err, JvError::NotFound { version, .. } if version == "17.0.9"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn exact_version_resolves_its_own_build() {
    let server = MockServer::start().await;
    forbid_latest(&server).await;
    Mock::given(method("GET"))
        .and(path("/v3/assets/version/17.0.9"))
        .and(query_param("architecture", "x64"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            release("jdk-17.0.13+11", "OpenJDK17U-jdk_x64_linux_hotspot_17.0.13_11.tar.gz"),
            release("jdk-17.0.9+9", "OpenJDK17U-jdk_x64_linux_hotspot_17.0.9_9.tar.gz"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let artifact = distributor(&server)
        .resolve_download("17.0.9", Architecture::X64)
        .await
        .unwrap();

    assert_eq!(
        artifact.file_name,
        "OpenJDK17U-jdk_x64_linux_hotspot_17.0.9_9.tar.gz"
    );
    assert_eq!(artifact.sha256.as_deref(), Some("abc123"));
    assert_eq!(artifact.size_bytes, 1024);
}

#[tokio::test]
async fn bare_major_uses_latest_build() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/assets/latest/21/hotspot"))
        .and(query_param("architecture", "aarch64"))
        .and(query_param("image_type", "jdk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "release_name": "jdk-21.0.5+11",
            "binary": {
                "package": {
                    "link": "https://downloads.example/21.tar.gz",
                    "name": "OpenJDK21U-jdk_aarch64_linux_hotspot_21.0.5_11.tar.gz",
                    "size": 2048
                }
            }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let artifact = distributor(&server)
        .resolve_download("21", Architecture::Aarch64)
        .await
        .unwrap();

    assert_eq!(artifact.url, "https://downloads.example/21.tar.gz");
    assert_eq!(artifact.architecture, Architecture::Aarch64);
    assert_eq!(artifact.sha256, None);
}

#[tokio::test]
async fn unknown_major_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/assets/latest/99/hotspot"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = distributor(&server)
        .resolve_download("99", Architecture::X64)
        .await
        .unwrap_err();
    assert!(matches!(err, JvError::NotFound { .. }), "got {err:?}");
}

#[tokio::test]
async fn listing_failure_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/info/available_releases"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = distributor(&server)
        .list_available_versions()
        .await
        .unwrap_err();
    assert!(matches!(err, JvError::Network(_)), "got {err:?}");
}
