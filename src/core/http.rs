//! Shared HTTP client utilities
//!
//! Centralizes reqwest client configuration so distributor queries and
//! artifact downloads share connection pools and consistent timeouts.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Client;

const USER_AGENT: &str = concat!("jv/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);
const DOWNLOAD_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

static SHARED_CLIENT: LazyLock<Client> =
    LazyLock::new(|| build_client(DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT));
static DOWNLOAD_CLIENT: LazyLock<Client> =
    LazyLock::new(|| build_client(DOWNLOAD_TIMEOUT, DOWNLOAD_CONNECT_TIMEOUT));

/// Build HTTP client with standard configuration.
///
/// # Panics
/// Panics if the TLS backend cannot be initialized. Every value passed to
/// the builder is static, so this only happens on a broken system setup.
#[allow(clippy::expect_used)]
fn build_client(timeout: Duration, connect_timeout: Duration) -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .connect_timeout(connect_timeout)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_nodelay(true)
        .build()
        .expect("Failed to build HTTP client - check TLS configuration")
}

/// Shared client for small API requests.
#[must_use]
pub fn shared_client() -> &'static Client {
    &SHARED_CLIENT
}

/// Shared HTTP client with extended timeouts for JDK archives.
#[must_use]
pub fn download_client() -> &'static Client {
    &DOWNLOAD_CLIENT
}
