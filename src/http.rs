//! Shared HTTP client construction for the lookup tools.

use std::time::Duration;

/// Default timeout for tool HTTP requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every tool request.
const USER_AGENT: &str = concat!("svar/", env!("CARGO_PKG_VERSION"));

/// Create an HTTP client with the default timeout.
pub fn create_client() -> reqwest::Client {
    create_client_with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an HTTP client with a custom timeout.
pub fn create_client_with_timeout(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client")
}
