//! LLM client configuration for OpenAI-compatible endpoints.
//!
//! The agent talks to an OpenRouter-style endpoint through the standard
//! chat-completions API, so any OpenAI-compatible base URL works here.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for LLM API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an LLM client for the given API base and key.
///
/// Uses a 5-minute timeout by default to prevent hung API calls.
pub fn create_client(api_base: &str, api_key: &str) -> Client<OpenAIConfig> {
    create_client_with_timeout(api_base, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an LLM client with a custom timeout.
pub fn create_client_with_timeout(
    api_base: &str,
    api_key: &str,
    timeout: Duration,
) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    let config = OpenAIConfig::new()
        .with_api_base(api_base)
        .with_api_key(api_key);

    Client::with_config(config).with_http_client(http_client)
}
