//! Google Custom Search tool.

use crate::error::{Result, SvarError};
use serde::Deserialize;
use tracing::warn;

/// Fixed message when credentials are missing.
pub const NOT_CONFIGURED: &str = "Google search is not configured. Set search.google_api_key and search.google_cse_id in the config file.";

const API_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Google Custom Search JSON API client.
pub struct GoogleSearch {
    http: reqwest::Client,
    api_key: Option<String>,
    cse_id: Option<String>,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    title: Option<String>,
    snippet: Option<String>,
    link: Option<String>,
}

impl GoogleSearch {
    /// Create a new Google search client. Credentials are optional; the
    /// tool reports itself unconfigured instead of failing without them.
    pub fn new(
        http: reqwest::Client,
        api_key: Option<String>,
        cse_id: Option<String>,
        max_results: usize,
    ) -> Self {
        Self {
            http,
            api_key,
            cse_id,
            max_results,
        }
    }

    /// Search Google for recent results.
    pub async fn search(&self, query: &str) -> String {
        let (Some(key), Some(cx)) = (self.api_key.as_deref(), self.cse_id.as_deref()) else {
            return NOT_CONFIGURED.to_string();
        };

        match self.run(key, cx, query).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Google search failed: {}", e);
                format!("Google search failed: {}", e)
            }
        }
    }

    async fn run(&self, key: &str, cx: &str, query: &str) -> Result<String> {
        let num = self.max_results.min(10).to_string();
        let response: SearchResponse = self
            .http
            .get(API_URL)
            .query(&[("key", key), ("cx", cx), ("q", query), ("num", &num)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| SvarError::Search(format!("Google API error: {}", e)))?
            .json()
            .await?;

        if response.items.is_empty() {
            return Ok(format!("No results found for: {}", query));
        }

        let formatted = response
            .items
            .iter()
            .take(self.max_results)
            .enumerate()
            .map(|(i, item)| {
                format!(
                    "{}. {}\n   {}\n   {}",
                    i + 1,
                    item.title.as_deref().unwrap_or("No title"),
                    item.snippet.as_deref().unwrap_or(""),
                    item.link.as_deref().unwrap_or(""),
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(formatted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_credentials_reports_unconfigured() {
        let search = GoogleSearch::new(crate::http::create_client(), None, None, 5);
        assert_eq!(search.search("anything").await, NOT_CONFIGURED);
    }

    #[test]
    fn test_response_parses_without_items() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.items.is_empty());
    }
}
