//! Wikipedia lookup tool.
//!
//! Two-step MediaWiki API flow: full-text search for matching page titles,
//! then plain-text intro extracts for the top pages.

use crate::error::{Result, SvarError};
use serde::Deserialize;
use tracing::warn;

const API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Number of pages summarized per query.
const TOP_PAGES: usize = 3;

/// Wikipedia API client.
pub struct WikipediaClient {
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: std::collections::HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    title: Option<String>,
    extract: Option<String>,
}

impl WikipediaClient {
    /// Create a new Wikipedia client.
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Search Wikipedia and summarize the top matching pages.
    pub async fn search(&self, query: &str) -> String {
        match self.run(query).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Wikipedia lookup failed: {}", e);
                format!("Wikipedia lookup failed: {}", e)
            }
        }
    }

    async fn run(&self, query: &str) -> Result<String> {
        let titles = self.search_titles(query).await?;

        if titles.is_empty() {
            return Ok(format!("No Wikipedia results found for: {}", query));
        }

        let pages = self.fetch_extracts(&titles).await?;

        let blocks: Vec<String> = titles
            .iter()
            .filter_map(|title| {
                let page = pages
                    .iter()
                    .find(|p| p.title.as_deref() == Some(title.as_str()))?;
                let extract = page.extract.as_deref()?.trim();
                if extract.is_empty() {
                    return None;
                }
                Some(format!("Page: {}\nSummary: {}", title, extract))
            })
            .collect();

        if blocks.is_empty() {
            Ok(format!("No Wikipedia results found for: {}", query))
        } else {
            Ok(blocks.join("\n\n"))
        }
    }

    async fn search_titles(&self, query: &str) -> Result<Vec<String>> {
        let limit = TOP_PAGES.to_string();
        let response: SearchResponse = self
            .http
            .get(API_URL)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", &limit),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| SvarError::Search(format!("Wikipedia search failed: {}", e)))?
            .json()
            .await?;

        Ok(response
            .query
            .map(|q| q.search.into_iter().map(|h| h.title).collect())
            .unwrap_or_default())
    }

    async fn fetch_extracts(&self, titles: &[String]) -> Result<Vec<ExtractPage>> {
        let joined = titles.join("|");
        let response: ExtractResponse = self
            .http
            .get(API_URL)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("exintro", "1"),
                ("titles", joined.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| SvarError::Search(format!("Wikipedia extract failed: {}", e)))?
            .json()
            .await?;

        Ok(response
            .query
            .map(|q| q.pages.into_values().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_parses() {
        let json = r#"{"query":{"search":[{"title":"Rust (programming language)"},{"title":"Rust"}]}}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let titles: Vec<String> = response
            .query
            .map(|q| q.search.into_iter().map(|h| h.title).collect())
            .unwrap_or_default();
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0], "Rust (programming language)");
    }

    #[test]
    fn test_extract_response_parses() {
        let json = r#"{"query":{"pages":{"123":{"title":"Rust","extract":"A language."}}}}"#;
        let response: ExtractResponse = serde_json::from_str(json).unwrap();
        let pages: Vec<ExtractPage> = response.query.unwrap().pages.into_values().collect();
        assert_eq!(pages[0].extract.as_deref(), Some("A language."));
    }

    #[test]
    fn test_empty_response_yields_no_titles() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.query.is_none());
    }
}
