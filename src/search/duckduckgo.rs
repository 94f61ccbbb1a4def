//! DuckDuckGo web search tool.
//!
//! Uses the HTML endpoint, which needs no API key, and extracts result
//! titles, snippets and URLs from the page markup.

use crate::error::{Result, SvarError};
use tracing::warn;

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

/// DuckDuckGo HTML search client.
pub struct DuckDuckGoSearch {
    http: reqwest::Client,
    max_results: usize,
}

impl DuckDuckGoSearch {
    /// Create a new web search client.
    pub fn new(http: reqwest::Client, max_results: usize) -> Self {
        Self { http, max_results }
    }

    /// Search the web for recent results.
    pub async fn search(&self, query: &str) -> String {
        match self.run(query).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Web search failed: {}", e);
                format!("Web search failed: {}", e)
            }
        }
    }

    async fn run(&self, query: &str) -> Result<String> {
        let html = self
            .http
            .get(SEARCH_URL)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| SvarError::Search(format!("Search request failed: {}", e)))?
            .text()
            .await?;

        let results = extract_results(&html, self.max_results);

        if results.is_empty() {
            Ok(format!("No results found for: {}", query))
        } else {
            Ok(results.join("\n\n"))
        }
    }
}

/// Extract result blocks from the DuckDuckGo HTML page.
fn extract_results(html: &str, max_results: usize) -> Vec<String> {
    let mut results = Vec::new();

    for chunk in html.split("class=\"result__body\"").skip(1) {
        if results.len() >= max_results {
            break;
        }

        let title = field(chunk, "class=\"result__a\"").unwrap_or_default();
        let snippet = field(chunk, "class=\"result__snippet\"").unwrap_or_default();
        let url = field(chunk, "class=\"result__url\"")
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        if !title.is_empty() {
            results.push(format!(
                "{}\n{}\nURL: {}",
                html_decode(&title),
                html_decode(&snippet),
                url
            ));
        }
    }

    results
}

/// Extract the text content of the first element carrying `marker`.
fn field(chunk: &str, marker: &str) -> Option<String> {
    chunk
        .split(marker)
        .nth(1)?
        .split('>')
        .nth(1)?
        .split('<')
        .next()
        .map(|s| s.to_string())
}

/// Basic HTML entity decoding.
fn html_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <div class="result__body">
            <a class="result__a" href="/x">First &amp; Best</a>
            <a class="result__snippet" href="/x">A useful snippet</a>
            <a class="result__url" href="/x"> example.com </a>
        </div>
        <div class="result__body">
            <a class="result__a" href="/y">Second</a>
            <a class="result__snippet" href="/y">Another snippet</a>
            <a class="result__url" href="/y"> example.org </a>
        </div>
    "#;

    #[test]
    fn test_extract_results() {
        let results = extract_results(SAMPLE, 5);
        assert_eq!(results.len(), 2);
        assert!(results[0].starts_with("First & Best\n"));
        assert!(results[0].contains("URL: example.com"));
    }

    #[test]
    fn test_extract_results_respects_limit() {
        let results = extract_results(SAMPLE, 1);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_extract_results_empty_page() {
        assert!(extract_results("<html><body>nothing</body></html>", 5).is_empty());
    }

    #[test]
    fn test_html_decode() {
        assert_eq!(html_decode("a &amp; b &lt;c&gt;"), "a & b <c>");
    }
}
