//! Dataset record access for the attachment cascade.
//!
//! The record source sits behind a trait so the scan strategies can be
//! exercised without the network. The production implementation pages
//! through the dataset server's REST API.

use crate::error::{Result, SvarError};
use async_trait::async_trait;
use serde::Deserialize;

/// Attachment metadata listed on a dataset record.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AttachmentMeta {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// One record from the benchmark dataset.
#[derive(Debug, Clone)]
pub struct DatasetExample {
    /// Task identifier, when the record carries one.
    pub task_id: Option<String>,
    /// Attachment metadata entries, when listed.
    pub attachments: Vec<AttachmentMeta>,
    /// The full record, kept for pretty-printing direct hits.
    pub raw: serde_json::Value,
}

impl DatasetExample {
    /// Build an example from a raw record value.
    pub fn from_row(row: &serde_json::Value) -> Self {
        let task_id = row
            .get("task_id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let attachments = row
            .get("attachments")
            .and_then(|v| v.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| serde_json::from_value(e.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            task_id,
            attachments,
            raw: row.clone(),
        }
    }
}

/// Read access to the benchmark dataset's records.
#[async_trait]
pub trait DatasetReader: Send + Sync {
    /// List the splits advertised for the scan configuration.
    async fn splits(&self) -> Result<Vec<String>>;

    /// Fetch a page of records from a split.
    async fn rows(&self, split: &str, offset: usize, length: usize) -> Result<Vec<DatasetExample>>;

    /// Look up an attachment directly in the dataset's default view, for
    /// datasets that expose an `attachments` mapping keyed by id.
    async fn direct_attachment(&self, attachment_id: &str) -> Result<Option<String>>;
}

/// Dataset reader backed by the Hugging Face datasets server.
pub struct HfDatasetReader {
    http: reqwest::Client,
    server_base: String,
    dataset: String,
    config: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SplitsResponse {
    #[serde(default)]
    splits: Vec<SplitEntry>,
}

#[derive(Debug, Deserialize)]
struct SplitEntry {
    split: String,
}

#[derive(Debug, Deserialize)]
struct RowsResponse {
    #[serde(default)]
    rows: Vec<RowEntry>,
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    row: serde_json::Value,
}

impl HfDatasetReader {
    /// Create a new reader. The access token is explicit configuration,
    /// not ambient process state.
    pub fn new(
        http: reqwest::Client,
        server_base: &str,
        dataset: &str,
        config: &str,
        token: Option<String>,
    ) -> Self {
        Self {
            http,
            server_base: server_base.trim_end_matches('/').to_string(),
            dataset: dataset.to_string(),
            config: config.to_string(),
            token,
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.get(format!("{}/{}", self.server_base, path));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }
}

#[async_trait]
impl DatasetReader for HfDatasetReader {
    async fn splits(&self) -> Result<Vec<String>> {
        let response: SplitsResponse = self
            .get("splits")
            .query(&[("dataset", &self.dataset), ("config", &self.config)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| SvarError::Dataset(format!("Split listing failed: {}", e)))?
            .json()
            .await?;

        Ok(response.splits.into_iter().map(|s| s.split).collect())
    }

    async fn rows(&self, split: &str, offset: usize, length: usize) -> Result<Vec<DatasetExample>> {
        let offset = offset.to_string();
        let length = length.to_string();
        let response: RowsResponse = self
            .get("rows")
            .query(&[
                ("dataset", self.dataset.as_str()),
                ("config", self.config.as_str()),
                ("split", split),
                ("offset", offset.as_str()),
                ("length", length.as_str()),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| SvarError::Dataset(format!("Row fetch failed: {}", e)))?
            .json()
            .await?;

        Ok(response
            .rows
            .iter()
            .map(|r| DatasetExample::from_row(&r.row))
            .collect())
    }

    async fn direct_attachment(&self, attachment_id: &str) -> Result<Option<String>> {
        // Alternate load against the dataset's default view rather than
        // the scan configuration.
        let body: serde_json::Value = self
            .get("first-rows")
            .query(&[
                ("dataset", self.dataset.as_str()),
                ("config", "default"),
                ("split", "train"),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| SvarError::Dataset(format!("Default view fetch failed: {}", e)))?
            .json()
            .await?;

        Ok(find_attachment_value(&body, attachment_id))
    }
}

/// Search a JSON tree for an `attachments` object keyed by the id.
fn find_attachment_value(value: &serde_json::Value, attachment_id: &str) -> Option<String> {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(content) = map
                .get("attachments")
                .and_then(|a| a.get(attachment_id))
                .and_then(|v| v.as_str())
            {
                return Some(content.to_string());
            }
            map.values()
                .find_map(|v| find_attachment_value(v, attachment_id))
        }
        serde_json::Value::Array(items) => items
            .iter()
            .find_map(|v| find_attachment_value(v, attachment_id)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_example_from_row_with_attachments() {
        let row = json!({
            "task_id": "abc-123",
            "attachments": [
                {"id": "file-1", "url": "https://example.com/file-1"},
                {"id": "file-2"}
            ]
        });

        let example = DatasetExample::from_row(&row);
        assert_eq!(example.task_id.as_deref(), Some("abc-123"));
        assert_eq!(example.attachments.len(), 2);
        assert_eq!(
            example.attachments[0].url.as_deref(),
            Some("https://example.com/file-1")
        );
        assert!(example.attachments[1].url.is_none());
    }

    #[test]
    fn test_example_from_row_without_attachments() {
        let example = DatasetExample::from_row(&json!({"task_id": "t"}));
        assert!(example.attachments.is_empty());
    }

    #[test]
    fn test_find_attachment_value_nested() {
        let body = json!({
            "rows": [
                {"row": {"attachments": {"abc": "the content"}}}
            ]
        });
        assert_eq!(
            find_attachment_value(&body, "abc").as_deref(),
            Some("the content")
        );
        assert!(find_attachment_value(&body, "missing").is_none());
    }
}
