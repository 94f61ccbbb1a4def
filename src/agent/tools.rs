//! Tool definitions and dispatch for the agent.

use crate::attachment::AttachmentFetcher;
use crate::error::{Result, SvarError};
use crate::reverse::reverse_text;
use crate::search::{DuckDuckGoSearch, GoogleSearch, WikipediaClient};
use crate::transcript::TranscriptClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Available tools for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// Google search for recent results.
    Search { query: String },

    /// DuckDuckGo web search.
    WebSearch { query: String },

    /// Wikipedia background lookup.
    Wikipedia { query: String },

    /// YouTube transcript retrieval.
    YoutubeVideoInfo { url: String },

    /// Character reversal.
    ReverseText { text: String },

    /// Benchmark attachment retrieval.
    GetAttachment { attachment_id: String },
}

/// Tool execution context holding the underlying clients.
pub struct ToolContext {
    google: Arc<GoogleSearch>,
    web: Arc<DuckDuckGoSearch>,
    wikipedia: Arc<WikipediaClient>,
    transcripts: Arc<TranscriptClient>,
    attachments: Arc<AttachmentFetcher>,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(
        google: Arc<GoogleSearch>,
        web: Arc<DuckDuckGoSearch>,
        wikipedia: Arc<WikipediaClient>,
        transcripts: Arc<TranscriptClient>,
        attachments: Arc<AttachmentFetcher>,
    ) -> Self {
        Self {
            google,
            web,
            wikipedia,
            transcripts,
            attachments,
        }
    }

    /// Execute a tool call. Every tool degrades its own failures to
    /// diagnostic strings, so execution always yields an observation.
    pub async fn execute(&self, tool: &ToolCall) -> String {
        match tool {
            ToolCall::Search { query } => self.google.search(query).await,
            ToolCall::WebSearch { query } => self.web.search(query).await,
            ToolCall::Wikipedia { query } => self.wikipedia.search(query).await,
            ToolCall::YoutubeVideoInfo { url } => self.transcripts.fetch(url).await,
            ToolCall::ReverseText { text } => reverse_text(text),
            ToolCall::GetAttachment { attachment_id } => {
                self.attachments.fetch(attachment_id).await
            }
        }
    }
}

/// Get the chat-API tool definitions for the agent.
pub fn tool_definitions() -> Vec<async_openai::types::ChatCompletionTool> {
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

    fn string_arg(name: &str, description: &str) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                name: {
                    "type": "string",
                    "description": description
                }
            },
            "required": [name]
        })
    }

    vec![
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "search".to_string(),
                description: Some("Search Google for recent results.".to_string()),
                parameters: Some(string_arg("query", "The search query")),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "web_search".to_string(),
                description: Some("Search the web for recent results.".to_string()),
                parameters: Some(string_arg("query", "The search query")),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "wikipedia".to_string(),
                description: Some(
                    "Search Wikipedia for information on a topic. Useful for detailed \
                    background information on historical events, people, places, or \
                    concepts. Input should be a search query."
                        .to_string(),
                ),
                parameters: Some(string_arg("query", "The search query")),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "youtube_video_info".to_string(),
                description: Some(
                    "Gets transcriptions from a YouTube video. Input should be a \
                    YouTube video URL."
                        .to_string(),
                ),
                parameters: Some(string_arg("url", "The YouTube video URL")),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "reverse_text".to_string(),
                description: Some(
                    "Reverses the characters in a word or text. Input should be a \
                    text string you want to reverse."
                        .to_string(),
                ),
                parameters: Some(string_arg("text", "The text to reverse")),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "get_attachment".to_string(),
                description: Some(
                    "Retrieves an attachment from the benchmark dataset using its \
                    ID/hash."
                        .to_string(),
                ),
                parameters: Some(string_arg("attachment_id", "The attachment ID or hash")),
                strict: None,
            },
        },
    ]
}

/// Parse a tool call from the chat-API response format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| SvarError::Agent(format!("Invalid tool arguments: {}", e)))?;

    let string_arg = |key: &str| -> Result<String> {
        args[key]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| SvarError::Agent(format!("Missing '{}' argument", key)))
    };

    match name {
        "search" => Ok(ToolCall::Search {
            query: string_arg("query")?,
        }),
        "web_search" => Ok(ToolCall::WebSearch {
            query: string_arg("query")?,
        }),
        "wikipedia" => Ok(ToolCall::Wikipedia {
            query: string_arg("query")?,
        }),
        "youtube_video_info" => Ok(ToolCall::YoutubeVideoInfo {
            url: string_arg("url")?,
        }),
        "reverse_text" => Ok(ToolCall::ReverseText {
            text: string_arg("text")?,
        }),
        "get_attachment" => Ok(ToolCall::GetAttachment {
            attachment_id: string_arg("attachment_id")?,
        }),
        _ => Err(SvarError::Agent(format!("Unknown tool: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_tool() {
        let tool = parse_tool_call("search", r#"{"query": "capital of Norway"}"#).unwrap();
        match tool {
            ToolCall::Search { query } => assert_eq!(query, "capital of Norway"),
            _ => panic!("Expected Search tool"),
        }
    }

    #[test]
    fn test_parse_get_attachment_tool() {
        let tool =
            parse_tool_call("get_attachment", r#"{"attachment_id": "abc-123"}"#).unwrap();
        match tool {
            ToolCall::GetAttachment { attachment_id } => assert_eq!(attachment_id, "abc-123"),
            _ => panic!("Expected GetAttachment tool"),
        }
    }

    #[test]
    fn test_parse_unknown_tool() {
        assert!(parse_tool_call("visit_webpage", "{}").is_err());
    }

    #[test]
    fn test_parse_missing_argument() {
        assert!(parse_tool_call("reverse_text", "{}").is_err());
    }

    #[test]
    fn test_parse_malformed_arguments() {
        assert!(parse_tool_call("search", "not json").is_err());
    }

    #[test]
    fn test_tool_definitions_cover_all_tools() {
        let names: Vec<String> = tool_definitions()
            .into_iter()
            .map(|t| t.function.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "search",
                "web_search",
                "wikipedia",
                "youtube_video_info",
                "reverse_text",
                "get_attachment"
            ]
        );
    }
}
