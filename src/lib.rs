//! Svar - Question-Answering Agent
//!
//! A CLI agent that answers benchmark-style questions by wrapping an LLM
//! tool-calling loop around a fixed set of external lookup tools.
//!
//! The name "Svar" comes from the Norwegian word for "answer."
//!
//! # Overview
//!
//! Svar allows you to:
//! - Ask a question and let the agent decide which tools to consult
//! - Search Google, the web and Wikipedia
//! - Fetch YouTube video transcripts
//! - Retrieve benchmark dataset attachments by id, with local caching
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `agent` - Tool registry, prompt and the bounded tool-calling loop
//! - `search` - Google, DuckDuckGo and Wikipedia lookup tools
//! - `transcript` - YouTube transcript retrieval
//! - `attachment` - Benchmark attachment retrieval cascade
//! - `reverse` - String reversal utility
//!
//! # Example
//!
//! ```rust,no_run
//! use svar::agent::{Agent, ToolContext};
//! use svar::config::Settings;
//!
//! # async fn example(tools: ToolContext) -> anyhow::Result<()> {
//! let settings = Settings::load()?;
//! let client = svar::openai::create_client(&settings.llm.api_base, "api-key");
//!
//! let agent = Agent::new(client, tools, &settings.llm.model);
//! let answer = agent.answer("What is the capital of Norway?", "task-1").await;
//! println!("{}", answer);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod attachment;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod openai;
pub mod reverse;
pub mod search;
pub mod transcript;

pub use error::{Result, SvarError};
