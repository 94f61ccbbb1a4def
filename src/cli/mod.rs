//! CLI module for Svar.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Svar - Question-Answering Agent
///
/// A CLI agent that answers questions with web, Wikipedia, YouTube and
/// benchmark-attachment lookup tools. The name "Svar" comes from the
/// Norwegian word for "answer."
#[derive(Parser, Debug)]
#[command(name = "svar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask the agent a question
    Ask {
        /// The question to answer
        question: String,

        /// Benchmark task identifier (defaults to a generated one)
        #[arg(short, long)]
        task_id: Option<String>,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Retrieve a benchmark attachment by its ID/hash
    Attachment {
        /// The attachment ID
        id: String,
    },

    /// Fetch the transcript of a YouTube video
    Transcript {
        /// The video URL
        url: String,
    },

    /// Run one of the search tools directly
    Search {
        /// Search query
        query: String,

        /// Search engine (google, web, wikipedia)
        #[arg(short, long, default_value = "google")]
        engine: String,
    },

    /// Reverse the characters in a text
    Reverse {
        /// The text to reverse
        text: String,
    },

    /// Initialize Svar and verify configuration
    Init,

    /// Check configuration and credentials
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "llm.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
