//! Svar CLI entry point.

use anyhow::Result;
use clap::Parser;
use svar::cli::{commands, Cli, Commands};
use svar::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("svar={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure data directories exist
    std::fs::create_dir_all(settings.data_dir())?;
    std::fs::create_dir_all(settings.attachment_cache_dir())?;

    // Execute command
    match &cli.command {
        Commands::Ask {
            question,
            task_id,
            model,
        } => {
            commands::run_ask(question, task_id.clone(), model.clone(), settings).await?;
        }

        Commands::Attachment { id } => {
            commands::run_attachment(id, settings).await?;
        }

        Commands::Transcript { url } => {
            commands::run_transcript(url, settings).await?;
        }

        Commands::Search { query, engine } => {
            commands::run_search(query, engine, settings).await?;
        }

        Commands::Reverse { text } => {
            commands::run_reverse(text)?;
        }

        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
