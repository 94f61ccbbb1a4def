//! Attachment command implementation.

use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the attachment command.
pub async fn run_attachment(id: &str, settings: Settings) -> Result<()> {
    let fetcher = super::build_attachment_fetcher(&settings, crate::http::create_client())?;

    let spinner = Output::spinner("Retrieving attachment...");
    let result = fetcher.fetch(id).await;
    spinner.finish_and_clear();

    println!("{}", result);
    Ok(())
}
