//! Transcript command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::transcript::TranscriptClient;
use anyhow::Result;

/// Run the transcript command.
pub async fn run_transcript(url: &str, settings: Settings) -> Result<()> {
    let client = TranscriptClient::new(
        crate::http::create_client(),
        &settings.transcript.language,
        settings.transcript.max_chars,
    );

    let spinner = Output::spinner("Fetching transcript...");
    let result = client.fetch(url).await;
    spinner.finish_and_clear();

    println!("{}", result);
    Ok(())
}
