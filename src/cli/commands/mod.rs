//! CLI command implementations.

mod ask;
mod attachment;
mod config;
mod doctor;
mod init;
mod reverse;
mod search;
mod transcript;

pub use ask::run_ask;
pub use attachment::run_attachment;
pub use config::run_config;
pub use doctor::run_doctor;
pub use init::run_init;
pub use reverse::run_reverse;
pub use search::run_search;
pub use transcript::run_transcript;

use crate::agent::ToolContext;
use crate::attachment::{AttachmentFetcher, HfDatasetReader};
use crate::config::Settings;
use crate::search::{DuckDuckGoSearch, GoogleSearch, WikipediaClient};
use crate::transcript::TranscriptClient;
use std::sync::Arc;

/// Build the shared tool context from settings.
fn build_tool_context(settings: &Settings) -> crate::error::Result<ToolContext> {
    let http = crate::http::create_client();

    let google = Arc::new(GoogleSearch::new(
        http.clone(),
        settings.search.google_api_key.clone(),
        settings.search.google_cse_id.clone(),
        settings.search.max_results,
    ));
    let web = Arc::new(DuckDuckGoSearch::new(
        http.clone(),
        settings.search.max_results,
    ));
    let wikipedia = Arc::new(WikipediaClient::new(http.clone()));
    let transcripts = Arc::new(TranscriptClient::new(
        http.clone(),
        &settings.transcript.language,
        settings.transcript.max_chars,
    ));
    let attachments = Arc::new(build_attachment_fetcher(settings, http)?);

    Ok(ToolContext::new(
        google,
        web,
        wikipedia,
        transcripts,
        attachments,
    ))
}

/// Build the attachment fetcher from settings.
fn build_attachment_fetcher(
    settings: &Settings,
    http: reqwest::Client,
) -> crate::error::Result<AttachmentFetcher> {
    let token = settings.dataset_token();

    let reader = Arc::new(HfDatasetReader::new(
        http.clone(),
        &settings.dataset.server_base,
        &settings.dataset.name,
        &settings.dataset.config,
        token.clone(),
    ));

    AttachmentFetcher::new(
        http,
        reader,
        settings.attachment_cache_dir(),
        &settings.dataset.resolve_base,
        &settings.dataset.name,
        &settings.dataset.year,
        token,
    )
}
