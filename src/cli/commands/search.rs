//! Search command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::search::{DuckDuckGoSearch, GoogleSearch, WikipediaClient};
use anyhow::Result;

/// Run the search command with the selected engine.
pub async fn run_search(query: &str, engine: &str, settings: Settings) -> Result<()> {
    let http = crate::http::create_client();

    let spinner = Output::spinner("Searching...");
    let result = match engine {
        "google" => {
            GoogleSearch::new(
                http,
                settings.search.google_api_key.clone(),
                settings.search.google_cse_id.clone(),
                settings.search.max_results,
            )
            .search(query)
            .await
        }
        "web" => {
            DuckDuckGoSearch::new(http, settings.search.max_results)
                .search(query)
                .await
        }
        "wikipedia" => WikipediaClient::new(http).search(query).await,
        other => {
            spinner.finish_and_clear();
            Output::error(&format!(
                "Unknown engine '{}'. Use google, web, or wikipedia.",
                other
            ));
            return Err(anyhow::anyhow!("unknown search engine: {}", other));
        }
    };
    spinner.finish_and_clear();

    println!("{}", result);
    Ok(())
}
