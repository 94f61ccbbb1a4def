//! Ask command implementation.

use crate::agent::Agent;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::openai::create_client;
use anyhow::Result;
use std::time::{SystemTime, UNIX_EPOCH};

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    task_id: Option<String>,
    model: Option<String>,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'svar doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let model = model.unwrap_or_else(|| settings.llm.model.clone());
    let task_id = task_id.unwrap_or_else(generated_task_id);

    let api_key = settings.llm_api_key().unwrap_or_default();
    let client = create_client(&settings.llm.api_base, &api_key);

    let tools = super::build_tool_context(&settings)?;

    let agent = Agent::new(client, tools, &model)
        .with_max_iterations(settings.llm.max_iterations)
        .with_temperature(settings.llm.temperature);

    let spinner = Output::spinner("Agent working...");

    let started = SystemTime::now();
    match agent.run(question, &task_id).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.content);

            if !response.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", response.tool_calls.len()));
                for call in &response.tool_calls {
                    Output::info(&format!("  {} {}", call.name, truncate(&call.arguments, 60)));
                }
                println!();
            }

            let elapsed = started.elapsed().unwrap_or_default();
            Output::info(&format!(
                "Completed in {} iteration(s), {:.2}s (task {})",
                response.iterations,
                elapsed.as_secs_f64(),
                task_id
            ));
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Agent failed: {}", e));
            println!("\n{}\n", crate::agent::APOLOGY);
            return Err(e.into());
        }
    }

    Ok(())
}

/// Generate a task id from the current time, for ad-hoc questions.
fn generated_task_id() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("cli-{}", secs)
}

/// Cut a string to at most `max_len` characters. Counts chars, not bytes:
/// tool arguments come straight from the model and may be non-ASCII.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_task_id_prefix() {
        assert!(generated_task_id().starts_with("cli-"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 60), "short");
        let long = "x".repeat(100);
        let truncated = truncate(&long, 60);
        assert_eq!(truncated.len(), 60);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_multibyte_arguments() {
        // A multibyte char straddling the old byte cut at 57 must not panic.
        let mut args = "x".repeat(56);
        args.push('å');
        args.push_str("yyyy");
        let truncated = truncate(&args, 60);
        assert_eq!(truncated.chars().count(), 60);
        assert!(truncated.ends_with("å..."));
    }
}
