//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            let mut settings = settings;
            apply_setting(&mut settings, key, value)?;
            settings.save()?;
            Output::success(&format!("Set {} = {}", key, value));
        }

        ConfigAction::Edit => {
            let config_path = Settings::default_config_path();

            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save()?;
                Output::info(&format!("Created default config at {:?}", config_path));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor)
                .arg(&config_path)
                .status();

            match status {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {:?}", config_path));
                }
            }
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Apply a "section.key" assignment to the settings.
fn apply_setting(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    fn parsed<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
    where
        T::Err: std::fmt::Display,
    {
        value
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))
    }

    match key {
        "general.data_dir" => settings.general.data_dir = value.to_string(),
        "general.log_level" => settings.general.log_level = value.to_string(),

        "llm.api_base" => settings.llm.api_base = value.to_string(),
        "llm.api_key_env" => settings.llm.api_key_env = value.to_string(),
        "llm.model" => settings.llm.model = value.to_string(),
        "llm.temperature" => settings.llm.temperature = parsed(key, value)?,
        "llm.max_iterations" => settings.llm.max_iterations = parsed(key, value)?,

        "search.google_api_key" => settings.search.google_api_key = Some(value.to_string()),
        "search.google_cse_id" => settings.search.google_cse_id = Some(value.to_string()),
        "search.max_results" => settings.search.max_results = parsed(key, value)?,

        "dataset.name" => settings.dataset.name = value.to_string(),
        "dataset.config" => settings.dataset.config = value.to_string(),
        "dataset.year" => settings.dataset.year = value.to_string(),
        "dataset.resolve_base" => settings.dataset.resolve_base = value.to_string(),
        "dataset.server_base" => settings.dataset.server_base = value.to_string(),
        "dataset.cache_dir" => settings.dataset.cache_dir = value.to_string(),
        "dataset.token_env" => settings.dataset.token_env = value.to_string(),

        "transcript.language" => settings.transcript.language = value.to_string(),
        "transcript.max_chars" => settings.transcript.max_chars = parsed(key, value)?,

        _ => anyhow::bail!("Unknown configuration key: {}", key),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_string_setting() {
        let mut settings = Settings::default();
        apply_setting(&mut settings, "llm.model", "some/other-model").unwrap();
        assert_eq!(settings.llm.model, "some/other-model");
    }

    #[test]
    fn test_apply_numeric_setting() {
        let mut settings = Settings::default();
        apply_setting(&mut settings, "llm.max_iterations", "5").unwrap();
        assert_eq!(settings.llm.max_iterations, 5);
    }

    #[test]
    fn test_apply_optional_setting() {
        let mut settings = Settings::default();
        apply_setting(&mut settings, "search.google_api_key", "key-123").unwrap();
        assert_eq!(settings.search.google_api_key.as_deref(), Some("key-123"));
    }

    #[test]
    fn test_apply_rejects_unknown_key() {
        let mut settings = Settings::default();
        assert!(apply_setting(&mut settings, "llm.bogus", "x").is_err());
    }

    #[test]
    fn test_apply_rejects_unparsable_value() {
        let mut settings = Settings::default();
        assert!(apply_setting(&mut settings, "llm.temperature", "warm").is_err());
    }
}
