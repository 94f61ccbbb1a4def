//! Configuration settings for Svar.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub search: SearchSettings,
    pub dataset: DatasetSettings,
    pub transcript: TranscriptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.svar".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// LLM settings for the agent loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Base URL of an OpenAI-compatible chat API.
    pub api_base: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Model identifier passed to the API.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tool-calling iterations per question.
    pub max_iterations: usize,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_base: "https://openrouter.ai/api/v1".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            model: "qwen/qwen-2.5-72b-instruct:free".to_string(),
            temperature: 0.0,
            max_iterations: 3,
        }
    }
}

/// Search tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Google Custom Search API key (optional; the tool degrades without it).
    pub google_api_key: Option<String>,
    /// Google Custom Search engine ID.
    pub google_cse_id: Option<String>,
    /// Maximum number of results per search.
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            google_api_key: None,
            google_cse_id: None,
            max_results: 5,
        }
    }
}

/// Benchmark dataset settings for attachment retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// Dataset name on the hosting hub.
    pub name: String,
    /// Dataset configuration used for record scans.
    pub config: String,
    /// Year directory under which attachment files live.
    pub year: String,
    /// Base URL for direct file resolution.
    pub resolve_base: String,
    /// Base URL of the dataset record server.
    pub server_base: String,
    /// Directory for cached attachments.
    pub cache_dir: String,
    /// Environment variable holding the hub access token.
    pub token_env: String,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            name: "gaia-benchmark/GAIA".to_string(),
            config: "2023_all".to_string(),
            year: "2023".to_string(),
            resolve_base: "https://huggingface.co/datasets".to_string(),
            server_base: "https://datasets-server.huggingface.co".to_string(),
            cache_dir: "~/.svar/attachments".to_string(),
            token_env: "HF_TOKEN".to_string(),
        }
    }
}

/// Transcript retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Preferred caption language code.
    pub language: String,
    /// Maximum transcript length before truncation.
    pub max_chars: usize,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            max_chars: 10_000,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SvarError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("svar")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded attachment cache directory path.
    pub fn attachment_cache_dir(&self) -> PathBuf {
        Self::expand_path(&self.dataset.cache_dir)
    }

    /// Read the LLM API key from the configured environment variable.
    ///
    /// Credentials stay out of the config file; only the variable name is
    /// configured.
    pub fn llm_api_key(&self) -> Option<String> {
        std::env::var(&self.llm.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
    }

    /// Read the dataset hub access token from the configured environment variable.
    pub fn dataset_token(&self) -> Option<String> {
        std::env::var(&self.dataset.token_env)
            .ok()
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.llm.max_iterations, 3);
        assert_eq!(settings.transcript.max_chars, 10_000);
        assert_eq!(settings.dataset.year, "2023");
        assert!(settings.search.google_api_key.is_none());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = PathBuf::from("/nonexistent/svar-config.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.llm.model, Settings::default().llm.model);
    }

    #[test]
    fn test_partial_config_parses() {
        let settings: Settings = toml::from_str("[llm]\nmodel = \"test-model\"\n").unwrap();
        assert_eq!(settings.llm.model, "test-model");
        assert_eq!(settings.llm.max_iterations, 3);
    }
}
