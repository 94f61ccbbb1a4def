//! Pre-flight checks before expensive operations.
//!
//! Validates that required credentials are available before starting
//! operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, SvarError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Asking questions requires an LLM API key.
    Ask,
    /// Direct tool invocations have no hard requirements; search and
    /// attachment credentials are optional.
    Tool,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Ask => check_llm_api_key(settings),
        Operation::Tool => Ok(()),
    }
}

/// Check that the LLM API key environment variable is set.
fn check_llm_api_key(settings: &Settings) -> Result<()> {
    match settings.llm_api_key() {
        Some(_) => Ok(()),
        None => Err(SvarError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            settings.llm.api_key_env, settings.llm.api_key_env
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_operation_has_no_requirements() {
        let settings = Settings::default();
        assert!(check(Operation::Tool, &settings).is_ok());
    }

    #[test]
    fn test_ask_requires_api_key() {
        let mut settings = Settings::default();
        // Point at a variable that is certainly unset.
        settings.llm.api_key_env = "SVAR_TEST_MISSING_KEY".to_string();
        assert!(check(Operation::Ask, &settings).is_err());
    }
}
