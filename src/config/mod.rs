//! Configuration module for Svar.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    DatasetSettings, GeneralSettings, LlmSettings, SearchSettings, Settings, TranscriptSettings,
};
