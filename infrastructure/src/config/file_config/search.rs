//! Retrieval configuration from TOML (`[search]`, `[profiles]`, `[logging]` sections)

use agora_domain::strategy::rag::MAX_RAG_RESULTS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSearchConfig {
    /// Query the web when a maneuver asks for retrieval
    pub web_enabled: bool,
    /// Search earlier turns of the debate alongside the web
    pub history_enabled: bool,
    /// Snippets handed to one maneuver
    pub max_results: usize,
}

impl Default for FileSearchConfig {
    fn default() -> Self {
        Self {
            web_enabled: true,
            history_enabled: true,
            max_results: MAX_RAG_RESULTS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProfilesConfig {
    /// TOML file with profile overrides and additional debaters
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Also write logs to this file
    pub file: Option<PathBuf>,
}
