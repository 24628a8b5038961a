//! Generation configuration from TOML (`[generation]` section)

use agora_application::GenerationConfig;
use serde::{Deserialize, Serialize};

/// Sampling parameters for debater utterances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        let defaults = GenerationConfig::default();
        Self {
            model: defaults.model,
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
        }
    }
}

impl FileGenerationConfig {
    pub fn to_generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}
