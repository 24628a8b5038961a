//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod debate;
mod generation;
mod output;
mod providers;
mod search;

pub use debate::{FileDebateConfig, FileExchangesConfig};
pub use generation::FileGenerationConfig;
pub use output::FileOutputConfig;
pub use providers::{FileOpenAiConfig, FileProvidersConfig};
pub use search::{FileLoggingConfig, FileProfilesConfig, FileSearchConfig};

use agora_application::DebateParams;
use agora_domain::config::validation::validate_roster;
use agora_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Accepted sampling temperature range
const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Topic, rosters, exchange bounds
    pub debate: FileDebateConfig,
    /// Sampling parameters
    pub generation: FileGenerationConfig,
    /// Language model endpoints
    pub providers: FileProvidersConfig,
    /// Retrieval settings
    pub search: FileSearchConfig,
    /// Profile overrides
    pub profiles: FileProfilesConfig,
    /// Log file
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks the rosters and exchange bounds, then the sampling
    /// temperature. The topic is not checked here: the command line may
    /// still supply it.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = validate_roster(
            &self.debate.pro,
            &self.debate.con,
            &self.debate.humans,
            self.debate.exchanges.qa_turns,
            self.debate.exchanges.interactive_turns,
        );

        if !TEMPERATURE_RANGE.contains(&self.generation.temperature) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::TemperatureOutOfRange,
                format!(
                    "generation.temperature = {} is outside {:?}; the provider may reject it",
                    self.generation.temperature, TEMPERATURE_RANGE
                ),
            ));
        }

        issues
    }

    /// Application parameters for the orchestrator
    pub fn debate_params(&self) -> DebateParams {
        let mut params = DebateParams::default()
            .with_limits(self.debate.exchanges.to_limits())
            .with_generation(self.generation.to_generation_config())
            .with_max_rag_results(self.search.max_results);
        if let Some(seed) = self.debate.seed {
            params = params.with_seed(seed);
        }
        for (speaker, emotion) in &self.debate.emotions {
            params = params.with_emotion(speaker.as_str(), *emotion);
        }
        params
    }
}
