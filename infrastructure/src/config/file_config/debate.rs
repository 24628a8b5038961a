//! Debate configuration from TOML (`[debate]` section)

use agora_domain::{EmotionState, ExchangeLimits};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Message bounds of the QA and interactive stages (`[debate.exchanges]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExchangesConfig {
    pub qa_turns: usize,
    pub interactive_turns: usize,
}

impl Default for FileExchangesConfig {
    fn default() -> Self {
        let limits = ExchangeLimits::default();
        Self {
            qa_turns: limits.qa_turns,
            interactive_turns: limits.interactive_turns,
        }
    }
}

impl FileExchangesConfig {
    pub fn to_limits(self) -> ExchangeLimits {
        ExchangeLimits::new(self.qa_turns, self.interactive_turns)
    }
}

/// Raw debate configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    /// Motion under debate (the command line takes precedence)
    pub topic: Option<String>,
    pub moderator: String,
    /// Profile keys of the pro camp, in speaking order
    pub pro: Vec<String>,
    /// Profile keys of the con camp, in speaking order
    pub con: Vec<String>,
    /// Camp members played by a person
    pub humans: Vec<String>,
    /// Seed for strategy draws
    pub seed: Option<u64>,
    pub exchanges: FileExchangesConfig,
    /// Emotional register per participant
    pub emotions: BTreeMap<String, EmotionState>,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            topic: None,
            moderator: "moderator".to_string(),
            pro: Vec::new(),
            con: Vec::new(),
            humans: Vec::new(),
            seed: None,
            exchanges: FileExchangesConfig::default(),
            emotions: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_defaults() {
        let config = FileDebateConfig::default();
        assert_eq!(config.exchanges.qa_turns, 4);
        assert_eq!(config.exchanges.interactive_turns, 6);
        assert_eq!(config.moderator, "moderator");
    }

    #[test]
    fn test_emotions_deserialize() {
        let toml_str = r#"
pro = ["kant"]
con = ["nietzsche"]

[emotions]
nietzsche = "agitated"
"#;
        let config: FileDebateConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.emotions.get("nietzsche"),
            Some(&EmotionState::Agitated)
        );
        assert_eq!(config.exchanges, FileExchangesConfig::default());
    }
}
