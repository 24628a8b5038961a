//! Language model that is never available

use agora_application::{GatewayError, GenerationConfig, LanguageModel};
use async_trait::async_trait;

/// Fails every call
///
/// Runs a whole debate without network access: the engine substitutes
/// fallback utterances and neutral analyses for every delegated step.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineLanguageModel;

#[async_trait]
impl LanguageModel for OfflineLanguageModel {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, GatewayError> {
        Err(GatewayError::ModelNotAvailable(format!(
            "{} (offline mode)",
            config.model
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_fails() {
        let result = OfflineLanguageModel
            .generate("system", "user", &GenerationConfig::default())
            .await;
        assert!(matches!(result, Err(GatewayError::ModelNotAvailable(_))));
    }
}
