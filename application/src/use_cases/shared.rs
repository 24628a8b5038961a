//! Shared utilities for use cases.
//!
//! Contains the cancellable, fail-open generation helper used by every step
//! that delegates to the language model.

use crate::ports::language_model::{GatewayError, GenerationConfig, LanguageModel};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Check if cancellation has been requested.
pub(crate) fn is_cancelled(token: &Option<CancellationToken>) -> bool {
    token.as_ref().is_some_and(CancellationToken::is_cancelled)
}

/// Generate text, returning `""` on any failure or on cancellation.
///
/// At most one attempt is made. Callers treat an empty reply exactly like a
/// failed one and substitute their fallback.
pub(crate) async fn generate_or_empty(
    model: &dyn LanguageModel,
    system_prompt: &str,
    user_prompt: &str,
    config: &GenerationConfig,
    cancellation_token: &Option<CancellationToken>,
) -> String {
    if is_cancelled(cancellation_token) {
        return String::new();
    }

    let result = match cancellation_token {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => return String::new(),
                result = model.generate(system_prompt, user_prompt, config) => result,
            }
        }
        None => model.generate(system_prompt, user_prompt, config).await,
    };

    match result {
        Ok(text) => text.trim().to_string(),
        // Offline runs hit this on every call
        Err(e @ GatewayError::ModelNotAvailable(_)) => {
            debug!("Generation skipped: {}", e);
            String::new()
        }
        Err(e) => {
            warn!("Generation failed: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Mock ports shared by the use case tests

    use crate::ports::language_model::{GatewayError, GenerationConfig, LanguageModel};
    use crate::ports::search_provider::{SearchError, SearchProvider};
    use agora_domain::EvidenceSnippet;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replies in order; errors once the script runs out
    pub struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, GatewayError>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub fn new(replies: Vec<&str>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().map(|r| Ok(r.to_string())).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self::new(Vec::new())
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn generate(
            &self,
            _system_prompt: &str,
            user_prompt: &str,
            _config: &GenerationConfig,
        ) -> Result<String, GatewayError> {
            self.prompts.lock().unwrap().push(user_prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Other("No more responses".to_string())))
        }
    }

    /// Same reply to every prompt
    pub struct EchoModel(pub String);

    #[async_trait]
    impl LanguageModel for EchoModel {
        async fn generate(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
            _config: &GenerationConfig,
        ) -> Result<String, GatewayError> {
            Ok(self.0.clone())
        }
    }

    /// Never completes
    pub struct HangingModel;

    #[async_trait]
    impl LanguageModel for HangingModel {
        async fn generate(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
            _config: &GenerationConfig,
        ) -> Result<String, GatewayError> {
            std::future::pending::<()>().await;
            Ok(String::new())
        }
    }

    /// Fixed results, or a failure
    pub struct FixedSearch {
        pub name: String,
        pub results: Option<Vec<EvidenceSnippet>>,
        pub queries: Mutex<Vec<String>>,
    }

    impl FixedSearch {
        pub fn new(name: &str, results: Vec<(&str, f64)>) -> Self {
            Self {
                name: name.to_string(),
                results: Some(
                    results
                        .into_iter()
                        .map(|(c, r)| EvidenceSnippet::new(c, name, r))
                        .collect(),
                ),
                queries: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(name: &str) -> Self {
            Self {
                name: name.to_string(),
                results: None,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchProvider for FixedSearch {
        fn name(&self) -> &str {
            &self.name
        }

        async fn search(
            &self,
            query: &str,
            k: usize,
        ) -> Result<Vec<EvidenceSnippet>, SearchError> {
            self.queries.lock().unwrap().push(query.to_string());
            match &self.results {
                Some(results) => Ok(results.iter().take(k).cloned().collect()),
                None => Err(SearchError::Unavailable(self.name.clone())),
            }
        }
    }
}
