//! Analyze Arguments use case
//!
//! Turns an opponent utterance into scored arguments: one extraction call,
//! then one scoring call per extracted argument, run concurrently.

use crate::ports::language_model::{GenerationConfig, LanguageModel};
use crate::use_cases::shared::generate_or_empty;
use agora_domain::{
    DebatePromptTemplate, ParseOutcome, ScoredArgument, StructuredArgument, parse_arguments,
    parse_score_axes,
};
use futures::future::join_all;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Extracts and scores arguments
pub struct ArgumentAnalyzer {
    model: Arc<dyn LanguageModel>,
    config: GenerationConfig,
    cancellation_token: Option<CancellationToken>,
}

impl ArgumentAnalyzer {
    pub fn new(model: Arc<dyn LanguageModel>, config: &GenerationConfig) -> Self {
        Self {
            model,
            config: config.analytical(),
            cancellation_token: None,
        }
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: Option<CancellationToken>) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Decompose `text` into structured arguments
    ///
    /// Never fails: an unreadable reply yields one `unknown` argument holding
    /// the truncated text.
    pub async fn extract(&self, topic: &str, text: &str) -> ParseOutcome<Vec<StructuredArgument>> {
        let reply = generate_or_empty(
            self.model.as_ref(),
            DebatePromptTemplate::extraction_system(),
            &DebatePromptTemplate::extraction_prompt(topic, text),
            &self.config,
            &self.cancellation_token,
        )
        .await;
        let outcome = parse_arguments(&reply, text);
        if outcome.is_fallback() {
            warn!("Argument extraction fell back to the raw utterance");
        }
        outcome
    }

    /// Score one argument on the four axes
    ///
    /// Never fails: an unreadable reply scores every axis 0.5.
    pub async fn score(&self, topic: &str, argument: StructuredArgument) -> ScoredArgument {
        let reply = generate_or_empty(
            self.model.as_ref(),
            DebatePromptTemplate::scoring_system(),
            &DebatePromptTemplate::scoring_prompt(topic, &argument),
            &self.config,
            &self.cancellation_token,
        )
        .await;
        let outcome = parse_score_axes(&reply);
        if outcome.is_fallback() {
            debug!(claim = %argument.claim, "Scoring fell back to neutral axes");
        }
        ScoredArgument::new(argument, outcome.into_inner())
    }

    /// Extract, then score every argument concurrently
    ///
    /// Results keep extraction order.
    pub async fn analyze(&self, topic: &str, text: &str) -> Vec<ScoredArgument> {
        let arguments = self.extract(topic, text).await.into_inner();
        let scored = join_all(arguments.into_iter().map(|a| self.score(topic, a))).await;
        debug!(count = scored.len(), "Arguments analyzed");
        scored
    }
}
