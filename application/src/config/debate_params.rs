//! Debate parameters - use case loop control.
//!
//! [`DebateParams`] groups the static parameters that control how the
//! [`DebateOrchestrator`](crate::use_cases::run_debate::DebateOrchestrator)
//! runs. These are application-layer concerns, not domain policy.

use crate::ports::language_model::GenerationConfig;
use agora_domain::{EmotionState, ExchangeLimits};
use agora_domain::strategy::rag::MAX_RAG_RESULTS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Debate loop control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateParams {
    /// Message bounds of the QA and interactive stages.
    pub limits: ExchangeLimits,
    /// Sampling parameters for utterances; analysis uses a cooler variant.
    pub generation: GenerationConfig,
    /// Seed for strategy draws. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Maximum retrieved snippets handed to one maneuver.
    pub max_rag_results: usize,
    /// Opponent arguments considered when picking an attack target.
    pub attack_candidates: usize,
    /// Emotional register per speaker id; unlisted speakers are neutral.
    pub emotions: BTreeMap<String, EmotionState>,
}

impl Default for DebateParams {
    fn default() -> Self {
        Self {
            limits: ExchangeLimits::default(),
            generation: GenerationConfig::default(),
            seed: None,
            max_rag_results: MAX_RAG_RESULTS,
            attack_candidates: 3,
            emotions: BTreeMap::new(),
        }
    }
}

impl DebateParams {
    // ==================== Builder Methods ====================

    pub fn with_limits(mut self, limits: ExchangeLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_rag_results(mut self, max: usize) -> Self {
        self.max_rag_results = max;
        self
    }

    pub fn with_emotion(mut self, speaker_id: impl Into<String>, emotion: EmotionState) -> Self {
        self.emotions.insert(speaker_id.into(), emotion);
        self
    }

    pub fn emotion_of(&self, speaker_id: &str) -> EmotionState {
        self.emotions.get(speaker_id).copied().unwrap_or_default()
    }
}
