//! Language model port
//!
//! Defines the interface for generating text from a remote model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while generating text
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Timeout")]
    Timeout,

    #[error("Cancelled")]
    Cancelled,

    #[error("Other error: {0}")]
    Other(String),
}

/// Sampling parameters for one generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 600,
        }
    }
}

impl GenerationConfig {
    /// Low-temperature variant for extraction and scoring
    pub fn analytical(&self) -> Self {
        Self {
            temperature: 0.2,
            ..self.clone()
        }
    }
}

/// Text generation service
///
/// Implementations (adapters) live in the infrastructure layer. Callers in
/// this crate never propagate a `GatewayError`: every failure is turned into
/// an empty reply and handled by a fallback.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, GatewayError>;
}
