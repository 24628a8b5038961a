//! Human input port for live debaters.
//!
//! When a camp member is flagged as human, the orchestrator asks this port
//! for the utterance instead of generating one.
//!
//! # Built-in Implementations
//!
//! - [`ScriptedHumanInput`] - Returns prepared lines in order
//!
//! For interactive use, see `StdinHumanInput` in the presentation layer.

use agora_domain::{DebateState, Stage};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use thiserror::Error;

/// Error type for human input operations.
#[derive(Error, Debug, Clone)]
pub enum HumanInputError {
    /// User cancelled the operation (e.g., via Ctrl+C).
    #[error("Operation cancelled")]
    Cancelled,
    /// Input/output error (e.g., terminal read failure).
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Port for collecting a human participant's utterance.
#[async_trait]
pub trait HumanInputPort: Send + Sync {
    /// Ask `speaker_id` for their turn in `stage`.
    ///
    /// An empty string or an error is replaced by a fallback utterance.
    async fn request_utterance(
        &self,
        speaker_id: &str,
        stage: Stage,
        state: &DebateState,
    ) -> Result<String, HumanInputError>;
}

/// Human input that replays prepared lines
///
/// Once the lines run out every request returns `Cancelled`.
pub struct ScriptedHumanInput {
    lines: Mutex<VecDeque<String>>,
}

impl ScriptedHumanInput {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: Mutex::new(lines.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
impl HumanInputPort for ScriptedHumanInput {
    async fn request_utterance(
        &self,
        _speaker_id: &str,
        _stage: Stage,
        _state: &DebateState,
    ) -> Result<String, HumanInputError> {
        let mut lines = self
            .lines
            .lock()
            .map_err(|e| HumanInputError::IoError(e.to_string()))?;
        lines.pop_front().ok_or(HumanInputError::Cancelled)
    }
}
