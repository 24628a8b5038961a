//! Domain error types

use crate::debate::stage::{Role, Stage};
use thiserror::Error;

/// Domain-level errors
///
/// Only illegal API usage ends up here. Failures while building a single
/// maneuver are recovered where they happen and never become a `DomainError`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Debate already completed")]
    AlreadyCompleted,

    #[error("Turn recorded for stage {actual} while the debate is in {expected}")]
    StageMismatch { expected: Stage, actual: Stage },

    #[error("'{speaker}' may not speak now: {stage} expects a {expected} turn")]
    OutOfTurn {
        stage: Stage,
        speaker: String,
        expected: Role,
    },

    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("Participant registered twice: {0}")]
    DuplicateParticipant(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl DomainError {
    /// Check if this error is a state-machine contract violation
    pub fn is_state_violation(&self) -> bool {
        matches!(
            self,
            DomainError::AlreadyCompleted
                | DomainError::StageMismatch { .. }
                | DomainError::OutOfTurn { .. }
        )
    }
}
