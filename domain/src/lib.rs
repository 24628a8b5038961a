//! Domain layer for agora
//!
//! This crate contains the core debate logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Debate protocol
//!
//! A debate walks a fixed [`Stage`] sequence. The [`DebateStateMachine`]
//! owns the [`DebateState`] and advances it one accepted [`TurnRecord`] at a
//! time; the [`SpeakerResolver`] names who speaks next.
//!
//! ## Strategy engine
//!
//! Opponent utterances become [`StructuredArgument`]s, scored into
//! [`ScoredArgument`]s. A [`StrategySelector`] draws an attack, defense or
//! follow-up from a candidate table weighted by the speaker's
//! [`PhilosopherProfile`], and [`rag::decide`](strategy::rag::decide) decides
//! whether the move is worth a search call.

pub mod argument;
pub mod config;
pub mod core;
pub mod debate;
pub mod philosopher;
pub mod prompt;
pub mod strategy;

// Re-export commonly used types
pub use argument::{
    entities::{ArgumentType, ScoreAxes, ScoredArgument, StructuredArgument},
    parsing::{ParseOutcome, parse_arguments, parse_payload, parse_score_axes},
    store::ArgumentStore,
};
pub use config::{
    OutputFormat,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use core::{error::DomainError, topic::Topic};
pub use debate::{
    entities::{DebateState, StageTransition, TransitionKind, TurnRecord},
    participants::Participants,
    speaker::{NextSpeaker, SpeakerResolver},
    stage::{Role, Stage, StageOwner},
    state_machine::{DebateStateMachine, ExchangeLimits},
};
pub use philosopher::profile::{PhilosopherProfile, RagStats};
pub use prompt::{DebatePromptTemplate, ModeratorScript, fallback_utterance};
pub use strategy::{
    candidates::{DefaultCandidateTable, EmotionState, StrategyCandidateTable},
    kinds::{AttackStrategy, DefenseStrategy, FollowupStrategy, StrategyFamily, StrategyKind},
    plans::{
        AttackPlan, DefensePlan, EvidenceSnippet, FollowupPlan, Maneuver, ManeuverKind,
        ManeuverRecord, RhetoricalPayload,
    },
    rag::RagDecision,
    selector::{Selection, StrategySelector},
};
