//! Application layer for agora
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DebateParams;
pub use ports::{
    human_input::{HumanInputError, HumanInputPort, ScriptedHumanInput},
    language_model::{GatewayError, GenerationConfig, LanguageModel},
    profile_store::{BuiltinProfileStore, PhilosopherProfileStore, ProfileStoreError},
    progress::{DebateProgressNotifier, NoProgress},
    search_provider::{SearchError, SearchProvider},
};
pub use use_cases::analyze_arguments::ArgumentAnalyzer;
pub use use_cases::history_search::HistorySearch;
pub use use_cases::plan_maneuver::{ManeuverPlanner, OpeningPreparation};
pub use use_cases::run_debate::{
    DebateOrchestrator, RunDebateError, RunDebateInput, RunDebateOutput, SubmitOutcome,
    TurnOutcome,
};
