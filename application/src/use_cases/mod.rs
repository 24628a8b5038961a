//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod analyze_arguments;
pub mod history_search;
pub mod plan_maneuver;
pub mod run_debate;
pub(crate) mod shared;
