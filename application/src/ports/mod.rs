//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod human_input;
pub mod language_model;
pub mod profile_store;
pub mod progress;
pub mod search_provider;
