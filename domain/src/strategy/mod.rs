//! Rhetorical strategy domain
//!
//! - [`kinds`] - the attack, defense and follow-up strategy families
//! - [`candidates`] - context keys and the static candidate table
//! - [`selector`] - weighted random choice over candidates
//! - [`rag`] - the multiplicative retrieval decision
//! - [`plans`] - the maneuver plans handed to text generation

pub mod candidates;
pub mod kinds;
pub mod plans;
pub mod rag;
pub mod selector;
