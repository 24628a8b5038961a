//! Debate protocol domain
//!
//! The fixed stage sequence, who owns each stage, the state machine that
//! advances through it and the resolver that names the next speaker.

pub mod entities;
pub mod participants;
pub mod speaker;
pub mod stage;
pub mod state_machine;
