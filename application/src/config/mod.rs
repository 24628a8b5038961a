//! Application-level configuration.
//!
//! - [`DebateParams`] - debate loop control (exchange bounds, sampling, seed, retrieval cap)

pub mod debate_params;

pub use debate_params::DebateParams;
