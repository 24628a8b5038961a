//! Argument analysis domain
//!
//! Structured claims extracted from opponent utterances, their scores, the
//! reply parsers that produce them and the per-session store that keeps them.

pub mod entities;
pub mod parsing;
pub mod store;
