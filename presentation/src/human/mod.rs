//! Terminal input for human debaters

pub mod stdin;
