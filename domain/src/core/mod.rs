//! Core domain concepts shared across all subdomains.
//!
//! - [`topic::Topic`] - the motion under debate
//! - [`error::DomainError`] - domain-level errors
//! - [`string`] - UTF-8 safe truncation helpers

pub mod error;
pub mod string;
pub mod topic;
