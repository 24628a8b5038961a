//! Philosopher profiles: per-agent strategy weights and research temperament.

pub mod profile;
