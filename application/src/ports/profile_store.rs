//! Philosopher profile store port

use agora_domain::PhilosopherProfile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileStoreError {
    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Invalid profile '{key}': {message}")]
    Invalid { key: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

/// Read-only access to debater profiles
pub trait PhilosopherProfileStore: Send + Sync {
    fn load(&self, key: &str) -> Result<PhilosopherProfile, ProfileStoreError>;
}

/// Store serving only the built-in profiles
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinProfileStore;

impl PhilosopherProfileStore for BuiltinProfileStore {
    fn load(&self, key: &str) -> Result<PhilosopherProfile, ProfileStoreError> {
        PhilosopherProfile::builtin(key).ok_or_else(|| ProfileStoreError::NotFound(key.to_string()))
    }
}
