//! Profiles from a TOML file, layered over the built-ins
//!
//! Each top-level table is one profile, keyed by the id used on the command
//! line:
//!
//! ```toml
//! [diogenes]
//! name = "Diogenes"
//! persona = "You mock pretension and live by example."
//! rag_affinity = 0.1
//! strategy_weights = { reductive_paradox = 0.9, clipping = 0.7 }
//! ```
//!
//! A table named like a built-in (`[kant]`) replaces that built-in.

use agora_application::{PhilosopherProfileStore, ProfileStoreError};
use agora_domain::{
    AttackStrategy, DefenseStrategy, FollowupStrategy, PhilosopherProfile, StrategyKind,
};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct TomlProfileStore {
    overrides: HashMap<String, PhilosopherProfile>,
}

impl TomlProfileStore {
    /// Store with no overrides (built-ins only)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_file(path: &Path) -> Result<Self, ProfileStoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProfileStoreError::Io(format!("{}: {}", path.display(), e)))?;
        let store = Self::parse(&content)?;
        debug!(
            "Loaded {} profile(s) from {}",
            store.overrides.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn parse(content: &str) -> Result<Self, ProfileStoreError> {
        let raw: HashMap<String, PhilosopherProfile> =
            toml::from_str(content).map_err(|e| ProfileStoreError::Invalid {
                key: "profiles".to_string(),
                message: e.to_string(),
            })?;

        let mut overrides = HashMap::new();
        for (key, profile) in raw {
            check_names::<AttackStrategy>(&key, &profile.strategy_weights)?;
            check_names::<DefenseStrategy>(&key, &profile.defense_weights)?;
            check_names::<FollowupStrategy>(&key, &profile.followup_weights)?;
            if !(0.0..=1.0).contains(&profile.rag_affinity) {
                warn!(
                    "Profile '{}': rag_affinity {} clamped to [0, 1]",
                    key, profile.rag_affinity
                );
            }
            overrides.insert(normalize(&key), profile.sanitized());
        }
        Ok(Self { overrides })
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

impl PhilosopherProfileStore for TomlProfileStore {
    fn load(&self, key: &str) -> Result<PhilosopherProfile, ProfileStoreError> {
        self.overrides
            .get(&normalize(key))
            .cloned()
            .or_else(|| PhilosopherProfile::builtin(key))
            .ok_or_else(|| ProfileStoreError::NotFound(key.to_string()))
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Reject weight tables naming strategies that do not exist
fn check_names<K: StrategyKind>(
    key: &str,
    weights: &BTreeMap<String, f64>,
) -> Result<(), ProfileStoreError> {
    match weights.keys().find(|name| K::from_name(name).is_none()) {
        Some(unknown) => Err(ProfileStoreError::Invalid {
            key: key.to_string(),
            message: format!("unknown {} strategy '{}'", K::FAMILY, unknown),
        }),
        None => Ok(()),
    }
}
