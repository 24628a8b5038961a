//! Debate rosters

use crate::core::error::DomainError;
use crate::debate::stage::Role;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Registered participants, role → ordered id list (Value Object)
///
/// Exactly one moderator. Roster order is significant: the resolver always
/// prefers earlier entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    roster: BTreeMap<Role, Vec<String>>,
    /// Participants whose messages come from a person rather than a model
    humans: BTreeSet<String>,
}

impl Participants {
    pub fn new(moderator_id: impl Into<String>) -> Self {
        let mut roster = BTreeMap::new();
        roster.insert(Role::Moderator, vec![moderator_id.into()]);
        Self {
            roster,
            humans: BTreeSet::new(),
        }
    }

    /// Register a participant under a role
    pub fn add(&mut self, role: Role, id: impl Into<String>) -> Result<(), DomainError> {
        let id = id.into();
        if role == Role::Moderator {
            return Err(DomainError::InvalidConfiguration(
                "a debate has exactly one moderator".to_string(),
            ));
        }
        if self.role_of(&id).is_some() {
            return Err(DomainError::DuplicateParticipant(id));
        }
        self.roster.entry(role).or_default().push(id);
        Ok(())
    }

    /// Builder-style registration
    pub fn with(mut self, role: Role, id: impl Into<String>) -> Result<Self, DomainError> {
        self.add(role, id)?;
        Ok(self)
    }

    /// Flag an already registered participant as a person
    pub fn mark_human(&mut self, id: &str) -> Result<(), DomainError> {
        if self.role_of(id).is_none() {
            return Err(DomainError::UnknownParticipant(id.to_string()));
        }
        self.humans.insert(id.to_string());
        Ok(())
    }

    pub fn is_human(&self, id: &str) -> bool {
        self.humans.contains(id)
    }

    pub fn moderator(&self) -> &str {
        self.roster
            .get(&Role::Moderator)
            .and_then(|ids| ids.first())
            .map(String::as_str)
            .unwrap_or("moderator")
    }

    /// Ordered ids registered under a role
    pub fn of(&self, role: Role) -> &[String] {
        self.roster.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first_of(&self, role: Role) -> Option<&str> {
        self.of(role).first().map(String::as_str)
    }

    pub fn role_of(&self, id: &str) -> Option<Role> {
        self.roster
            .iter()
            .find(|(_, ids)| ids.iter().any(|i| i == id))
            .map(|(role, _)| *role)
    }

    pub fn count(&self, role: Role) -> usize {
        self.of(role).len()
    }
}
