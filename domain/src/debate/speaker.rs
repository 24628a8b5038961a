//! Speaker resolution
//!
//! [`SpeakerResolver::resolve`] is a pure function of the stage and the
//! speaking history: the same snapshot always yields the same speaker.

use crate::debate::entities::DebateState;
use crate::debate::stage::{Role, StageOwner};
use serde::{Deserialize, Serialize};

/// Who should speak next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextSpeaker {
    pub speaker_id: String,
    pub role: Role,
}

impl NextSpeaker {
    pub fn new(speaker_id: impl Into<String>, role: Role) -> Self {
        Self {
            speaker_id: speaker_id.into(),
            role,
        }
    }
}

/// Picks the next speaker for the current stage
pub struct SpeakerResolver;

impl SpeakerResolver {
    pub fn resolve(state: &DebateState) -> NextSpeaker {
        let moderator = || NextSpeaker::new(state.participants.moderator(), Role::Moderator);

        match state.current_stage.owner() {
            StageOwner::Moderator | StageOwner::Terminal => moderator(),
            StageOwner::Qa { questioner, .. } => {
                let role = Self::acting_role(state, questioner);
                state
                    .participants
                    .first_of(role)
                    .map(|id| NextSpeaker::new(id, role))
                    .unwrap_or_else(moderator)
            }
            StageOwner::Interactive => {
                let role = Self::acting_role(state, Role::Pro);
                Self::least_heard(state, role)
                    .map(|id| NextSpeaker::new(id, role))
                    .unwrap_or_else(moderator)
            }
            StageOwner::Role(role) => state
                .participants
                .of(role)
                .iter()
                .find(|id| {
                    !state
                        .in_stage()
                        .any(|r| r.role == role && &r.speaker_id == *id)
                })
                .map(|id| NextSpeaker::new(id.as_str(), role))
                // Everyone has spoken: the stage is about to advance
                .unwrap_or_else(moderator),
        }
    }

    /// Role opposite the latest in-stage camp speaker, or the opener
    fn acting_role(state: &DebateState, opener: Role) -> Role {
        state
            .in_stage()
            .filter(|r| r.role.is_camp())
            .last()
            .and_then(|r| r.role.opponent())
            .unwrap_or(opener)
    }

    /// Participant of `role` with the fewest in-stage messages (roster order breaks ties)
    fn least_heard(state: &DebateState, role: Role) -> Option<&str> {
        state
            .participants
            .of(role)
            .iter()
            .enumerate()
            .min_by_key(|(position, id)| {
                let spoken = state.in_stage().filter(|r| &r.speaker_id == *id).count();
                (spoken, *position)
            })
            .map(|(_, id)| id.as_str())
    }
}
