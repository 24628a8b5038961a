//! Debate entities

use crate::debate::participants::Participants;
use crate::debate::stage::{Role, Stage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged utterance (immutable once recorded)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub speaker_id: String,
    pub role: Role,
    pub stage: Stage,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl TurnRecord {
    pub fn new(
        speaker_id: impl Into<String>,
        role: Role,
        stage: Stage,
        text: impl Into<String>,
    ) -> Self {
        Self {
            speaker_id: speaker_id.into(),
            role,
            stage,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// How the debate left a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// The stage ran and its completion rule was met
    Advanced,
    /// The stage could not run because a required camp is empty
    Skipped,
}

/// A logged stage change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTransition {
    pub from: Stage,
    pub to: Stage,
    pub kind: TransitionKind,
    /// `turn_count` at the moment of the transition
    pub at_turn: usize,
}

/// Snapshot of a running debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateState {
    pub debate_id: String,
    pub current_stage: Stage,
    pub turn_count: usize,
    pub speaking_history: Vec<TurnRecord>,
    pub participants: Participants,
    pub transitions: Vec<StageTransition>,
}

impl DebateState {
    pub fn new(debate_id: impl Into<String>, participants: Participants) -> Self {
        Self {
            debate_id: debate_id.into(),
            current_stage: Stage::Opening,
            turn_count: 0,
            speaking_history: Vec::new(),
            participants,
            transitions: Vec::new(),
        }
    }

    /// Records logged under the current stage, oldest first
    ///
    /// Stages never repeat, so "logged under this stage" and "logged since
    /// the stage was entered" are the same thing.
    pub fn in_stage(&self) -> impl Iterator<Item = &TurnRecord> {
        let stage = self.current_stage;
        self.speaking_history
            .iter()
            .filter(move |record| record.stage == stage)
    }

    /// Most recent record by a given role
    pub fn last_by_role(&self, role: Role) -> Option<&TurnRecord> {
        self.speaking_history.iter().rev().find(|r| r.role == role)
    }

    /// All records by a speaker, oldest first
    pub fn by_speaker<'a>(&'a self, speaker_id: &'a str) -> impl Iterator<Item = &'a TurnRecord> {
        self.speaking_history
            .iter()
            .filter(move |r| r.speaker_id == speaker_id)
    }

    pub fn is_completed(&self) -> bool {
        self.current_stage.is_terminal()
    }

    /// Stages that were skipped because a camp was empty
    pub fn skipped_stages(&self) -> Vec<Stage> {
        self.transitions
            .iter()
            .filter(|t| t.kind == TransitionKind::Skipped)
            .map(|t| t.from)
            .collect()
    }
}
