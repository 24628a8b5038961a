//! Debate state machine
//!
//! [`DebateStateMachine`] is the sole owner of [`DebateState`]. Every accepted
//! message goes through [`DebateStateMachine::advance`], which appends it to
//! the history and decides, deterministically, whether the stage is done.
//!
//! # Completion rules
//!
//! | Owner | Stage is done when |
//! |-------|--------------------|
//! | Moderator | one message was logged |
//! | Role | every participant of the role has spoken in-stage |
//! | QA / Interactive | the in-stage message count reaches its [`ExchangeLimits`] bound |
//!
//! Entering a stage whose camp has no participants skips it immediately and
//! logs a [`TransitionKind::Skipped`] transition.
//!
//! A record must come from a registered participant of the acting role:
//! the moderator in moderator stages, the bound camp in role stages, and in
//! QA and interactive stages the camp opposite the previous in-stage speaker.

use crate::core::error::DomainError;
use crate::debate::entities::{DebateState, StageTransition, TransitionKind, TurnRecord};
use crate::debate::participants::Participants;
use crate::debate::speaker::SpeakerResolver;
use crate::debate::stage::{Role, Stage, StageOwner};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Message bounds for the self-looping stages
///
/// Counted in messages, not question/answer pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeLimits {
    pub qa_turns: usize,
    pub interactive_turns: usize,
}

impl Default for ExchangeLimits {
    fn default() -> Self {
        Self {
            qa_turns: 4,
            interactive_turns: 6,
        }
    }
}

impl ExchangeLimits {
    /// Bounds of zero are raised to one so every stage can end
    pub fn new(qa_turns: usize, interactive_turns: usize) -> Self {
        Self {
            qa_turns: qa_turns.max(1),
            interactive_turns: interactive_turns.max(1),
        }
    }
}

/// Owns the debate state and drives stage transitions
#[derive(Debug, Clone)]
pub struct DebateStateMachine {
    state: DebateState,
    limits: ExchangeLimits,
    /// Per-role speakers of the current stage, reset on stage entry
    has_spoken: BTreeMap<Role, BTreeSet<String>>,
    in_stage_count: usize,
}

impl DebateStateMachine {
    pub fn new(
        debate_id: impl Into<String>,
        participants: Participants,
        limits: ExchangeLimits,
    ) -> Self {
        let mut machine = Self {
            state: DebateState::new(debate_id, participants),
            limits,
            has_spoken: BTreeMap::new(),
            in_stage_count: 0,
        };
        machine.skip_unstaffed();
        machine
    }

    pub fn state(&self) -> &DebateState {
        &self.state
    }

    /// Owned copy for callers outside the turn loop
    pub fn snapshot(&self) -> DebateState {
        self.state.clone()
    }

    pub fn current_stage(&self) -> Stage {
        self.state.current_stage
    }

    pub fn limits(&self) -> ExchangeLimits {
        self.limits
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    /// Append a record and move the protocol forward.
    ///
    /// Returns the stage the debate is in after the record was applied.
    /// Fails without touching the state if the debate is over, the record
    /// belongs to another stage, or its speaker is not the acting role.
    pub fn advance(&mut self, record: TurnRecord) -> Result<Stage, DomainError> {
        if self.state.is_completed() {
            return Err(DomainError::AlreadyCompleted);
        }
        if record.stage != self.state.current_stage {
            return Err(DomainError::StageMismatch {
                expected: self.state.current_stage,
                actual: record.stage,
            });
        }
        self.check_turn(&record)?;

        self.has_spoken
            .entry(record.role)
            .or_default()
            .insert(record.speaker_id.clone());
        self.in_stage_count += 1;
        self.state.speaking_history.push(record);
        self.state.turn_count += 1;

        if self.stage_complete() {
            let from = self.state.current_stage;
            self.enter(from.next(), TransitionKind::Advanced);
            self.skip_unstaffed();
        }

        Ok(self.state.current_stage)
    }

    fn acting_role(&self) -> Role {
        match self.state.current_stage.owner() {
            StageOwner::Moderator | StageOwner::Terminal => Role::Moderator,
            StageOwner::Role(role) => role,
            StageOwner::Qa { .. } | StageOwner::Interactive => {
                SpeakerResolver::resolve(&self.state).role
            }
        }
    }

    fn check_turn(&self, record: &TurnRecord) -> Result<(), DomainError> {
        let expected = self.acting_role();
        let registered = self.state.participants.role_of(&record.speaker_id) == Some(expected);
        if record.role == expected && registered {
            return Ok(());
        }
        Err(DomainError::OutOfTurn {
            stage: self.state.current_stage,
            speaker: record.speaker_id.clone(),
            expected,
        })
    }

    fn stage_complete(&self) -> bool {
        match self.state.current_stage.owner() {
            StageOwner::Moderator => true,
            StageOwner::Role(role) => {
                let spoken = self.has_spoken.get(&role);
                self.state
                    .participants
                    .of(role)
                    .iter()
                    .all(|id| spoken.is_some_and(|set| set.contains(id)))
            }
            StageOwner::Qa { .. } => self.in_stage_count >= self.limits.qa_turns,
            StageOwner::Interactive => self.in_stage_count >= self.limits.interactive_turns,
            StageOwner::Terminal => false,
        }
    }

    fn enter(&mut self, to: Stage, kind: TransitionKind) {
        let from = self.state.current_stage;
        self.state.transitions.push(StageTransition {
            from,
            to,
            kind,
            at_turn: self.state.turn_count,
        });
        self.state.current_stage = to;
        self.has_spoken.clear();
        self.in_stage_count = 0;

        match kind {
            TransitionKind::Advanced => info!("Stage {} -> {}", from, to),
            TransitionKind::Skipped => warn!("Stage {} skipped (no participants), -> {}", from, to),
        }
        if to.is_terminal() {
            info!(
                "Debate {} completed after {} turns",
                self.state.debate_id, self.state.turn_count
            );
        }
    }

    /// Skip forward past every stage that requires an empty camp
    fn skip_unstaffed(&mut self) {
        loop {
            let stage = self.state.current_stage;
            let unstaffed = stage
                .owner()
                .required_roles()
                .into_iter()
                .any(|role| self.state.participants.count(role) == 0);
            if !unstaffed {
                break;
            }
            self.enter(stage.next(), TransitionKind::Skipped);
        }
    }
}
