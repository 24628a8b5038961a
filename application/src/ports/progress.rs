//! Progress notification port
//!
//! Defines the interface for reporting progress while a debate runs.

use agora_domain::{Maneuver, NextSpeaker, Stage, TurnRecord};

/// Callback for progress updates during a debate
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, transcript, web UI, etc.)
pub trait DebateProgressNotifier: Send + Sync {
    /// Called before the next speaker's text is produced
    fn on_turn_start(&self, stage: Stage, speaker: &NextSpeaker);

    /// Called once a turn was accepted
    fn on_turn_complete(&self, record: &TurnRecord, maneuver: Option<&Maneuver>);

    /// Called when the debate moves to the next stage
    fn on_stage_change(&self, _from: Stage, _to: Stage) {}

    /// Called when a stage is skipped because its camp is empty
    fn on_stage_skipped(&self, _stage: Stage) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DebateProgressNotifier for NoProgress {
    fn on_turn_start(&self, _stage: Stage, _speaker: &NextSpeaker) {}
    fn on_turn_complete(&self, _record: &TurnRecord, _maneuver: Option<&Maneuver>) {}
}
