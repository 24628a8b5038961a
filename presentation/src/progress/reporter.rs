//! Progress reporting while a debate runs

use crate::output::console::ConsoleFormatter;
use agora_application::DebateProgressNotifier;
use agora_domain::{Maneuver, NextSpeaker, Stage, TurnRecord};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with a spinner per turn
///
/// With `with_live_transcript(true)` every accepted turn is printed above
/// the spinner as soon as it is recorded.
pub struct ProgressReporter {
    multi: MultiProgress,
    spinner: Mutex<Option<ProgressBar>>,
    names: BTreeMap<String, String>,
    live_transcript: bool,
    last_stage: Mutex<Option<Stage>>,
}

impl ProgressReporter {
    /// `names` maps participant ids to display names
    pub fn new(names: BTreeMap<String, String>) -> Self {
        Self {
            multi: MultiProgress::new(),
            spinner: Mutex::new(None),
            names,
            live_transcript: false,
            last_stage: Mutex::new(None),
        }
    }

    pub fn with_live_transcript(mut self, live: bool) -> Self {
        self.live_transcript = live;
        self
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn name_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.names.get(id).map(String::as_str).unwrap_or(id)
    }

    /// Print to stdout with the spinner hidden
    fn print(&self, text: &str) {
        self.multi.suspend(|| println!("{}", text.trim_end()));
    }
}

impl DebateProgressNotifier for ProgressReporter {
    fn on_turn_start(&self, stage: Stage, speaker: &NextSpeaker) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(stage.display_name());
        pb.set_message(format!("{} is speaking...", self.name_of(&speaker.speaker_id)));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.spinner.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_turn_complete(&self, record: &TurnRecord, maneuver: Option<&Maneuver>) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
        if !self.live_transcript {
            return;
        }
        if let Ok(mut last) = self.last_stage.lock()
            && *last != Some(record.stage)
        {
            *last = Some(record.stage);
            self.print(&ConsoleFormatter::stage_header(record.stage));
        }
        self.print(&ConsoleFormatter::format_turn(
            record,
            self.name_of(&record.speaker_id),
            maneuver,
            false,
        ));
    }

    fn on_stage_skipped(&self, stage: Stage) {
        if self.live_transcript {
            self.print(&format!(
                "{} {} (no speakers)",
                "skipped".yellow(),
                stage.display_name()
            ));
        }
    }
}

/// Simple text-based progress on stderr (no spinner)
///
/// Used when a person types turns on the same terminal.
pub struct SimpleProgress {
    names: BTreeMap<String, String>,
}

impl SimpleProgress {
    pub fn new(names: BTreeMap<String, String>) -> Self {
        Self { names }
    }

    fn name_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.names.get(id).map(String::as_str).unwrap_or(id)
    }
}

impl DebateProgressNotifier for SimpleProgress {
    fn on_turn_start(&self, _stage: Stage, _speaker: &NextSpeaker) {}

    fn on_turn_complete(&self, record: &TurnRecord, maneuver: Option<&Maneuver>) {
        eprintln!(
            "{}",
            ConsoleFormatter::format_turn(record, self.name_of(&record.speaker_id), maneuver, false)
        );
    }

    fn on_stage_change(&self, _from: Stage, to: Stage) {
        if !to.is_terminal() {
            eprintln!("{} {}", "->".cyan(), to.display_name().bold());
        }
    }

    fn on_stage_skipped(&self, stage: Stage) {
        eprintln!(
            "  {} {} (no speakers)",
            "x".yellow(),
            stage.display_name()
        );
    }
}
