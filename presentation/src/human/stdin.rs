//! Terminal input for a human debater.
//!
//! When it is a person's turn they see the stage, the last thing said and
//! a prompt:
//!
//! ```text
//! ═══ Con Rebuttal · your turn, alice ═══
//! Immanuel Kant: A lie treats the listener as a mere means...
//!
//! alice> _
//! ```
//!
//! Prompts go to stderr so stdout carries only the debate output.
//! An empty line or `/pass` hands the turn to the fallback text.
//! End of input counts as cancellation.

use agora_application::{HumanInputError, HumanInputPort};
use agora_domain::core::string::truncate;
use agora_domain::{DebateState, Stage};
use async_trait::async_trait;
use colored::Colorize;
use std::io::{self, BufRead, Write};

const PASS_COMMANDS: [&str; 2] = ["/pass", "/skip"];
const LAST_TURN_PREVIEW: usize = 400;

/// Reads a human debater's turn from stdin
pub struct StdinHumanInput;

impl StdinHumanInput {
    pub fn new() -> Self {
        Self
    }

    fn display_prompt(speaker_id: &str, stage: Stage, state: &DebateState) {
        eprintln!();
        eprintln!(
            "{}",
            format!("═══ {} · your turn, {} ═══", stage.display_name(), speaker_id)
                .magenta()
                .bold()
        );
        if let Some(last) = state.speaking_history.last() {
            eprintln!(
                "{} {}",
                format!("{}:", last.speaker_id).dimmed(),
                truncate(&last.text, LAST_TURN_PREVIEW)
            );
        }
        eprintln!("{}", "(empty line or /pass to let the fallback speak)".dimmed());
    }

    fn read_line(speaker_id: &str) -> Result<String, HumanInputError> {
        eprint!("{} ", format!("{}>", speaker_id).magenta().bold());
        io::stderr()
            .flush()
            .map_err(|e| HumanInputError::IoError(format!("Failed to flush stderr: {}", e)))?;

        let mut input = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(|e| HumanInputError::IoError(format!("Failed to read input: {}", e)))?;
        if read == 0 {
            return Err(HumanInputError::Cancelled);
        }
        Ok(normalize(&input))
    }
}

impl Default for StdinHumanInput {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim the line; pass commands become an empty turn
fn normalize(input: &str) -> String {
    let line = input.trim();
    if PASS_COMMANDS.contains(&line.to_lowercase().as_str()) {
        String::new()
    } else {
        line.to_string()
    }
}

#[async_trait]
impl HumanInputPort for StdinHumanInput {
    async fn request_utterance(
        &self,
        speaker_id: &str,
        stage: Stage,
        state: &DebateState,
    ) -> Result<String, HumanInputError> {
        Self::display_prompt(speaker_id, stage, state);
        let speaker = speaker_id.to_string();
        tokio::task::spawn_blocking(move || Self::read_line(&speaker))
            .await
            .map_err(|e| HumanInputError::IoError(e.to_string()))?
    }
}
