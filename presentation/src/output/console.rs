//! Console output formatter for finished debates

use agora_application::RunDebateOutput;
use agora_domain::{Maneuver, Role, Stage, TransitionKind, TurnRecord};
use colored::{ColoredString, Colorize};

/// Formats debates for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete debate: header, every turn grouped by stage, summary
    pub fn format(output: &RunDebateOutput) -> String {
        let mut text = Self::format_header(output);
        let mut current: Option<Stage> = None;

        for (index, record) in output.state.speaking_history.iter().enumerate() {
            if current != Some(record.stage) {
                text.push_str(&Self::stage_header(record.stage));
                current = Some(record.stage);
            }
            let entry = output.maneuvers.iter().find(|m| m.turn_index == index);
            text.push_str(&Self::format_turn(
                record,
                Self::name_of(output, &record.speaker_id),
                entry.map(|m| &m.maneuver),
                entry.is_some_and(|m| m.used_rag),
            ));
        }

        text.push_str(&Self::format_summary(output));
        text
    }

    /// Format as JSON
    pub fn format_json(output: &RunDebateOutput) -> String {
        serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
    }

    /// Title block with the motion and both camps
    pub fn format_header(output: &RunDebateOutput) -> String {
        let participants = &output.state.participants;
        let camp = |role: Role| {
            let names: Vec<&str> = participants
                .of(role)
                .iter()
                .map(|id| Self::name_of(output, id))
                .collect();
            if names.is_empty() {
                "(empty)".dimmed().to_string()
            } else {
                names.join(", ")
            }
        };

        let mut text = Self::header("Agora Debate");
        text.push('\n');
        text.push_str(&format!("{} {}\n", "Motion:".cyan().bold(), output.topic));
        text.push_str(&format!("{} {}\n", "Pro:".green().bold(), camp(Role::Pro)));
        text.push_str(&format!("{} {}\n", "Con:".red().bold(), camp(Role::Con)));
        text
    }

    /// One turn: speaker line, optional maneuver tag, indented text
    pub fn format_turn(
        record: &TurnRecord,
        name: &str,
        maneuver: Option<&Maneuver>,
        used_rag: bool,
    ) -> String {
        let speaker = Self::role_colored(record.role, &format!("── {} ({}) ──", name, record.role));
        let tag = match maneuver {
            Some(m) if used_rag => format!(" [{}, sources]", m).dimmed().to_string(),
            Some(m) => format!(" [{}]", m).dimmed().to_string(),
            None => String::new(),
        };
        format!("\n{}{}\n{}\n", speaker, tag, Self::indent(&record.text, "  "))
    }

    /// Closing block: counts, skipped stages, interruption notice
    pub fn format_summary(output: &RunDebateOutput) -> String {
        let mut text = String::new();
        let skipped: Vec<String> = output
            .state
            .transitions
            .iter()
            .filter(|t| t.kind == TransitionKind::Skipped)
            .map(|t| t.from.display_name().to_string())
            .collect();

        text.push_str(&format!("\n{}\n", "=".repeat(60).cyan()));
        text.push_str(&format!(
            "{} {} turns, {} maneuvers\n",
            "Summary:".cyan().bold(),
            output.state.turn_count,
            output.maneuvers.len()
        ));
        if !skipped.is_empty() {
            text.push_str(&format!(
                "{} {}\n",
                "Skipped:".yellow().bold(),
                skipped.join(", ")
            ));
        }
        if output.cancelled {
            text.push_str(&format!(
                "{} stopped during {}\n",
                "Interrupted:".red().bold(),
                output.state.current_stage.display_name()
            ));
        }
        text
    }

    pub fn stage_header(stage: Stage) -> String {
        format!("\n{}\n{}\n", stage.display_name().cyan().bold(), "-".repeat(40))
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn role_colored(role: Role, text: &str) -> ColoredString {
        match role {
            Role::Pro => text.green().bold(),
            Role::Con => text.red().bold(),
            Role::Moderator => text.yellow().bold(),
            Role::User => text.magenta().bold(),
        }
    }

    fn name_of<'a>(output: &'a RunDebateOutput, id: &'a str) -> &'a str {
        output.names.get(id).map(String::as_str).unwrap_or(id)
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
