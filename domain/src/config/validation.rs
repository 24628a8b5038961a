//! Debate setup validation.
//!
//! Checks a roster and its exchange bounds before a debate starts and
//! returns structured issues with severity levels. Empty camps are only a
//! warning: the affected stages are skipped at run time.

use std::collections::BTreeSet;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the debate cannot start.
    Error,
    /// Non-fatal: the debate runs but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A camp has no participants; its stages will be skipped.
    EmptyCamp,
    /// The same id is registered in both camps.
    ParticipantInBothCamps,
    /// A QA or interactive bound is zero.
    ZeroExchangeBound,
    /// A human is not registered in either camp.
    UnknownHuman,
    /// Sampling temperature outside the usual range.
    TemperatureOutOfRange,
    /// No topic configured.
    MissingTopic,
}

/// A detected issue in the debate configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }
}

/// True if any issue is fatal
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

/// Validate camps, humans and exchange bounds
pub fn validate_roster(
    pro: &[String],
    con: &[String],
    humans: &[String],
    qa_turns: usize,
    interactive_turns: usize,
) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    for (camp, members) in [("pro", pro), ("con", con)] {
        if members.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::EmptyCamp,
                format!("The {} camp is empty; its stages will be skipped", camp),
            ));
        }
    }

    let pro_set: BTreeSet<&str> = pro.iter().map(String::as_str).collect();
    for id in con.iter().filter(|id| pro_set.contains(id.as_str())) {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::ParticipantInBothCamps,
            format!("'{}' is registered in both camps", id),
        ));
    }

    for human in humans {
        if !pro.contains(human) && !con.contains(human) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnknownHuman,
                format!("Human participant '{}' is not in either camp", human),
            ));
        }
    }

    for (name, value) in [("qa_turns", qa_turns), ("interactive_turns", interactive_turns)] {
        if value == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroExchangeBound,
                format!("debate.exchanges.{} must be at least 1", name),
            ));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn valid_roster_has_no_issues() {
        let issues = validate_roster(&ids(&["kant"]), &ids(&["hume"]), &[], 4, 6);
        assert!(issues.is_empty());
    }

    #[test]
    fn empty_camp_warns() {
        let issues = validate_roster(&ids(&["kant"]), &[], &[], 4, 6);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].code, ConfigIssueCode::EmptyCamp);
        assert!(!has_errors(&issues));
    }

    #[test]
    fn both_camps_is_error() {
        let issues = validate_roster(&ids(&["kant"]), &ids(&["kant"]), &[], 4, 6);
        assert!(has_errors(&issues));
        assert_eq!(issues[0].code, ConfigIssueCode::ParticipantInBothCamps);
    }

    #[test]
    fn zero_bounds_are_errors() {
        let issues = validate_roster(&ids(&["a"]), &ids(&["b"]), &[], 0, 0);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.code == ConfigIssueCode::ZeroExchangeBound));
    }

    #[test]
    fn unknown_human_warns() {
        let issues = validate_roster(&ids(&["a"]), &ids(&["b"]), &ids(&["carol"]), 4, 6);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::UnknownHuman);
    }
}
