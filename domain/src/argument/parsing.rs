//! Reply parsing for argument extraction, scoring and maneuver planning.
//!
//! Model replies are free-form text that usually, but not always, contain
//! JSON. Each parser walks one ordered chain of candidate JSON slices and
//! returns a [`ParseOutcome`] telling the caller whether the value came from
//! the reply or from the fixed fallback.
//!
//! # Candidate order
//!
//! 1. ` ```json ` (or bare ` ``` `) fenced blocks
//! 2. The whole reply
//! 3. The outermost `[...]` slice
//! 4. The outermost `{...}` slice

use crate::argument::entities::{ArgumentType, NEUTRAL_SCORE, ScoreAxes, StructuredArgument};
use crate::core::string::truncate_str;
use crate::strategy::plans::RhetoricalPayload;
use serde_json::Value;

/// Maximum bytes of raw text kept in a fallback claim
pub const FALLBACK_CLAIM_BYTES: usize = 200;

/// A parsed value tagged with where it came from
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome<T> {
    /// Read from the model reply
    Parsed(T),
    /// The reply could not be read; this is the fixed default
    Fallback(T),
}

impl<T> ParseOutcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ParseOutcome::Fallback(_))
    }

    pub fn value(&self) -> &T {
        match self {
            ParseOutcome::Parsed(v) | ParseOutcome::Fallback(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            ParseOutcome::Parsed(v) | ParseOutcome::Fallback(v) => v,
        }
    }
}

/// Parse an extraction reply into structured arguments.
///
/// Accepts a JSON array of argument objects, an object with an `arguments`
/// array, or a single argument object. Entries without a claim are dropped.
/// When nothing usable is found the result is a single
/// [`ArgumentType::Unknown`] argument whose claim is the truncated
/// `original_text`.
pub fn parse_arguments(reply: &str, original_text: &str) -> ParseOutcome<Vec<StructuredArgument>> {
    for candidate in json_candidates(reply) {
        let Ok(value) = serde_json::from_str::<Value>(candidate) else {
            continue;
        };
        let items: Vec<&Value> = match &value {
            Value::Array(items) => items.iter().collect(),
            Value::Object(map) => match map.get("arguments").and_then(Value::as_array) {
                Some(items) => items.iter().collect(),
                None => vec![&value],
            },
            _ => continue,
        };
        let arguments: Vec<StructuredArgument> =
            items.into_iter().filter_map(argument_from_json).collect();
        if !arguments.is_empty() {
            return ParseOutcome::Parsed(arguments);
        }
    }

    ParseOutcome::Fallback(vec![fallback_argument(original_text)])
}

/// The argument used when an utterance cannot be decomposed.
///
/// The claim is the leading [`FALLBACK_CLAIM_BYTES`] of the text exactly as
/// spoken, whitespace included.
pub fn fallback_argument(original_text: &str) -> StructuredArgument {
    StructuredArgument::new(
        truncate_str(original_text, FALLBACK_CLAIM_BYTES),
        ArgumentType::Unknown,
    )
}

/// Parse a scoring reply into the four axes.
///
/// Missing axes default to [`NEUTRAL_SCORE`]; values are clamped to `[0, 1]`.
/// Scores on a 0-10 scale are accepted and rescaled. A reply with no
/// readable axis at all yields the neutral fallback.
pub fn parse_score_axes(reply: &str) -> ParseOutcome<ScoreAxes> {
    for candidate in json_candidates(reply) {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(candidate) else {
            continue;
        };
        let read = |key: &str| map.get(key).and_then(Value::as_f64).map(rescale);
        let axes = [
            read("logical_strength"),
            read("evidence_quality"),
            read("vulnerability"),
            read("relevance"),
        ];
        if axes.iter().all(Option::is_none) {
            continue;
        }
        let [logic, evidence, vulnerability, relevance] = axes.map(|a| a.unwrap_or(NEUTRAL_SCORE));
        return ParseOutcome::Parsed(ScoreAxes::new(logic, evidence, vulnerability, relevance));
    }

    ParseOutcome::Fallback(ScoreAxes::neutral())
}

/// Parse a planning reply into a rhetorical payload.
///
/// Needs a non-empty `approach`; `key_points` may be missing. The caller
/// supplies the fallback because it depends on the chosen strategy.
pub fn parse_payload(
    reply: &str,
    fallback: impl FnOnce() -> RhetoricalPayload,
) -> ParseOutcome<RhetoricalPayload> {
    for candidate in json_candidates(reply) {
        let Ok(payload) = serde_json::from_str::<RhetoricalPayload>(candidate) else {
            continue;
        };
        if payload.approach.trim().is_empty() {
            continue;
        }
        let key_points = payload
            .key_points
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        return ParseOutcome::Parsed(RhetoricalPayload {
            approach: payload.approach.trim().to_string(),
            key_points,
        });
    }

    ParseOutcome::Fallback(fallback())
}

/// Ordered JSON slices worth trying, most specific first
pub fn json_candidates(reply: &str) -> Vec<&str> {
    let mut candidates = fenced_blocks(reply);

    let trimmed = reply.trim();
    if !trimmed.is_empty() {
        candidates.push(trimmed);
    }
    for (open, close) in [('[', ']'), ('{', '}')] {
        if let Some(start) = reply.find(open)
            && let Some(end) = reply.rfind(close)
            && end > start
        {
            candidates.push(&reply[start..=end]);
        }
    }
    candidates
}

fn fenced_blocks(reply: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = reply;
    while let Some(start) = rest.find("```") {
        let after_fence = &rest[start + 3..];
        // Skip the info string (e.g. "json") up to the end of the line
        let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after_fence[body_start..];
        let Some(end) = body.find("```") else {
            break;
        };
        blocks.push(body[..end].trim());
        rest = &body[end + 3..];
    }
    blocks
}

fn argument_from_json(value: &Value) -> Option<StructuredArgument> {
    let text = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("")
            .to_string()
    };

    let claim = text("claim");
    if claim.is_empty() {
        return None;
    }

    let mut argument = StructuredArgument::new(
        claim,
        ArgumentType::parse_lenient(&text("argument_type")),
    )
    .with_evidence(text("evidence"))
    .with_reasoning(text("reasoning"));

    match value.get("assumptions") {
        Some(Value::Array(items)) => {
            for item in items.iter().filter_map(Value::as_str) {
                if !item.trim().is_empty() {
                    argument = argument.with_assumption(item.trim());
                }
            }
        }
        Some(Value::String(single)) if !single.trim().is_empty() => {
            argument = argument.with_assumption(single.trim());
        }
        _ => {}
    }

    Some(argument)
}

/// Accept both unit-interval and 0-10 scales
fn rescale(value: f64) -> f64 {
    if value > 1.0 && value <= 10.0 {
        value / 10.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments_array() {
        let reply = r#"[
            {"claim": "Free will is an illusion", "evidence": "Libet experiments",
             "reasoning": "Neural activity precedes awareness",
             "assumptions": ["consciousness is causal", "lab findings generalise"],
             "argument_type": "empirical"},
            {"claim": "Responsibility needs freedom", "argument_type": "ethical"}
        ]"#;
        let outcome = parse_arguments(reply, "raw");
        assert!(!outcome.is_fallback());
        let arguments = outcome.into_inner();
        assert_eq!(arguments.len(), 2);
        assert_eq!(arguments[0].argument_type, ArgumentType::Empirical);
        assert_eq!(arguments[0].assumptions.len(), 2);
        assert!(arguments[0].has_evidence());
        assert_eq!(arguments[1].argument_type, ArgumentType::Ethical);
        assert!(!arguments[1].has_evidence());
    }

    #[test]
    fn test_parse_arguments_fenced_with_prose() {
        let reply = "Here is the analysis:\n```json\n{\"arguments\": [{\"claim\": \"Markets self-correct\", \"argument_type\": \"causal\"}]}\n```\nHope this helps.";
        let arguments = parse_arguments(reply, "raw").into_inner();
        assert_eq!(arguments.len(), 1);
        assert_eq!(arguments[0].claim, "Markets self-correct");
        assert_eq!(arguments[0].argument_type, ArgumentType::Causal);
    }

    #[test]
    fn test_parse_arguments_single_object() {
        let reply = r#"Sure. {"claim": "Virtue is knowledge", "assumptions": "people act on what they know"}"#;
        let arguments = parse_arguments(reply, "raw").into_inner();
        assert_eq!(arguments.len(), 1);
        assert_eq!(arguments[0].argument_type, ArgumentType::Unknown);
        assert!(arguments[0].assumptions.contains("people act on what they know"));
    }

    #[test]
    fn test_unparsable_reply_falls_back_to_truncated_text() {
        let original = "x".repeat(FALLBACK_CLAIM_BYTES + 50);
        let outcome = parse_arguments("I could not find any arguments, sorry.", &original);
        assert!(outcome.is_fallback());
        let arguments = outcome.into_inner();
        assert_eq!(arguments.len(), 1);
        assert_eq!(arguments[0].argument_type, ArgumentType::Unknown);
        assert_eq!(arguments[0].claim, &original[..FALLBACK_CLAIM_BYTES]);
    }

    #[test]
    fn test_fallback_keeps_leading_whitespace() {
        let original = "  Leading space utterance";
        let outcome = parse_arguments("no json here", original);
        assert!(outcome.is_fallback());
        assert_eq!(outcome.value()[0].claim, original);

        let padded = format!("{}{}", " ".repeat(10), "y".repeat(FALLBACK_CLAIM_BYTES));
        let claim = fallback_argument(&padded).claim;
        assert_eq!(claim.len(), FALLBACK_CLAIM_BYTES);
        assert_eq!(claim, &padded[..FALLBACK_CLAIM_BYTES]);
    }

    #[test]
    fn test_empty_reply_falls_back() {
        let outcome = parse_arguments("", "Short utterance");
        assert!(outcome.is_fallback());
        assert_eq!(outcome.value()[0].claim, "Short utterance");
    }

    #[test]
    fn test_arguments_without_claims_fall_back() {
        let outcome = parse_arguments(r#"[{"evidence": "none"}]"#, "text");
        assert!(outcome.is_fallback());
    }

    #[test]
    fn test_parse_score_axes() {
        let reply = r#"{"logical_strength": 0.8, "evidence_quality": 0.4, "vulnerability": 0.7, "relevance": 0.9}"#;
        let outcome = parse_score_axes(reply);
        assert!(!outcome.is_fallback());
        let axes = outcome.into_inner();
        assert_eq!(axes.logical_strength, 0.8);
        assert_eq!(axes.vulnerability, 0.7);
    }

    #[test]
    fn test_parse_score_axes_partial_and_rescaled() {
        let axes = parse_score_axes("Scores: {\"vulnerability\": 8, \"relevance\": 1.4e1}").into_inner();
        assert_eq!(axes.vulnerability, 0.8);
        // 14 is outside the 0-10 scale, so it is clamped instead
        assert_eq!(axes.relevance, 1.0);
        assert_eq!(axes.logical_strength, NEUTRAL_SCORE);
    }

    #[test]
    fn test_parse_score_axes_fallback() {
        let outcome = parse_score_axes("The argument is quite weak overall.");
        assert!(outcome.is_fallback());
        assert_eq!(*outcome.value(), ScoreAxes::neutral());
    }

    #[test]
    fn test_parse_payload() {
        let reply = "```json\n{\"approach\": \" Expose the circularity \", \"key_points\": [\"a\", \" \"]}\n```";
        let outcome = parse_payload(reply, RhetoricalPayload::default);
        assert!(!outcome.is_fallback());
        let payload = outcome.into_inner();
        assert_eq!(payload.approach, "Expose the circularity");
        assert_eq!(payload.key_points, vec!["a"]);
    }

    #[test]
    fn test_parse_payload_fallback() {
        let outcome = parse_payload("{\"approach\": \"\"}", || RhetoricalPayload {
            approach: "fixed".to_string(),
            key_points: Vec::new(),
        });
        assert!(outcome.is_fallback());
        assert_eq!(outcome.value().approach, "fixed");
    }

    #[test]
    fn test_json_candidates_order() {
        let reply = "prefix ```json\n[1]\n``` suffix {\"a\": 1}";
        let candidates = json_candidates(reply);
        assert_eq!(candidates[0], "[1]");
        assert!(candidates.contains(&"{\"a\": 1}"));
    }
}
