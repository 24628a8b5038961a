//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished debate is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Turn-by-turn transcript as the debate runs (default)
    #[default]
    Transcript,
    /// Final state as JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_transcript() {
        assert_eq!(OutputFormat::default(), OutputFormat::Transcript);
    }

    #[test]
    fn test_deserialize_lowercase() {
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
    }
}
