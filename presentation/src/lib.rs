//! Presentation layer for agora
//!
//! This crate contains the CLI definition, the transcript formatter,
//! progress reporters and the terminal input for human debaters.

pub mod cli;
pub mod human;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, HumanSeat, OutputFormat, Side};
pub use human::stdin::StdinHumanInput;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
