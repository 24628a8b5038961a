//! Tracing subscriber setup

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive for a `-v` count
pub fn filter_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    }
}

/// Initialize logging to stderr and, when configured, to `file`
///
/// The returned guard flushes the file writer on drop and must be held
/// until the program exits.
pub fn init(verbose: u8, file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter_for(verbose)));

    let (file_layer, guard) = match file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("Log path has no file name: {}", path.display()))?;
            std::fs::create_dir_all(directory)
                .with_context(|| format!("Cannot create log directory {}", directory.display()))?;

            let appender = tracing_appender::rolling::never(directory, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new(filter_for(verbose.max(1))));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_for_verbosity() {
        assert_eq!(filter_for(0), "warn");
        assert_eq!(filter_for(1), "info");
        assert_eq!(filter_for(2), "debug");
        assert_eq!(filter_for(9), "trace");
    }
}
