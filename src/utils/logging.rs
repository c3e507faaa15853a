/// File logging setup
///
/// Logs go to a daily rolling file only; the terminal belongs to the TUI.
/// A log directory that cannot be created disables file output instead of
/// stopping the program.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::utils::{AppConfig, APP_NAME};

/// Daily rolling appender in `dir`, or `None` if it cannot be opened
pub fn file_writer(dir: &Path) -> Option<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(APP_NAME)
        .filename_suffix("log")
        .build(dir)
        .map_err(|e| eprintln!("warning: file logging disabled ({}): {}", dir.display(), e))
        .ok()
}

/// `RUST_LOG` wins over the configured level; a bad filter falls back to info
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init(config: &AppConfig) {
    let file_layer = file_writer(&AppConfig::log_dir())
        .map(|writer| tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false));

    let installed = tracing_subscriber::registry()
        .with(env_filter(&config.logging.level))
        .with(file_layer)
        .try_init();

    if installed.is_err() {
        eprintln!("warning: a global logger is already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_writer_in_writable_dir() {
        let dir = TempDir::new().unwrap();
        let logs = dir.path().join("nested").join("logs");

        let mut writer = file_writer(&logs).unwrap();
        writeln!(writer, "hello").unwrap();
        writer.flush().unwrap();

        let names: Vec<String> = std::fs::read_dir(&logs)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with(APP_NAME) && names[0].ends_with(".log"));
    }

    #[test]
    fn test_uncreatable_dir_disables_file_logging() {
        // A regular file where a directory is expected fails even for root
        let file = NamedTempFile::new().unwrap();
        let logs = file.path().join("logs");

        assert!(file_writer(&logs).is_none());
    }

    #[test]
    fn test_invalid_level_falls_back() {
        // Must not panic whatever RUST_LOG holds in the test environment
        let _ = env_filter("not a [valid filter");
    }
}
