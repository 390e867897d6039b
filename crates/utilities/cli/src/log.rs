//! Logging configuration derived from [`LogArgs`].

use crate::{LogArgs, LogFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// How often log files are rotated.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[clap(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate every minute.
    Minutely,
    /// Rotate every hour.
    Hourly,
    /// Rotate every day.
    Daily,
    /// Never rotate.
    #[default]
    Never,
}

/// Stdout logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StdoutLogConfig {
    /// Log format.
    pub format: LogFormat,
}

/// File logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLogConfig {
    /// Directory the log files are written to.
    pub directory_path: PathBuf,
    /// Log format.
    pub format: LogFormat,
    /// Rotation schedule.
    pub rotation: LogRotation,
}

/// The complete logging setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Most verbose level logged by any layer.
    pub global_level: LevelFilter,
    /// Stdout logging, if enabled.
    pub stdout_logs: Option<StdoutLogConfig>,
    /// File logging, if enabled.
    pub file_logs: Option<FileLogConfig>,
}

impl LogConfig {
    /// Creates a [`LogConfig`] from parsed [`LogArgs`].
    pub fn new(args: LogArgs) -> Self {
        let stdout_logs =
            (!args.stdout_quiet).then_some(StdoutLogConfig { format: args.stdout_format });
        let file_logs = args.file_directory.map(|directory_path| FileLogConfig {
            directory_path,
            format: args.file_format,
            rotation: args.file_rotation,
        });

        Self { global_level: level_filter(args.level), stdout_logs, file_logs }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(LogArgs::default())
    }
}

const fn level_filter(level: u8) -> LevelFilter {
    match level {
        0 => LevelFilter::OFF,
        1 => LevelFilter::ERROR,
        2 => LevelFilter::WARN,
        3 => LevelFilter::INFO,
        4 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, LevelFilter::OFF)]
    #[case(1, LevelFilter::ERROR)]
    #[case(2, LevelFilter::WARN)]
    #[case(3, LevelFilter::INFO)]
    #[case(4, LevelFilter::DEBUG)]
    #[case(5, LevelFilter::TRACE)]
    #[case(9, LevelFilter::TRACE)]
    fn test_level_filter(#[case] level: u8, #[case] expected: LevelFilter) {
        let config = LogConfig::new(LogArgs { level, ..Default::default() });
        assert_eq!(config.global_level, expected);
    }

    #[test]
    fn test_default_logs_to_stdout_only() {
        let config = LogConfig::default();
        assert_eq!(config.stdout_logs, Some(StdoutLogConfig { format: LogFormat::Full }));
        assert_eq!(config.file_logs, None);
    }

    #[test]
    fn test_quiet_with_file_directory() {
        let config = LogConfig::new(LogArgs {
            stdout_quiet: true,
            file_directory: Some(PathBuf::from("/var/log/reporter")),
            file_format: LogFormat::Json,
            file_rotation: LogRotation::Hourly,
            ..Default::default()
        });

        assert_eq!(config.stdout_logs, None);
        assert_eq!(
            config.file_logs,
            Some(FileLogConfig {
                directory_path: PathBuf::from("/var/log/reporter"),
                format: LogFormat::Json,
                rotation: LogRotation::Hourly,
            })
        );
    }
}
