//! Logging flags.

use crate::{LogFormat, LogRotation};
use clap::Args;
use std::path::PathBuf;

/// Logging arguments shared by the reporter binaries.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct LogArgs {
    /// Verbosity level (0-5). `0` disables logging, `1` is errors only, `5` is trace.
    #[arg(
        short = 'v',
        long = "verbosity",
        env = "LOG_VERBOSITY",
        default_value_t = 3,
        global = true
    )]
    pub level: u8,

    /// Do not log to stdout.
    #[arg(long = "log.stdout.quiet", env = "LOG_STDOUT_QUIET", global = true)]
    pub stdout_quiet: bool,

    /// Format of stdout logs.
    #[arg(long = "log.format", env = "LOG_FORMAT", default_value = "full", global = true)]
    pub stdout_format: LogFormat,

    /// Directory for log files. File logging is disabled when unset.
    #[arg(long = "log.file-dir", env = "LOG_FILE_DIR", global = true)]
    pub file_directory: Option<PathBuf>,

    /// Format of file logs.
    #[arg(long = "log.file-format", env = "LOG_FILE_FORMAT", default_value = "full", global = true)]
    pub file_format: LogFormat,

    /// How often log files are rotated.
    #[arg(
        long = "log.file-rotation",
        env = "LOG_FILE_ROTATION",
        default_value = "never",
        global = true
    )]
    pub file_rotation: LogRotation,
}

impl Default for LogArgs {
    fn default() -> Self {
        Self {
            level: 3,
            stdout_quiet: false,
            stdout_format: LogFormat::Full,
            file_directory: None,
            file_format: LogFormat::Full,
            file_rotation: LogRotation::Never,
        }
    }
}
