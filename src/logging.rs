//! Logging setup using `tracing`, `tracing-subscriber` and `tracing-appender`.
//!
//! Two sinks are installed:
//!
//! - stderr, filtered by `RUST_LOG` or the `-v` count (info / debug / trace)
//! - a daily-rotated file in the log directory, always at debug
//!
//! If the log directory can't be used, only the stderr sink is installed.

use std::io;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Prefix of rotated log file names.
pub const LOG_FILE_PREFIX: &str = "cursor-sync";

/// Suffix of rotated log file names.
pub const LOG_FILE_SUFFIX: &str = "log";

/// Number of rotated files kept on disk.
pub const MAX_LOG_FILES: usize = 7;

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level for the stderr sink when `RUST_LOG` is unset.
    pub level: Level,
    /// Directory for rotated log files (`None` disables the file sink).
    pub log_dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            log_dir: None,
        }
    }
}

impl LogConfig {
    /// Create a `LogConfig` from CLI verbosity count.
    ///
    /// - 0 (no `-v`): info level
    /// - 1 (`-v`): debug level
    /// - 2+ (`-vv`): trace level
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    /// Set the log directory.
    #[must_use]
    pub fn with_log_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.log_dir = dir;
        self
    }
}

/// Keeps the background log writer alive. Drop it on exit to flush.
#[derive(Debug)]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
    /// Why the file sink was not installed, if it wasn't.
    pub file_error: Option<String>,
}

/// Initialize the global tracing subscriber.
///
/// Call once at startup and hold the returned guard until exit. A second
/// call leaves the first subscriber in place.
pub fn init_logging(config: &LogConfig) -> LogGuard {
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(build_env_filter(config.level));

    let (file_layer, guard, file_error) = match config.log_dir.as_deref().map(open_appender) {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(LevelFilter::DEBUG);
            (Some(layer), Some(guard), None)
        }
        Some(Err(e)) => (None, None, Some(e)),
        None => (None, None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    if let Some(ref e) = file_error {
        tracing::warn!("File logging disabled: {}", e);
    }

    LogGuard {
        _file: guard,
        file_error,
    }
}

fn open_appender(dir: &Path) -> Result<RollingFileAppender, String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("cannot create log directory {}: {}", dir.display(), e))?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
        .map_err(|e| e.to_string())
}

/// Build an `EnvFilter` from the given level, respecting `RUST_LOG`.
fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Keep HTTP client internals quiet unless asked for
        let level = level.as_str().to_lowercase();
        EnvFilter::new(format!("warn,cursor_sync={level}"))
    })
}
