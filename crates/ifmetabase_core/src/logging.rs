//! Process-wide logging bootstrap for metabase hosts.
//!
//! # Responsibility
//! - Validate a logging configuration (level + absolute directory).
//! - Start a rolling file logger once per process.
//!
//! # Invariants
//! - The first successful configuration wins; repeating it is a no-op and
//!   any different configuration is rejected.
//! - Initialization never panics.
//! - Store events carry identities and keys only, never attribute values.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "ifmetabase";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    config: LogConfig,
    _handle: LoggerHandle,
}

pub type LoggingResult<T> = Result<T, LoggingError>;

/// Logging bootstrap failures.
#[derive(Debug)]
pub enum LoggingError {
    /// Level is not one of trace|debug|info|warn|error.
    UnsupportedLevel(String),
    /// Directory is empty or relative.
    InvalidDirectory(String),
    /// Directory could not be created.
    CreateDirectory {
        dir: PathBuf,
        source: std::io::Error,
    },
    /// The logger backend refused to start.
    Backend(flexi_logger::FlexiLoggerError),
    /// A different configuration is already active.
    AlreadyInitialized { active: LogConfig },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidDirectory(dir) => {
                write!(f, "log directory must be a non-empty absolute path, got `{dir}`")
            }
            Self::CreateDirectory { dir, source } => write!(
                f,
                "failed to create log directory `{}`: {source}",
                dir.display()
            ),
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
            Self::AlreadyInitialized { active } => write!(
                f,
                "logging already initialized with level `{}` at `{}`",
                active.level,
                active.dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDirectory { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

impl From<flexi_logger::FlexiLoggerError> for LoggingError {
    fn from(value: flexi_logger::FlexiLoggerError) -> Self {
        Self::Backend(value)
    }
}

/// Validated logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    level: &'static str,
    dir: PathBuf,
}

impl LogConfig {
    /// Normalizes `level` and checks that `dir` is absolute.
    pub fn new(level: &str, dir: &str) -> LoggingResult<Self> {
        Ok(Self {
            level: normalize_level(level)?,
            dir: normalize_dir(dir)?,
        })
    }

    /// Build-mode default level in the given directory.
    pub fn with_default_level(dir: &str) -> LoggingResult<Self> {
        Self::new(default_log_level(), dir)
    }

    pub fn level(&self) -> &'static str {
        self.level
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Starts the file logger described by `level` and `log_dir`.
///
/// # Errors
/// - Invalid level or directory.
/// - Directory creation or backend start failure.
/// - A different configuration is already active.
pub fn init_logging(level: &str, log_dir: &str) -> LoggingResult<()> {
    init_logging_with(LogConfig::new(level, log_dir)?)
}

/// Same as [`init_logging`] for an already validated configuration.
pub fn init_logging_with(config: LogConfig) -> LoggingResult<()> {
    let active = ACTIVE_LOGGER.get_or_try_init(|| start_logger(config.clone()))?;
    if active.config != config {
        return Err(LoggingError::AlreadyInitialized {
            active: active.config.clone(),
        });
    }
    Ok(())
}

/// Active configuration, or `None` before initialization.
pub fn logging_status() -> Option<LogConfig> {
    ACTIVE_LOGGER.get().map(|active| active.config.clone())
}

/// `debug` in debug builds, `info` in release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(config: LogConfig) -> LoggingResult<ActiveLogger> {
    std::fs::create_dir_all(&config.dir).map_err(|source| LoggingError::CreateDirectory {
        dir: config.dir.clone(),
        source,
    })?;

    let handle = Logger::try_with_str(config.level)?
        .log_to_file(
            FileSpec::default()
                .directory(config.dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()?;

    info!(
        "event=logging_started module=logging status=ok level={} log_dir={} version={}",
        config.level,
        config.dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        config,
        _handle: handle,
    })
}

fn normalize_level(level: &str) -> LoggingResult<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

fn normalize_dir(dir: &str) -> LoggingResult<PathBuf> {
    let trimmed = dir.trim();
    let path = Path::new(trimmed);
    if trimmed.is_empty() || !path.is_absolute() {
        return Err(LoggingError::InvalidDirectory(trimmed.to_string()));
    }
    Ok(path.to_path_buf())
}
