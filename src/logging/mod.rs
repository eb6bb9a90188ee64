//! Named loggers with a file sink and a console sink.
//!
//! [`setup_logger`] builds a `tracing` dispatcher per logger name and keeps
//! it in a process-wide registry, so asking for the same name twice hands
//! back the logger that already exists instead of stacking more sinks.

#[cfg(test)]
pub(crate) mod capture;
pub mod format;
pub mod timing;

pub use format::LineFormat;
pub use timing::log_execution_time;

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::Dispatch;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt as fmt_layer, EnvFilter};

/// Configured loggers, keyed by name.
static LOGGERS: Lazy<Mutex<HashMap<String, Logger>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Settings for a new logger.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// File the file sink appends to (default: `logs/automation.log`).
    pub log_file: PathBuf,

    /// Filter directive, e.g. `info` or `wakeup=debug` (default: `info`).
    pub filter: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("logs").join("automation.log"),
            filter: "info".to_owned(),
        }
    }
}

/// A destination attached to a [`Logger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    File(PathBuf),
    Console,
}

#[derive(Debug)]
pub enum LoggerError {
    CreateDir { path: PathBuf, source: io::Error },
    OpenFile { path: PathBuf, source: io::Error },
    GlobalAlreadySet,
}

impl fmt::Display for LoggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggerError::CreateDir { path, source } => {
                write!(f, "Failed to create log directory {}: {}", path.display(), source)
            }
            LoggerError::OpenFile { path, source } => {
                write!(f, "Failed to open log file {}: {}", path.display(), source)
            }
            LoggerError::GlobalAlreadySet => write!(f, "A global logger is already installed"),
        }
    }
}

impl std::error::Error for LoggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggerError::CreateDir { source, .. } | LoggerError::OpenFile { source, .. } => {
                Some(source)
            }
            LoggerError::GlobalAlreadySet => None,
        }
    }
}

/// A configured logger. Cheap to clone; clones share the same sinks.
#[derive(Debug, Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

#[derive(Debug)]
struct LoggerInner {
    name: String,
    sinks: Vec<Sink>,
    dispatch: Dispatch,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn sinks(&self) -> &[Sink] {
        &self.inner.sinks
    }

    /// Path of the file sink.
    pub fn log_file(&self) -> Option<&Path> {
        self.inner.sinks.iter().find_map(|sink| match sink {
            Sink::File(path) => Some(path.as_path()),
            Sink::Console => None,
        })
    }

    /// Returns true if both handles point at the same configured logger.
    pub fn ptr_eq(a: &Logger, b: &Logger) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Runs `f` with this logger receiving every `tracing` event.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.inner.dispatch, f)
    }

    /// [`log_execution_time`] with this logger active.
    pub fn time<T, E, F>(&self, name: &str, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: fmt::Display,
    {
        self.in_scope(|| log_execution_time(name, f))
    }

    /// Makes this logger the process-wide default dispatcher.
    ///
    /// Only one global default can ever be installed.
    pub fn install_global(&self) -> Result<(), LoggerError> {
        tracing::dispatcher::set_global_default(self.inner.dispatch.clone())
            .map_err(|_| LoggerError::GlobalAlreadySet)
    }
}

/// Returns the logger registered under `name`, creating it on first use.
///
/// The file's parent directory is created if needed. A later call with the
/// same name returns the existing logger and ignores `config`.
///
/// # Example
/// ```no_run
/// use wakeup::{setup_logger, LoggerConfig};
///
/// let logger = setup_logger("work_automation", &LoggerConfig::default())?;
/// logger.in_scope(|| tracing::info!("Automation started"));
/// # Ok::<(), wakeup::LoggerError>(())
/// ```
pub fn setup_logger(name: &str, config: &LoggerConfig) -> Result<Logger, LoggerError> {
    let mut loggers = LOGGERS.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(existing) = loggers.get(name) {
        return Ok(existing.clone());
    }

    let logger = build_logger(name, config)?;
    loggers.insert(name.to_owned(), logger.clone());
    Ok(logger)
}

fn build_logger(name: &str, config: &LoggerConfig) -> Result<Logger, LoggerError> {
    if let Some(dir) = config.log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| LoggerError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(|source| LoggerError::OpenFile {
            path: config.log_file.clone(),
            source,
        })?;

    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|e| {
        eprintln!("Invalid log filter {:?} ({}), using info", config.filter, e);
        EnvFilter::new("info")
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt_layer::layer()
                .event_format(LineFormat::new(name))
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .with(
            fmt_layer::layer()
                .event_format(LineFormat::new(name))
                .with_writer(io::stdout),
        );

    Ok(Logger {
        inner: Arc::new(LoggerInner {
            name: name.to_owned(),
            sinks: vec![Sink::File(config.log_file.clone()), Sink::Console],
            dispatch: Dispatch::new(subscriber),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path, file: &str) -> LoggerConfig {
        LoggerConfig {
            log_file: dir.join(file),
            ..LoggerConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = LoggerConfig::default();
        assert_eq!(config.log_file, Path::new("logs").join("automation.log"));
        assert_eq!(config.filter, "info");
    }

    #[test]
    fn test_second_setup_does_not_duplicate_sinks() {
        let dir = tempfile::tempdir().unwrap();
        let first_config = config_in(dir.path(), "first.log");
        let second_config = config_in(dir.path(), "second.log");

        let first = setup_logger("registry-idempotent", &first_config).unwrap();
        let second = setup_logger("registry-idempotent", &second_config).unwrap();

        assert!(Logger::ptr_eq(&first, &second));
        assert_eq!(
            second.sinks(),
            &[Sink::File(first_config.log_file.clone()), Sink::Console]
        );
        assert_eq!(second.log_file(), Some(first_config.log_file.as_path()));
        assert!(!second_config.log_file.exists());

        second.in_scope(|| tracing::info!("Logged once"));

        let contents = fs::read_to_string(&first_config.log_file).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" - registry-idempotent - INFO - Logged once"));
    }

    #[test]
    fn test_distinct_names_get_distinct_loggers() {
        let dir = tempfile::tempdir().unwrap();
        let a = setup_logger("registry-a", &config_in(dir.path(), "a.log")).unwrap();
        let b = setup_logger("registry-b", &config_in(dir.path(), "b.log")).unwrap();

        assert!(!Logger::ptr_eq(&a, &b));
        assert_eq!(a.name(), "registry-a");
        assert_eq!(b.name(), "registry-b");
    }

    #[test]
    fn test_creates_parent_directory_and_writes_lines() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "nested/deeper/run.log");

        let logger = setup_logger("file-sink", &config).unwrap();
        assert!(config.log_file.parent().unwrap().is_dir());

        logger.in_scope(|| {
            tracing::info!("Wake cycle finished");
            tracing::debug!("Filtered out at info");
        });

        let contents = fs::read_to_string(&config.log_file).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" - file-sink - INFO - Wake cycle finished"));
    }

    #[test]
    fn test_time_logs_through_logger() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "timed.log");
        let logger = setup_logger("timed", &config).unwrap();

        let result: Result<(), String> = logger.time("sync", || Err("remote closed".to_owned()));
        assert_eq!(result.unwrap_err(), "remote closed");

        let contents = fs::read_to_string(&config.log_file).unwrap();
        let errors: Vec<&str> = contents.lines().filter(|l| l.contains(" - ERROR - ")).collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Function 'sync' failed after "));
        assert!(errors[0].ends_with("seconds: remote closed"));
    }

    #[test]
    fn test_unwritable_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"").unwrap();

        let config = config_in(&blocker, "app.log");
        let err = setup_logger("blocked", &config).unwrap_err();
        assert!(matches!(err, LoggerError::CreateDir { .. }));
        assert!(err.to_string().starts_with("Failed to create log directory"));
    }
}
