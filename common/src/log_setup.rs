//! Logging for binaries: console output plus a daily rolling log file.

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Keeps the file writer flushing until process exit.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where and how log files are written.
#[derive(Debug, Clone)]
pub struct LogFiles {
    pub dir: PathBuf,
    /// Files are named `<prefix>.<date>.log`.
    pub prefix: String,
    /// Older files beyond this count are deleted on rotation.
    pub max_files: usize,
}

impl LogFiles {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            max_files: 5,
        }
    }
}

impl Default for LogFiles {
    fn default() -> Self {
        Self::new("logs", "voxlabel")
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `base_level`.
///
/// Warnings and errors go to stderr, everything else to stdout; the file
/// gets all events without ANSI colors.
///
/// # Panics
/// If the filter is invalid, the log directory cannot be created, or a
/// global subscriber is already installed.
pub fn setup_logging(base_level: &str, files: &LogFiles) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(base_level))
        .unwrap_or_else(|e| panic!("Invalid log filter '{base_level}': {e}"));

    std::fs::create_dir_all(&files.dir).unwrap_or_else(|e| {
        panic!(
            "Failed to create log directory '{}': {e}",
            files.dir.display()
        )
    });
    let appender = Builder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(&files.prefix)
        .filename_suffix("log")
        .max_log_files(files.max_files)
        .build(&files.dir)
        .unwrap_or_else(|e| panic!("Failed to create log file appender: {e}"));
    let (file_writer, guard) = tracing_appender::non_blocking(appender);
    if FILE_GUARD.set(guard).is_err() {
        panic!("Logging already initialized");
    }

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr.with_max_level(Level::WARN).or_else(std::io::stdout));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .unwrap_or_else(|e| panic!("Logger initialization failed: {e}"));
}
