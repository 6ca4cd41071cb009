use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use time::UtcOffset;
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{self, fmt, prelude::*};

const LOG_RETENTION_DAYS: u64 = 7;

const SESSION_PREFIX: &str = "session-";

/// Per-user log directory, created on demand.
/// - Linux: ~/.cache/qasm-language-server/
/// - macOS: ~/Library/Caches/qasm-language-server/
/// - Windows: %LOCALAPPDATA%\qasm-language-server\
pub fn log_dir() -> io::Result<PathBuf> {
    let mut dir = dirs::cache_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Unable to determine user cache directory"))?;
    dir.push("qasm-language-server");

    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

fn is_session_log(name: &str) -> bool {
    name.starts_with(SESSION_PREFIX) && name.ends_with(".log")
}

/// Remove session logs older than [`LOG_RETENTION_DAYS`]. Returns how many
/// files were removed.
fn cleanup_old_logs(dir: &Path, now: SystemTime) -> usize {
    let retention = Duration::from_secs(LOG_RETENTION_DAYS * 24 * 60 * 60);
    let mut removed = 0;

    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    for entry in entries.flatten() {
        let Ok(metadata) = entry.metadata() else { continue };
        if !metadata.is_file() || !entry.file_name().to_str().is_some_and(is_session_log) {
            continue;
        }
        let expired = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .is_some_and(|age| age > retention);
        if !expired {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) => eprintln!("Failed to remove old log file {:?}: {}", entry.path(), e),
        }
    }

    removed
}

fn session_id() -> String {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(format_description!("[year][month][day]-[hour][minute][second]"))
        .unwrap_or_else(|_| "unknown".to_string());
    format!("{}-{}", timestamp, std::process::id())
}

/// Whether a `try_init` failure only means a global subscriber is already installed.
fn already_initialized(err: &dyn std::error::Error) -> bool {
    let message = err.to_string();
    message.contains("already been set") || message.contains("SetLoggerError")
}

/// Initialize logging to stderr and, optionally, a session log file.
///
/// Returns a [`WorkerGuard`] that must be kept alive for the duration of the
/// program so buffered file output is flushed.
///
/// # Arguments
/// * `no_color` - Disable ANSI colors in stderr output
/// * `log_level` - Override log level (otherwise uses RUST_LOG or defaults to "info")
/// * `enable_file_logging` - Also write a DEBUG-level session log to [`log_dir`]
///
/// stdout carries the LSP stream, so nothing is ever logged there. Calling
/// this more than once is harmless; later calls keep the first subscriber.
pub fn init_logger(no_color: bool, log_level: Option<&str>, enable_file_logging: bool) -> io::Result<WorkerGuard> {
    let timer = fmt::time::OffsetTime::new(
        UtcOffset::UTC,
        format_description!("[[[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z]"),
    );

    let stderr_filter = match log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(timer.clone())
        .with_ansi(!no_color)
        .with_filter(stderr_filter);

    if !enable_file_logging {
        let (_, guard) = tracing_appender::non_blocking(std::io::sink());
        return match tracing_subscriber::registry().with(stderr_layer).try_init() {
            Ok(()) => Ok(guard),
            Err(e) if already_initialized(&e) => Ok(guard),
            Err(e) => Err(io::Error::other(e)),
        };
    }

    let dir = log_dir()?;
    let removed = cleanup_old_logs(&dir, SystemTime::now());
    if removed > 0 {
        eprintln!("Removed {} old log file(s) from {:?}", removed, dir);
    }

    let log_path = dir.join(format!("{}{}.log", SESSION_PREFIX, session_id()));
    let file = fs::OpenOptions::new().create(true).append(true).open(&log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_timer(timer)
        .with_ansi(false)
        .with_filter(tracing_subscriber::EnvFilter::new("debug"));

    // Each layer carries its own filter; no global filter.
    match tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
    {
        Ok(()) => {
            eprintln!("Logging to file: {:?}", log_path);
            Ok(guard)
        }
        Err(e) if already_initialized(&e) => Ok(guard),
        Err(e) => Err(io::Error::other(e)),
    }
}
