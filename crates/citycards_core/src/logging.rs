//! Logging bootstrap.
//!
//! # Responsibility
//! - Initialize rolling file logs (duplicated to stderr) once per process.
//!
//! # Invariants
//! - Initialization is idempotent; the first successful call wins and
//!   later calls are no-ops.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::path::Path;

const LOG_FILE_BASENAME: &str = "citycards";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

/// Initializes process logging with the given level and directory.
///
/// Log lines go to a size-rotated file under `log_dir` and are mirrored to
/// stderr at warn level and above. Returns a human-readable error string
/// when the backend cannot start; an already-initialized logger is not an
/// error.
pub fn init_logging(level: &str, log_dir: impl AsRef<Path>) -> Result<(), String> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    let log_dir = log_dir.as_ref();
    std::fs::create_dir_all(log_dir)
        .map_err(|err| format!("failed to create log directory `{}`: {err}", log_dir.display()))?;

    let handle = Logger::try_with_str(level.trim())
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    // A racing second init drops its handle; the stored one keeps flushing.
    let _ = LOGGER.set(handle);

    info!(
        "event=app_start module=core status=ok version={} build_mode={}",
        env!("CARGO_PKG_VERSION"),
        if cfg!(debug_assertions) { "debug" } else { "release" }
    );

    Ok(())
}

/// Returns the default log level for the current build mode.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}
