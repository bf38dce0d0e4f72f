//! Process logging bootstrap.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend once per process for either binary.
//! - Route records to rolling files when a directory is configured, otherwise
//!   to stderr.
//!
//! # Invariants
//! - A repeated init with the same level and destination is a no-op.
//! - A repeated init with a different level or destination is an error.
//! - Initialization never panics.
//! - Events carry metadata only; note titles and contents are never logged.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "notes";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 5;
const PANIC_MESSAGE_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

/// Where log records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Stderr,
    /// Rolling files under an absolute directory; warnings are mirrored to
    /// stderr.
    Directory(PathBuf),
}

impl LogDestination {
    /// Parses an optional directory flag. `None` selects stderr.
    pub fn from_flag(log_dir: Option<&str>) -> Result<Self, String> {
        let Some(raw) = log_dir else {
            return Ok(Self::Stderr);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("log directory must not be empty".to_string());
        }
        let path = Path::new(raw);
        if !path.is_absolute() {
            return Err(format!("log directory must be absolute, got `{raw}`"));
        }
        Ok(Self::Directory(path.to_path_buf()))
    }

    fn configure(&self, logger: Logger) -> Result<Logger, String> {
        match self {
            Self::Stderr => Ok(logger
                .log_to_stderr()
                .write_mode(WriteMode::Direct)
                .format_for_stderr(flexi_logger::detailed_format)),
            Self::Directory(dir) => {
                std::fs::create_dir_all(dir)
                    .map_err(|err| format!("cannot create log directory `{}`: {err}", dir.display()))?;
                Ok(logger
                    .log_to_file(FileSpec::default().directory(dir).basename(LOG_BASENAME))
                    .rotate(
                        Criterion::Size(ROTATE_AT_BYTES),
                        Naming::Numbers,
                        Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
                    )
                    .append()
                    .duplicate_to_stderr(Duplicate::Warn)
                    .write_mode(WriteMode::BufferAndFlush)
                    .format_for_files(flexi_logger::detailed_format))
            }
        }
    }
}

impl Display for LogDestination {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stderr => f.write_str("stderr"),
            Self::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

struct ActiveLogger {
    level: &'static str,
    destination: LogDestination,
    _handle: LoggerHandle,
}

impl ActiveLogger {
    fn ensure_matches(&self, level: &'static str, destination: &LogDestination) -> Result<(), String> {
        if &self.destination != destination {
            return Err(format!(
                "logger already writes to `{}`; cannot switch to `{destination}`",
                self.destination
            ));
        }
        if self.level != level {
            return Err(format!(
                "logger already runs at `{}`; cannot switch to `{level}`",
                self.level
            ));
        }
        Ok(())
    }
}

/// Starts logging at `level`, writing under `log_dir` when given and to
/// stderr otherwise.
///
/// # Errors
/// - Unknown level name.
/// - Empty or relative `log_dir`, or a directory that cannot be created.
/// - Logging already active with another level or destination.
/// - Backend start failure.
pub fn init_logging(level: &str, log_dir: Option<&str>) -> Result<(), String> {
    let level = normalize_level(level)?;
    let destination = LogDestination::from_flag(log_dir)?;

    let active = ACTIVE.get_or_try_init(|| start_logger(level, &destination))?;
    active.ensure_matches(level, &destination)
}

fn start_logger(level: &'static str, destination: &LogDestination) -> Result<ActiveLogger, String> {
    let logger = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?;
    let handle = destination
        .configure(logger)?
        .start()
        .map_err(|err| format!("logger failed to start: {err}"))?;

    install_panic_hook();
    info!(
        "event=app_start module=logging status=ok os={} version={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    );
    info!("event=logging_init module=logging status=ok level={level} destination={destination}");

    Ok(ActiveLogger {
        level,
        destination: destination.clone(),
        _handle: handle,
    })
}

/// Level and destination of the running logger, `None` before init.
pub fn logging_status() -> Option<(&'static str, LogDestination)> {
    ACTIVE
        .get()
        .map(|active| (active.level, active.destination.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Maps a user-supplied level name onto the canonical one.
pub fn normalize_level(level: &str) -> Result<&'static str, String> {
    const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

    let wanted = level.trim().to_ascii_lowercase();
    let wanted = if wanted == "warning" { "warn".to_string() } else { wanted };
    LEVELS
        .iter()
        .copied()
        .find(|known| *known == wanted)
        .ok_or_else(|| format!("unknown log level `{wanted}`; expected one of {}", LEVELS.join("|")))
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string payload".to_string());
        error!(
            "event=panic module=logging status=error location={location} payload={}",
            one_line(&payload, PANIC_MESSAGE_LIMIT)
        );
        previous(info);
    }));
}

// Panic payloads can echo request data; flatten and cap them.
fn one_line(text: &str, limit: usize) -> String {
    let flat = text.replace(['\n', '\r'], " ");
    if flat.chars().count() <= limit {
        return flat;
    }
    let mut cut: String = flat.chars().take(limit).collect();
    cut.push_str("...");
    cut
}
