//! Logging setup for Rampart with file output and optional stdout.
//!
//! Logs always go to a file; stdout logging is enabled when `RAMPART_LOG`
//! or `RUST_LOG` is set, or in debug builds.
//!
//! ## Environment Variables
//!
//! 1. **`RAMPART_LOG`** (highest priority) - project-specific logging control
//! 2. **`RUST_LOG`** - standard tracing environment variable
//! 3. **Default** - `warn` globally, `info` for rampart crates
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/rampart/logs/rampart-<pid>.log`
//! - Linux: `~/.local/share/rampart/logs/rampart-12345.log`
//! - macOS: `~/Library/Application Support/rampart/logs/rampart-12345.log`
//!
//! Override with [`LogConfig::log_file_path`].

use std::{env, path::PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Crates covered by the shorthand `RAMPART_LOG=<level>` syntax.
const CRATE_TARGETS: &[&str] = &["rampart", "rampart_log"];

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

#[derive(Default)]
pub struct LogConfig {
    /// Either a full file path or a directory to place the default
    /// `rampart-<pid>.log` in. `None` uses the platform data dir.
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// Env var priority is [`RAMPART_LOG`] > [`RUST_LOG`] > defaults, as
/// described in the module docs. The returned [`LogGuard`] must be held for
/// the lifetime of the program -- dropping it flushes and stops the
/// background file writer.
///
/// Safe to call when a subscriber is already installed (returns an error
/// instead of panicking).
pub fn init(config: LogConfig) -> Result<LogGuard, Box<dyn std::error::Error + Send + Sync>> {
    let (log_dir, filename) = resolve_log_path(config.log_file_path);

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(file_filter());

    let stdout_enabled =
        env::var("RAMPART_LOG").is_ok() || env::var("RUST_LOG").is_ok() || cfg!(debug_assertions);

    let stdout_layer = if stdout_enabled {
        Some(fmt::layer().with_filter(env_filter()))
    } else {
        None
    };

    Registry::default()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Initialize logging for tests.
///
/// Stdout-only (no file output). Will not crash if called multiple times or
/// if logging is already initialized by another test.
pub fn test() {
    let _ = fmt().with_env_filter(env_filter()).try_init();
}

fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("rampart-{}.log", std::process::id());

    if let Some(path) = override_path {
        // A path with an extension names the file itself; otherwise it
        // names the directory to drop the default filename into.
        if path.extension().is_some() {
            let dir = path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir, name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rampart")
        .join("logs");

    (dir, filename)
}

/// File filter: env-controlled if set, otherwise `warn`.
fn file_filter() -> EnvFilter {
    if env::var("RAMPART_LOG").is_ok() || env::var("RUST_LOG").is_ok() {
        return env_filter();
    }
    EnvFilter::new("warn")
}

/// Build the [`EnvFilter`] from `RAMPART_LOG` > `RUST_LOG` > defaults.
fn env_filter() -> EnvFilter {
    if let Ok(spec) = env::var("RAMPART_LOG") {
        return expand_shorthand(&spec);
    }

    if let Ok(spec) = env::var("RUST_LOG") {
        return EnvFilter::new(spec);
    }

    EnvFilter::new(default_directives("info"))
}

/// Expand `RAMPART_LOG` values into full tracing filter strings.
///
/// `RAMPART_LOG=debug` becomes `warn,rampart=debug,rampart_log=debug`;
/// anything containing directive syntax (`=`, `,` or `:`) is used as-is.
fn expand_shorthand(spec: &str) -> EnvFilter {
    if spec.contains('=') || spec.contains(':') || spec.contains(',') {
        return EnvFilter::new(spec);
    }
    EnvFilter::new(default_directives(spec))
}

fn default_directives(level: &str) -> String {
    let mut directives = String::from("warn");
    for target in CRATE_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}
