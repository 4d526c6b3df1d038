//! Logging setup.
//!
//! The crate logs through `tracing`; nothing is printed unless the host
//! application installs a subscriber or calls [`init`].
//!
//! # Environment Variables
//!
//! - `DBCONF_DEBUG=true|1|yes` - Enable debug logging
//! - `DBCONF_LOG_LEVEL=trace|debug|info|warn|error` - Set the level explicitly
//! - `DBCONF_LOG_FORMAT=json|pretty|compact` - Output format (default: json)
//!
//! ```rust,no_run
//! use dbconf_url::logging;
//!
//! logging::init();
//! let _ = dbconf_url::normalize("postgres://localhost/app");
//! ```
//!
//! URLs are never logged whole: they usually carry credentials.

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

const DEBUG_VAR: &str = "DBCONF_DEBUG";
const LEVEL_VAR: &str = "DBCONF_LOG_LEVEL";
const FORMAT_VAR: &str = "DBCONF_LOG_FORMAT";

/// Check if `DBCONF_DEBUG` is set to "true", "1" or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var(DEBUG_VAR)
        .map(|v| is_truthy(&v))
        .unwrap_or(false)
}

/// Get the log level from `DBCONF_LOG_LEVEL`.
///
/// Falls back to "debug" when debug logging is enabled and "warn" otherwise.
pub fn get_log_level() -> &'static str {
    resolve_level(env::var(LEVEL_VAR).ok().as_deref(), is_debug_enabled())
}

/// Get the output format from `DBCONF_LOG_FORMAT`, "json" by default.
pub fn get_log_format() -> &'static str {
    resolve_format(env::var(FORMAT_VAR).ok().as_deref())
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn resolve_level(level: Option<&str>, debug: bool) -> &'static str {
    let fallback = if debug { "debug" } else { "warn" };
    match level.map(str::to_lowercase).as_deref() {
        Some("trace") => "trace",
        Some("debug") => "debug",
        Some("info") => "info",
        Some("warn") => "warn",
        Some("error") => "error",
        _ => fallback,
    }
}

fn resolve_format(format: Option<&str>) -> &'static str {
    match format.map(str::to_lowercase).as_deref() {
        Some("pretty") => "pretty",
        Some("compact") => "compact",
        _ => "json",
    }
}

/// Install a global subscriber for this crate's events.
///
/// Subsequent calls are no-ops, and nothing happens unless `DBCONF_DEBUG`
/// or `DBCONF_LOG_LEVEL` is set. Needs the `tracing-subscriber` feature;
/// without it, events only reach a subscriber the application installs.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var(LEVEL_VAR).is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!("dbconf={},dbconf_url={}", level, level))
                .unwrap_or_else(|_| EnvFilter::new("warn"));

            // try_init: the application may already own the global subscriber.
            let installed = match get_log_format() {
                "json" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json())
                    .try_init(),
                "compact" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().compact())
                    .try_init(),
                _ => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().pretty())
                    .try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level = level,
                    format = get_log_format(),
                    "dbconf logging initialized"
                );
            }
        }
    });
}

/// Initialize logging at a specific level.
///
/// # Safety
///
/// This sets `DBCONF_LOG_LEVEL`, which is unsafe once other threads run.
/// Call it at program start.
pub fn init_with_level(level: &str) {
    // SAFETY: documented as startup-only, before threads are spawned.
    unsafe {
        env::set_var(LEVEL_VAR, level);
    }
    init();
}

/// Initialize debug logging; same as `DBCONF_DEBUG=true` plus [`init`].
///
/// # Safety
///
/// Sets an environment variable; call at program start.
pub fn init_debug() {
    // SAFETY: documented as startup-only, before threads are spawned.
    unsafe {
        env::set_var(DEBUG_VAR, "true");
    }
    init();
}
