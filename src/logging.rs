//! Logging infrastructure.
//!
//! This module provides structured logging controlled by the
//! `ENTITY_QUERY_DEBUG` environment variable.
//!
//! # Environment Variables
//!
//! - `ENTITY_QUERY_DEBUG=true` - Enable debug logging
//! - `ENTITY_QUERY_LOG_LEVEL=debug|info|warn|error|trace` - Set a specific log level
//! - `ENTITY_QUERY_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use entity_query::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//! ```
//!
//! Internally the crate emits standard `tracing` events; without the
//! `tracing-subscriber` feature, `init` is a no-op and the host application
//! is expected to install its own subscriber.

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via the `ENTITY_QUERY_DEBUG`
/// environment variable.
///
/// Returns `true` if it is set to "true", "1", or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("ENTITY_QUERY_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `ENTITY_QUERY_LOG_LEVEL`.
///
/// Defaults to "debug" if `ENTITY_QUERY_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    if let Ok(level) = env::var("ENTITY_QUERY_LOG_LEVEL") {
        match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => {
                if is_debug_enabled() {
                    "debug"
                } else {
                    "warn"
                }
            }
        }
    } else if is_debug_enabled() {
        "debug"
    } else {
        "warn"
    }
}

/// Get the configured log format from `ENTITY_QUERY_LOG_FORMAT`.
///
/// Defaults to "json" for structured logging.
pub fn get_log_format() -> &'static str {
    env::var("ENTITY_QUERY_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize the logging system.
///
/// This should be called once at application startup; subsequent calls are
/// no-ops. Does nothing unless `ENTITY_QUERY_DEBUG` or
/// `ENTITY_QUERY_LOG_LEVEL` is set.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("ENTITY_QUERY_LOG_LEVEL").is_err() {
            // No logging requested, skip initialization
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{fmt, prelude::*, EnvFilter};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!("entity_query={level}"))
                .unwrap_or_else(|_| EnvFilter::new("warn"));

            match get_log_format() {
                "json" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().json())
                        .init();
                }
                "compact" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().compact())
                        .init();
                }
                _ => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().pretty())
                        .init();
                }
            }

            tracing::info!(
                level = level,
                format = get_log_format(),
                "entity-query logging initialized"
            );
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        {
            // Tracing subscriber not available, logging will be silent
            // unless the user sets up their own subscriber
        }
    });
}

/// Initialize logging with a specific level.
///
/// # Safety
///
/// This function modifies environment variables, which is unsafe in
/// multi-threaded programs. Call this early in your program before
/// spawning threads.
pub fn init_with_level(level: &str) {
    // SAFETY: This should only be called at program startup before threads
    // are spawned. The user is responsible for calling this safely.
    unsafe {
        env::set_var("ENTITY_QUERY_LOG_LEVEL", level);
    }
    init();
}

/// Initialize logging for debugging (convenience function).
///
/// Equivalent to setting `ENTITY_QUERY_DEBUG=true` and calling `init()`.
///
/// # Safety
///
/// This function modifies environment variables, which is unsafe in
/// multi-threaded programs. Call this early in your program before
/// spawning threads.
pub fn init_debug() {
    // SAFETY: This should only be called at program startup before threads
    // are spawned. The user is responsible for calling this safely.
    unsafe {
        env::set_var("ENTITY_QUERY_DEBUG", "true");
    }
    init();
}
