#![deny(missing_docs)]
//! Shared logging utilities for the meeting prep workspace.
//!
//! This crate provides the `prep_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. The `prep_request_*`
//! variants prefix the line with `[req N]`.

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! prep_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! prep_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! prep_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! prep_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! prep_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Logs a debug-level message tagged with a request id.
#[macro_export]
macro_rules! prep_request_debug {
    ($request_id:expr, $($arg:tt)*) => {{
        log::debug!("[req {}] {}", $request_id, format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with a request id.
#[macro_export]
macro_rules! prep_request_info {
    ($request_id:expr, $($arg:tt)*) => {{
        log::info!("[req {}] {}", $request_id, format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with a request id.
#[macro_export]
macro_rules! prep_request_warn {
    ($request_id:expr, $($arg:tt)*) => {{
        log::warn!("[req {}] {}", $request_id, format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may have installed the logger already.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )]);
}
