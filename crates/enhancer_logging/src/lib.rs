#![deny(missing_docs)]
//! Shared logging utilities for the page enhancer workspace.
//!
//! This crate provides the `enhancer_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger.
//!
//! While a driver step is recorded with [`set_step`], every record logged from that
//! thread is prefixed with `[step N] `, so core and driver lines of one step group together.

use std::cell::Cell;
use std::fmt;

thread_local! {
    /// Index of the driver step currently being played on this thread.
    static STEP: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Records the index of the step the driver is about to play.
pub fn set_step(step: u64) {
    STEP.with(|v| v.set(Some(step)));
}

/// Stops prefixing records on this thread.
pub fn clear_step() {
    STEP.with(|v| v.set(None));
}

/// Returns the step recorded with [`set_step`], if any.
pub fn current_step() -> Option<u64> {
    STEP.with(|v| v.get())
}

/// `[step N] ` while a step is recorded, nothing otherwise.
#[doc(hidden)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPrefix(Option<u64>);

impl fmt::Display for StepPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(step) => write!(f, "[step {step}] "),
            None => Ok(()),
        }
    }
}

/// Prefix for the record being logged; used by the `enhancer_*` macros.
#[doc(hidden)]
pub fn step_prefix() -> StepPrefix {
    StepPrefix(current_step())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! enhancer_trace {
    ($($arg:tt)*) => {{
        log::trace!("{}{}", $crate::step_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! enhancer_debug {
    ($($arg:tt)*) => {{
        log::debug!("{}{}", $crate::step_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! enhancer_info {
    ($($arg:tt)*) => {{
        log::info!("{}{}", $crate::step_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! enhancer_warn {
    ($($arg:tt)*) => {{
        log::warn!("{}{}", $crate::step_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! enhancer_error {
    ($($arg:tt)*) => {{
        log::error!("{}{}", $crate::step_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
