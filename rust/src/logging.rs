//! Verbosity-gated logging for the scheduling and layout passes.
//!
//! Nothing is formatted unless the configured verbosity reaches the level of
//! the macro, so logging calls can stay in hot loops.
//! - 0: SILENT
//! - 1: SUMMARY (excluded jobs, degraded workflow cycles)
//! - 2: STEPS (per-job start/end, sub-workflow resolution, memo hits)
//! - 3: TRACE (queue seeding, in-degree updates, row scans)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_SUMMARY: u8 = 1;
pub const VERBOSITY_STEPS: u8 = 2;
pub const VERBOSITY_TRACE: u8 = 3;

/// Write a line to stderr when `$verbosity` is at least `$level`.
#[macro_export]
macro_rules! log_at {
    ($level:expr, $verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $level {
            eprintln!("[pipeviz] {}", format_args!($($arg)*));
        }
    };
}

/// Log at SUMMARY level (verbosity >= 1).
#[macro_export]
macro_rules! log_summary {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_SUMMARY, $verbosity, $($arg)*)
    };
}

/// Log at STEPS level (verbosity >= 2).
#[macro_export]
macro_rules! log_steps {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_STEPS, $verbosity, $($arg)*)
    };
}

/// Log at TRACE level (verbosity >= 3).
#[macro_export]
macro_rules! log_trace {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_TRACE, $verbosity, $($arg)*)
    };
}
