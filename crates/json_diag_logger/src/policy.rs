//! Computes the effective level of a logging call from the called method, the message shape and
//! the configured overrides.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    classifier::{
        is_async_attribute_error, is_incoming_request_marker, is_registered_global_message,
        is_service_request_error, is_timeout,
    },
    level::LogLevel,
    options::LoggerOptions,
    value::LogValue,
};

/// Outcome of the override policy for one call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Log the call at the given effective level (still subject to the minimum level).
    Emit(LogLevel),

    /// Replace the call by a single `"First incoming request"` record at `INFO`.
    FirstIncomingRequest,

    /// Drop the call without producing any record.
    Suppress,
}

/// Latch remembering whether the first incoming request has been logged.
///
/// It flips at most once per logger instance and is never reset.
#[derive(Debug, Default)]
pub struct FirstIncomingRequest {
    logged: AtomicBool,
}

impl FirstIncomingRequest {
    /// Whether the first incoming request has already been logged.
    #[must_use]
    pub fn is_logged(&self) -> bool {
        self.logged.load(Ordering::Acquire)
    }

    /// Flips the latch. Only the first caller gets `true`.
    fn claim(&self) -> bool {
        self.logged
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Decides what a call to the `requested` severity method turns into.
///
/// `debug` and `error` calls consult the classifiers in a fixed precedence order, `verbose`
/// calls honour [`LoggerOptions::log_level_for_verbose`], and every other level passes through
/// unchanged.
pub fn decide(
    requested: LogLevel,
    message: &LogValue,
    arguments: &[LogValue],
    options: &LoggerOptions,
    first_incoming_request: &FirstIncomingRequest,
) -> Decision {
    match requested {
        LogLevel::Debug => decide_debug(message, arguments, options, first_incoming_request),
        LogLevel::Verbose => {
            Decision::Emit(options.log_level_for_verbose.unwrap_or(LogLevel::Verbose))
        }
        LogLevel::Error => Decision::Emit(error_level(message, options)),
        level => Decision::Emit(level),
    }
}

fn decide_debug(
    message: &LogValue,
    arguments: &[LogValue],
    options: &LoggerOptions,
    first_incoming_request: &FirstIncomingRequest,
) -> Decision {
    if let Some(level) = options.log_level_for_register_global_messages {
        if is_registered_global_message(message) {
            return Decision::Emit(level);
        }
    }

    if !options.log_first_incoming_request {
        return Decision::Emit(LogLevel::Debug);
    }

    let is_marker = is_incoming_request_marker(arguments);
    if is_marker && !first_incoming_request.is_logged() && first_incoming_request.claim() {
        tracing::trace!("first incoming request observed");
        return Decision::FirstIncomingRequest;
    }

    let debug_enabled = options
        .min_log_level
        .is_some_and(|minimum| LogLevel::Debug.is_at_least(Some(minimum)));
    if debug_enabled && !is_marker {
        Decision::Emit(LogLevel::Debug)
    } else {
        Decision::Suppress
    }
}

fn error_level(message: &LogValue, options: &LoggerOptions) -> LogLevel {
    let overrides: [(Option<LogLevel>, fn(&LogValue) -> bool); 3] = [
        (
            options.log_level_for_service_request_error_messages,
            is_service_request_error,
        ),
        (options.log_level_for_timeout_error_messages, is_timeout),
        (options.log_level_for_async_attribute_error, is_async_attribute_error),
    ];

    overrides
        .into_iter()
        .find_map(|(level, matches)| level.filter(|_| matches(message)))
        .unwrap_or(LogLevel::Error)
}
