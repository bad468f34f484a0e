//! `json_diag_logger` turns free-form diagnostic calls into single-line JSON log records.
//!
//! It offers:
//! - A [`DiagLogger`] trait with the five severity methods (`debug`, `verbose`, `info`, `warn`,
//!   `error`) and its JSON implementation, [`JsonDiagLogger`].
//! - A policy layer that remaps the effective [`LogLevel`] of well-known message shapes (timeouts,
//!   failed service requests, async attribute races, global registrations and the first incoming
//!   request), configured through [`LoggerOptions`].
//! - A depth-bounded, cycle-safe value renderer ([`LogValue`], [`render`]) and a bounded-length
//!   [`truncate`] used to build the record message.
//! - A [`DiagLoggerLayer`] that forwards [`tracing`] events to any [`DiagLogger`].
//!
//! Each emitted record is one JSON object per line with the keys `level`, `logger`, `message`,
//! `serviceName` and `timestamp`, in that order.

mod classifier;
mod clock;
mod entry;
mod level;
mod logger;
mod options;
mod policy;
mod sink;
mod truncate;
mod value;

#[cfg(feature = "bridge")]
mod bridge;

#[cfg(feature = "bridge")]
pub use self::bridge::DiagLoggerLayer;
pub use self::{
    classifier::{
        is_async_attribute_error, is_incoming_request_marker, is_registered_global_message,
        is_service_request_error, is_timeout,
    },
    clock::{Clock, FixedClock, SystemClock},
    entry::{format_message, render_arguments, LogEntry},
    level::LogLevel,
    logger::{should_emit, DiagLogger, JsonDiagLogger},
    options::LoggerOptions,
    policy::{decide, Decision, FirstIncomingRequest},
    sink::{LineSink, WriterSink},
    truncate::{truncate, DEFAULT_TRUNCATED_TEXT},
    value::{render, LogValue, DEFAULT_RENDER_DEPTH},
};

mod keys {
    pub(crate) const LEVEL: &str = "level";
    pub(crate) const LOGGER: &str = "logger";
    pub(crate) const MESSAGE: &str = "message";
    pub(crate) const SERVICE_NAME: &str = "serviceName";
    pub(crate) const TIMESTAMP: &str = "timestamp";
}

/// Errors that can occur while configuring the logger.
///
/// Logging itself never fails: the severity methods have no error path.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Represents an error in configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A log level name could not be recognized.
    #[error("Invalid log level `{0}`, expected one of OFF, VERBOSE, DEBUG, INFO, WARN, ERROR")]
    InvalidLevel(String),

    /// Represents an error during JSON deserialization of the configuration.
    #[error("JSON deserialization error: {0}")]
    JsonDeserialization(#[from] serde_json::Error),
}
