//! Configuration of a [`JsonDiagLogger`](crate::JsonDiagLogger).

use serde::Deserialize;

use crate::{level::LogLevel, truncate::DEFAULT_TRUNCATED_TEXT, LoggerError};

/// Options controlling which calls are logged, at which level, and how messages are shortened.
///
/// Options are replaced as a whole through
/// [`JsonDiagLogger::set_options`](crate::JsonDiagLogger::set_options); there is no partial
/// update. They can be deserialized from JSON using the camelCase field names:
///
/// ```
/// use json_diag_logger::{LogLevel, LoggerOptions};
///
/// let options = LoggerOptions::from_json(
///     r#"{
///         "loggerName": "otel",
///         "serviceName": "checkout",
///         "minLogLevel": "info",
///         "logLevelForTimeoutErrorMessages": "WARN",
///         "truncateLimit": 2000
///     }"#,
/// )?;
///
/// assert_eq!(options.min_log_level, Some(LogLevel::Info));
/// assert_eq!(options.log_level_for_timeout_error_messages, Some(LogLevel::Warn));
/// assert_eq!(options.truncated_text(), "_TRUNCATED_");
/// # Ok::<(), json_diag_logger::LoggerError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggerOptions {
    /// Written to the `logger` field of every record.
    pub logger_name: String,

    /// Written to the `serviceName` field of every record.
    pub service_name: String,

    /// Minimum level of emitted records. If `None`, no minimum is applied.
    pub min_log_level: Option<LogLevel>,

    /// Level used for `verbose` calls instead of `VERBOSE`.
    pub log_level_for_verbose: Option<LogLevel>,

    /// Level used for `error` calls whose message is exactly `"Service request"`.
    pub log_level_for_service_request_error_messages: Option<LogLevel>,

    /// Level used for `error` calls reporting a `4 DEADLINE_EXCEEDED` or `14 UNAVAILABLE` status.
    pub log_level_for_timeout_error_messages: Option<LogLevel>,

    /// Level used for `error` calls about resource attributes read before async attributes
    /// settled.
    pub log_level_for_async_attribute_error: Option<LogLevel>,

    /// Level used for `debug` calls announcing that a global was registered.
    pub log_level_for_register_global_messages: Option<LogLevel>,

    /// If `true`, the first incoming request is logged once at `INFO`, and other `debug` calls
    /// are only logged when [`min_log_level`](Self::min_log_level) is set to `DEBUG` or lower.
    pub log_first_incoming_request: bool,

    /// Maximum length of the record message. `None`, zero or a negative value disables
    /// truncation.
    pub truncate_limit: Option<i64>,

    /// Marker ending a truncated message. Defaults to [`DEFAULT_TRUNCATED_TEXT`].
    pub truncated_text: Option<String>,
}

impl LoggerOptions {
    /// Creates options with the given names and every optional behaviour disabled.
    pub fn new(logger_name: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            logger_name: logger_name.into(),
            service_name: service_name.into(),
            ..Self::default()
        }
    }

    /// Parses options from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::JsonDeserialization`] if the document is malformed or contains an
    /// unknown level name, and [`LoggerError::Configuration`] if `loggerName` or `serviceName` is
    /// missing or empty.
    pub fn from_json(json: &str) -> Result<Self, LoggerError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Checks that the record names are set.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::Configuration`] if `logger_name` or `service_name` is empty.
    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.logger_name.trim().is_empty() {
            return Err(LoggerError::Configuration(
                "`loggerName` must not be empty".to_string(),
            ));
        }
        if self.service_name.trim().is_empty() {
            return Err(LoggerError::Configuration(
                "`serviceName` must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The marker ending truncated messages.
    #[must_use]
    pub fn truncated_text(&self) -> &str {
        self.truncated_text
            .as_deref()
            .unwrap_or(DEFAULT_TRUNCATED_TEXT)
    }

    /// Sets [`min_log_level`](Self::min_log_level).
    #[must_use]
    pub fn with_min_log_level(mut self, level: LogLevel) -> Self {
        self.min_log_level = Some(level);
        self
    }

    /// Sets [`log_level_for_verbose`](Self::log_level_for_verbose).
    #[must_use]
    pub fn with_log_level_for_verbose(mut self, level: LogLevel) -> Self {
        self.log_level_for_verbose = Some(level);
        self
    }

    /// Sets
    /// [`log_level_for_service_request_error_messages`](Self::log_level_for_service_request_error_messages).
    #[must_use]
    pub fn with_log_level_for_service_request_error_messages(mut self, level: LogLevel) -> Self {
        self.log_level_for_service_request_error_messages = Some(level);
        self
    }

    /// Sets [`log_level_for_timeout_error_messages`](Self::log_level_for_timeout_error_messages).
    #[must_use]
    pub fn with_log_level_for_timeout_error_messages(mut self, level: LogLevel) -> Self {
        self.log_level_for_timeout_error_messages = Some(level);
        self
    }

    /// Sets [`log_level_for_async_attribute_error`](Self::log_level_for_async_attribute_error).
    #[must_use]
    pub fn with_log_level_for_async_attribute_error(mut self, level: LogLevel) -> Self {
        self.log_level_for_async_attribute_error = Some(level);
        self
    }

    /// Sets
    /// [`log_level_for_register_global_messages`](Self::log_level_for_register_global_messages).
    #[must_use]
    pub fn with_log_level_for_register_global_messages(mut self, level: LogLevel) -> Self {
        self.log_level_for_register_global_messages = Some(level);
        self
    }

    /// Sets [`log_first_incoming_request`](Self::log_first_incoming_request).
    #[must_use]
    pub fn with_log_first_incoming_request(mut self, enabled: bool) -> Self {
        self.log_first_incoming_request = enabled;
        self
    }

    /// Sets [`truncate_limit`](Self::truncate_limit).
    #[must_use]
    pub fn with_truncate_limit(mut self, limit: i64) -> Self {
        self.truncate_limit = Some(limit);
        self
    }

    /// Sets [`truncated_text`](Self::truncated_text).
    #[must_use]
    pub fn with_truncated_text(mut self, text: impl Into<String>) -> Self {
        self.truncated_text = Some(text.into());
        self
    }
}
