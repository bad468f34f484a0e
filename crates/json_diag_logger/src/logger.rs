//! The diagnostic logger facade and its JSON implementation.

use std::sync::Arc;

use crate::{
    clock::{Clock, SystemClock},
    entry::LogEntry,
    level::LogLevel,
    options::LoggerOptions,
    policy::{decide, Decision, FirstIncomingRequest},
    sink::{LineSink, WriterSink},
    value::LogValue,
};

const FIRST_INCOMING_REQUEST_MESSAGE: &str = "First incoming request";

/// A diagnostic logger with five severity methods.
///
/// `message` may be [`LogValue::Undefined`] and `arguments` may be empty. None of the methods can
/// fail.
pub trait DiagLogger {
    /// Logs a debug message.
    fn debug(&self, message: &LogValue, arguments: &[LogValue]);

    /// Logs a verbose message.
    fn verbose(&self, message: &LogValue, arguments: &[LogValue]);

    /// Logs an informational message.
    fn info(&self, message: &LogValue, arguments: &[LogValue]);

    /// Logs a warning.
    fn warn(&self, message: &LogValue, arguments: &[LogValue]);

    /// Logs an error.
    fn error(&self, message: &LogValue, arguments: &[LogValue]);
}

impl<T: DiagLogger + ?Sized> DiagLogger for Arc<T> {
    fn debug(&self, message: &LogValue, arguments: &[LogValue]) {
        (**self).debug(message, arguments);
    }

    fn verbose(&self, message: &LogValue, arguments: &[LogValue]) {
        (**self).verbose(message, arguments);
    }

    fn info(&self, message: &LogValue, arguments: &[LogValue]) {
        (**self).info(message, arguments);
    }

    fn warn(&self, message: &LogValue, arguments: &[LogValue]) {
        (**self).warn(message, arguments);
    }

    fn error(&self, message: &LogValue, arguments: &[LogValue]) {
        (**self).error(message, arguments);
    }
}

/// Returns `true` if a record at `level` is emitted under the configured `minimum`.
///
/// Records at `OFF` are never emitted.
#[must_use]
pub fn should_emit(level: LogLevel, minimum: Option<LogLevel>) -> bool {
    level != LogLevel::Off && level.is_at_least(minimum)
}

/// A [`DiagLogger`] writing each emitted call as a single-line JSON record to a [`LineSink`].
///
/// ```
/// use json_diag_logger::{DiagLogger, JsonDiagLogger, LogLevel, LoggerOptions};
///
/// let logger = JsonDiagLogger::new(
///     LoggerOptions::new("otel", "checkout").with_min_log_level(LogLevel::Info),
/// );
///
/// // Printed to standard output.
/// logger.info(&"exporter started".into(), &[]);
/// // Below the minimum level, dropped.
/// logger.debug(&"span ended".into(), &[]);
/// ```
#[derive(Debug)]
pub struct JsonDiagLogger<S = WriterSink<fn() -> std::io::Stdout>, C = SystemClock> {
    options: LoggerOptions,
    first_incoming_request: FirstIncomingRequest,
    sink: S,
    clock: C,
}

impl JsonDiagLogger {
    /// Creates a logger writing to standard output.
    pub fn new(options: LoggerOptions) -> Self {
        Self::with_sink_and_clock(options, WriterSink::stdout(), SystemClock)
    }
}

impl<S: LineSink> JsonDiagLogger<S> {
    /// Creates a logger writing to the given sink.
    pub fn with_sink(options: LoggerOptions, sink: S) -> Self {
        Self::with_sink_and_clock(options, sink, SystemClock)
    }
}

impl<S, C> JsonDiagLogger<S, C>
where
    S: LineSink,
    C: Clock,
{
    /// Creates a logger writing to the given sink, with timestamps taken from the given clock.
    pub fn with_sink_and_clock(options: LoggerOptions, sink: S, clock: C) -> Self {
        Self {
            options,
            first_incoming_request: FirstIncomingRequest::default(),
            sink,
            clock,
        }
    }

    /// The current options.
    pub fn options(&self) -> &LoggerOptions {
        &self.options
    }

    /// Replaces the options as a whole.
    ///
    /// Whether the first incoming request was already logged is kept.
    pub fn set_options(&mut self, options: LoggerOptions) {
        tracing::debug!(
            logger = %options.logger_name,
            service = %options.service_name,
            "replacing diagnostic logger options"
        );
        self.options = options;
    }

    /// The sink records are written to.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Whether the first incoming request has been logged by this instance.
    pub fn first_incoming_request_logged(&self) -> bool {
        self.first_incoming_request.is_logged()
    }

    /// Builds the record a call at the effective `level` would produce, without filtering or
    /// writing it.
    pub fn create_log_entry(
        &self,
        level: LogLevel,
        message: &LogValue,
        arguments: &[LogValue],
    ) -> LogEntry {
        LogEntry::build(level, message, arguments, &self.options, &self.clock)
    }

    fn log(&self, requested: LogLevel, message: &LogValue, arguments: &[LogValue]) {
        match decide(
            requested,
            message,
            arguments,
            &self.options,
            &self.first_incoming_request,
        ) {
            Decision::Emit(level) => self.emit(level, message, arguments),
            Decision::FirstIncomingRequest => self.emit(
                LogLevel::Info,
                &LogValue::from(FIRST_INCOMING_REQUEST_MESSAGE),
                &[],
            ),
            Decision::Suppress => (),
        }
    }

    fn emit(&self, level: LogLevel, message: &LogValue, arguments: &[LogValue]) {
        if !should_emit(level, self.options.min_log_level) {
            return;
        }

        let entry = self.create_log_entry(level, message, arguments);
        if let Ok(line) = entry.to_json_line() {
            self.sink.write_line(&line);
        }
    }
}

impl<S, C> DiagLogger for JsonDiagLogger<S, C>
where
    S: LineSink,
    C: Clock,
{
    fn debug(&self, message: &LogValue, arguments: &[LogValue]) {
        self.log(LogLevel::Debug, message, arguments);
    }

    fn verbose(&self, message: &LogValue, arguments: &[LogValue]) {
        self.log(LogLevel::Verbose, message, arguments);
    }

    fn info(&self, message: &LogValue, arguments: &[LogValue]) {
        self.log(LogLevel::Info, message, arguments);
    }

    fn warn(&self, message: &LogValue, arguments: &[LogValue]) {
        self.log(LogLevel::Warn, message, arguments);
    }

    fn error(&self, message: &LogValue, arguments: &[LogValue]) {
        self.log(LogLevel::Error, message, arguments);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use time::macros::utc_datetime;

    use super::*;
    use crate::clock::FixedClock;

    #[derive(Debug, Default)]
    struct RecordingSink {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn messages(&self) -> Vec<(String, String)> {
            self.lines
                .lock()
                .unwrap()
                .iter()
                .map(|line| {
                    let value: serde_json::Value = serde_json::from_str(line).unwrap();
                    (
                        value["level"].as_str().unwrap().to_string(),
                        value["message"].as_str().unwrap().to_string(),
                    )
                })
                .collect()
        }
    }

    impl LineSink for RecordingSink {
        fn write_line(&self, line: &str) {
            self.lines.lock().unwrap().push(line.to_string());
        }
    }

    fn logger(options: LoggerOptions) -> JsonDiagLogger<RecordingSink, FixedClock> {
        JsonDiagLogger::with_sink_and_clock(
            options,
            RecordingSink::default(),
            FixedClock(utc_datetime!(2024-05-01 12:30:45.123)),
        )
    }

    fn options() -> LoggerOptions {
        LoggerOptions::new("test-logger", "test-service")
    }

    #[test]
    fn gate_never_emits_off() {
        for minimum in [None, Some(LogLevel::Off), Some(LogLevel::Verbose)] {
            assert!(!should_emit(LogLevel::Off, minimum));
        }
        assert!(should_emit(LogLevel::Verbose, Some(LogLevel::Off)));
        assert!(should_emit(LogLevel::Warn, Some(LogLevel::Warn)));
        assert!(!should_emit(LogLevel::Info, Some(LogLevel::Warn)));
    }

    #[test]
    fn every_method_emits_with_default_options() {
        let logger = logger(options());
        let arguments = [1.into(), LogValue::object([("name", "myname")])];

        logger.debug(&"test".into(), &arguments);
        logger.verbose(&"test".into(), &arguments);
        logger.info(&"test".into(), &arguments);
        logger.error(&"test".into(), &arguments);
        logger.warn(&"test".into(), &arguments);

        let message = "test. Log arguments are: [ 1, { name: 'myname' } ]".to_string();
        assert_eq!(
            logger.sink().messages(),
            ["DEBUG", "VERBOSE", "INFO", "ERROR", "WARN"]
                .into_iter()
                .map(|level| (level.to_string(), message.clone()))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn minimum_level_filters_records() {
        let logger = logger(options().with_min_log_level(LogLevel::Warn));
        logger.debug(&"a".into(), &[]);
        logger.verbose(&"b".into(), &[]);
        logger.info(&"c".into(), &[]);
        logger.warn(&"d".into(), &[]);
        logger.error(&"e".into(), &[]);

        let levels: Vec<String> = logger
            .sink()
            .messages()
            .into_iter()
            .map(|(level, _)| level)
            .collect();
        assert_eq!(levels, ["WARN", "ERROR"]);
    }

    #[test]
    fn first_incoming_request_is_gated_like_any_record() {
        let logger = logger(
            options()
                .with_log_first_incoming_request(true)
                .with_min_log_level(LogLevel::Error),
        );
        logger.debug(&"".into(), &["incomingRequest".into()]);

        assert!(logger.sink().messages().is_empty());
        assert!(logger.first_incoming_request_logged());
    }

    #[test]
    fn replacing_options_keeps_first_incoming_request_state() {
        let mut logger = logger(options().with_log_first_incoming_request(true));
        logger.debug(&"".into(), &["incomingRequest".into()]);

        logger.set_options(
            LoggerOptions::new("other-logger", "other-service")
                .with_log_first_incoming_request(true),
        );
        logger.debug(&"".into(), &["incomingRequest".into()]);

        assert!(logger.first_incoming_request_logged());
        assert_eq!(logger.options().logger_name, "other-logger");
        assert_eq!(
            logger.sink().messages(),
            [(
                "INFO".to_string(),
                "First incoming request. Log arguments are: []".to_string()
            )]
        );
    }

    #[test]
    fn create_log_entry_does_not_write() {
        let logger = logger(options().with_min_log_level(LogLevel::Error));
        let entry = logger.create_log_entry(LogLevel::Debug, &"x".into(), &[]);

        assert_eq!(entry.level, LogLevel::Debug);
        assert_eq!(entry.timestamp, "2024-05-01T12:30:45.123Z");
        assert!(logger.sink().messages().is_empty());
    }

    #[test]
    fn arc_forwards_calls() {
        let logger = Arc::new(logger(options()));
        let facade: &dyn DiagLogger = &logger;
        facade.warn(&"shared".into(), &[]);
        assert_eq!(logger.sink().messages().len(), 1);
    }
}
