//! Builds the structured record emitted for a logging call.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{
    clock::Clock,
    keys,
    level::LogLevel,
    options::LoggerOptions,
    truncate::truncate,
    value::{render, LogValue, DEFAULT_RENDER_DEPTH},
};

const ARGUMENTS_SEPARATOR: &str = ". Log arguments are: ";

/// One emitted log record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// The effective level.
    pub level: LogLevel,

    /// The configured logger name.
    pub logger: String,

    /// The rendered and possibly truncated message, including the call arguments.
    pub message: String,

    /// The configured service name.
    pub service_name: String,

    /// ISO-8601 timestamp with millisecond precision.
    pub timestamp: String,
}

impl LogEntry {
    /// Builds the record for a call at the effective `level`.
    ///
    /// The message is formatted with [`format_message`], followed by
    /// `". Log arguments are: "` and the [rendered arguments](render_arguments), and then
    /// truncated according to the options.
    ///
    /// ```
    /// use json_diag_logger::{FixedClock, LogEntry, LogLevel, LogValue, LoggerOptions};
    /// use time::macros::utc_datetime;
    ///
    /// let options = LoggerOptions::new("otel", "checkout");
    /// let clock = FixedClock(utc_datetime!(2024-05-01 12:30:45.123));
    /// let entry = LogEntry::build(
    ///     LogLevel::Warn,
    ///     &"retrying".into(),
    ///     &[LogValue::from(3)],
    ///     &options,
    ///     &clock,
    /// );
    ///
    /// assert_eq!(
    ///     entry.to_json_line()?,
    ///     r#"{"level":"WARN","logger":"otel","message":"retrying. Log arguments are: [ 3 ]","serviceName":"checkout","timestamp":"2024-05-01T12:30:45.123Z"}"#
    /// );
    /// # Ok::<(), serde_json::Error>(())
    /// ```
    pub fn build(
        level: LogLevel,
        message: &LogValue,
        arguments: &[LogValue],
        options: &LoggerOptions,
        clock: &impl Clock,
    ) -> Self {
        let full_message = format!(
            "{}{ARGUMENTS_SEPARATOR}{}",
            format_message(message),
            render_arguments(arguments)
        );
        let message = truncate(
            &full_message,
            options.truncate_limit,
            options.truncated_text(),
        )
        .into_owned();

        Self {
            level,
            logger: options.logger_name.clone(),
            message,
            service_name: options.service_name.clone(),
            timestamp: clock.timestamp(),
        }
    }

    /// Serializes the record as compact, single-line JSON.
    ///
    /// Newlines inside the message are escaped, so the output never spans several lines.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for LogEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map_serializer = serializer.serialize_map(Some(5))?;
        map_serializer.serialize_entry(keys::LEVEL, &self.level)?;
        map_serializer.serialize_entry(keys::LOGGER, &self.logger)?;
        map_serializer.serialize_entry(keys::MESSAGE, &self.message)?;
        map_serializer.serialize_entry(keys::SERVICE_NAME, &self.service_name)?;
        map_serializer.serialize_entry(keys::TIMESTAMP, &self.timestamp)?;
        map_serializer.end()
    }
}

/// Formats the message of a call.
///
/// A string message starting with `{` or `[` is rendered as a quoted string, so that consumers
/// of the JSON record do not mistake it for structured data. Other string messages are kept as
/// they are, and non-string messages are rendered.
///
/// ```
/// use json_diag_logger::{format_message, LogValue};
///
/// assert_eq!(format_message(&"plain text".into()), "plain text");
/// assert_eq!(format_message(&"{id: 1}".into()), "'{id: 1}'");
/// assert_eq!(format_message(&LogValue::Undefined), "undefined");
/// ```
#[must_use]
pub fn format_message(message: &LogValue) -> String {
    match message {
        LogValue::String(text) if !text.starts_with(['{', '[']) => text.clone(),
        _ => render(message, DEFAULT_RENDER_DEPTH),
    }
}

/// Renders the call arguments as a list, `[]` when there are none.
#[must_use]
pub fn render_arguments(arguments: &[LogValue]) -> String {
    render(
        &LogValue::array(arguments.iter().cloned()),
        DEFAULT_RENDER_DEPTH,
    )
}

#[cfg(test)]
mod tests {
    use time::macros::utc_datetime;

    use super::*;
    use crate::clock::FixedClock;

    const TIMESTAMP: &str = "2024-05-01T12:30:45.123Z";

    fn clock() -> FixedClock {
        FixedClock(utc_datetime!(2024-05-01 12:30:45.123))
    }

    fn options() -> LoggerOptions {
        LoggerOptions::new("test-logger", "test-service")
    }

    fn build(message: LogValue, arguments: &[LogValue], options: &LoggerOptions) -> LogEntry {
        LogEntry::build(LogLevel::Info, &message, arguments, options, &clock())
    }

    #[test]
    fn formats_messages() {
        assert_eq!(format_message(&"".into()), "");
        assert_eq!(format_message(&"a {b}".into()), "a {b}");
        assert_eq!(
            format_message(&r#"{context: {info:"something"}}"#.into()),
            r#"'{context: {info:"something"}}'"#
        );
        assert_eq!(
            format_message(&r#"["one", "two"]"#.into()),
            r#"'["one", "two"]'"#
        );
        assert_eq!(format_message(&LogValue::from(7)), "7");
    }

    #[test]
    fn renders_arguments_as_list() {
        assert_eq!(render_arguments(&[]), "[]");
        assert_eq!(
            render_arguments(&[1.into(), "test".into()]),
            "[ 1, 'test' ]"
        );
        assert_eq!(
            render_arguments(&[LogValue::Undefined]),
            "[ undefined ]"
        );
    }

    #[test]
    fn builds_record_fields() {
        let entry = build(
            "I am a log message!".into(),
            &[LogValue::object([(
                "context",
                LogValue::object([("info", "something")]),
            )])],
            &options(),
        );

        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.logger, "test-logger");
        assert_eq!(entry.service_name, "test-service");
        assert_eq!(entry.timestamp, TIMESTAMP);
        assert_eq!(
            entry.message,
            "I am a log message!. Log arguments are: [ { context: { info: 'something' } } ]"
        );
    }

    #[test]
    fn builds_record_for_missing_message() {
        let entry = build(LogValue::Undefined, &[], &options());
        assert_eq!(entry.message, "undefined. Log arguments are: []");

        let entry = build("".into(), &[], &options());
        assert_eq!(entry.message, ". Log arguments are: []");
    }

    #[test]
    fn truncates_after_rendering() {
        let options = options().with_truncate_limit(20);
        let entry = build("x".repeat(10).into(), &[1.into()], &options);
        assert_eq!(entry.message, "xxxxxxxxx_TRUNCATED_");

        let options = options.with_truncated_text("...");
        let entry = build("x".repeat(10).into(), &[1.into()], &options);
        assert_eq!(entry.message, "xxxxxxxxxx. Log a...");
    }

    #[test]
    fn serializes_keys_in_order_on_one_line() {
        let entry = build("first\nsecond".into(), &[], &options());
        let line = entry.to_json_line().unwrap();

        assert_eq!(
            line,
            format!(
                r#"{{"level":"INFO","logger":"test-logger","message":"first\nsecond. Log arguments are: []","serviceName":"test-service","timestamp":"{TIMESTAMP}"}}"#
            )
        );
        assert!(!line.contains('\n'));
    }

    #[test]
    fn cyclic_arguments_produce_valid_json() {
        let list = LogValue::array(["a"]);
        list.push(list.clone());
        let entry = build("cycle".into(), &[list], &options());
        let line = entry.to_json_line().unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(
            parsed["message"],
            "cycle. Log arguments are: [ [ 'a', [Circular] ] ]"
        );
    }
}
