//! Provides a [`tracing_subscriber::Layer`] ([`DiagLoggerLayer`]) forwarding [`tracing`] events
//! to a [`DiagLogger`].

use std::fmt;

use tracing::{
    field::{Field, Visit},
    Event, Level, Subscriber,
};
use tracing_subscriber::{layer::Context, Layer};

use crate::{logger::DiagLogger, value::LogValue};

const MESSAGE: &str = "message";

/// A [`tracing_subscriber::Layer`] that hands every event to a [`DiagLogger`].
///
/// Levels map as `TRACE` to `verbose`, `DEBUG` to `debug`, `INFO` to `info`, `WARN` to `warn` and
/// `ERROR` to `error`. The `message` field becomes the message (the event target when absent),
/// and the remaining fields are passed as a single object argument.
///
/// ```
/// use std::sync::Arc;
///
/// use json_diag_logger::{DiagLoggerLayer, JsonDiagLogger, LoggerOptions};
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let logger = Arc::new(JsonDiagLogger::new(LoggerOptions::new("otel", "checkout")));
/// let subscriber = tracing_subscriber::registry().with(DiagLoggerLayer::new(logger));
///
/// tracing::subscriber::with_default(subscriber, || {
///     tracing::info!(attempt = 3, "exporter started");
/// });
/// ```
#[derive(Clone, Debug)]
pub struct DiagLoggerLayer<L> {
    logger: L,
}

impl<L> DiagLoggerLayer<L> {
    /// Creates a layer forwarding events to the given logger.
    pub fn new(logger: L) -> Self {
        Self { logger }
    }

    /// The logger events are forwarded to.
    pub fn logger(&self) -> &L {
        &self.logger
    }
}

/// Fields of one event, in recording order.
#[derive(Debug, Default)]
struct EventFields {
    message: Option<String>,
    values: Vec<(String, LogValue)>,
}

impl EventFields {
    fn record_value(&mut self, name: &str, value: LogValue) {
        match name {
            // Skip fields which are already handled
            name if name.starts_with("log.") => (),
            name => {
                let name = name.strip_prefix("r#").unwrap_or(name);
                self.values.push((name.to_string(), value));
            }
        }
    }

    fn into_arguments(self) -> Vec<LogValue> {
        if self.values.is_empty() {
            Vec::new()
        } else {
            vec![LogValue::object(self.values)]
        }
    }
}

impl Visit for EventFields {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_value(field.name(), LogValue::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field.name(), LogValue::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field.name(), LogValue::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field.name(), LogValue::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE {
            self.message = Some(value.to_string());
        } else {
            self.record_value(field.name(), LogValue::from(value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE {
            if self.message.is_none() {
                self.message = Some(format!("{value:?}"));
            }
        } else {
            self.record_value(field.name(), LogValue::from(format!("{value:?}")));
        }
    }
}

impl<S, L> Layer<S> for DiagLoggerLayer<L>
where
    S: Subscriber,
    L: DiagLogger + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut fields = EventFields::default();
        event.record(&mut fields);

        let message = LogValue::from(
            fields
                .message
                .take()
                .unwrap_or_else(|| metadata.target().to_string()),
        );
        let arguments = fields.into_arguments();

        match *metadata.level() {
            Level::ERROR => self.logger.error(&message, &arguments),
            Level::WARN => self.logger.warn(&message, &arguments),
            Level::INFO => self.logger.info(&message, &arguments),
            Level::DEBUG => self.logger.debug(&message, &arguments),
            _ => self.logger.verbose(&message, &arguments),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use time::macros::utc_datetime;
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;
    use crate::{
        clock::FixedClock, level::LogLevel, logger::JsonDiagLogger, options::LoggerOptions,
        sink::WriterSink,
    };

    type TestLogger = JsonDiagLogger<WriterSink<Mutex<Vec<u8>>>, FixedClock>;

    fn logger(options: LoggerOptions) -> Arc<TestLogger> {
        Arc::new(JsonDiagLogger::with_sink_and_clock(
            options,
            WriterSink::new(Mutex::new(Vec::new())),
            FixedClock(utc_datetime!(2024-05-01 12:30:45.123)),
        ))
    }

    fn records(logger: &TestLogger) -> Vec<serde_json::Value> {
        let written = logger.sink().writer().lock().unwrap().clone();
        String::from_utf8(written)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn forwards_events_with_mapped_levels() {
        let logger = logger(
            LoggerOptions::new("bridge", "test-service")
                .with_log_level_for_service_request_error_messages(LogLevel::Info),
        );
        let subscriber =
            tracing_subscriber::registry().with(DiagLoggerLayer::new(Arc::clone(&logger)));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(attempt = 3, endpoint = "collector", "exporter started");
            tracing::trace!("noisy");
            tracing::error!("Service request");
        });

        let records = records(&logger);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0]["level"], "INFO");
        assert_eq!(
            records[0]["message"],
            "exporter started. Log arguments are: [ { attempt: 3, endpoint: 'collector' } ]"
        );
        assert_eq!(records[1]["level"], "VERBOSE");
        assert_eq!(records[1]["message"], "noisy. Log arguments are: []");
        assert_eq!(records[2]["level"], "INFO");
        assert_eq!(records[2]["logger"], "bridge");
    }

    #[test]
    fn falls_back_to_target_without_message() {
        let logger = logger(LoggerOptions::new("bridge", "test-service"));
        let subscriber =
            tracing_subscriber::registry().with(DiagLoggerLayer::new(Arc::clone(&logger)));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "exporter", retries = 2_u64);
        });

        let records = records(&logger);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["level"], "WARN");
        assert_eq!(
            records[0]["message"],
            "exporter. Log arguments are: [ { retries: 2 } ]"
        );
    }
}
