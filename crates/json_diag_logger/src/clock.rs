//! Source of record timestamps.

use time::{format_description::BorrowedFormatItem, macros::format_description, UtcDateTime};

/// `2024-05-01T12:30:45.123Z`
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

/// Provides the instant at which a record is built.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> UtcDateTime;

    /// The current instant formatted as ISO-8601 with millisecond precision and a `Z` suffix.
    fn timestamp(&self) -> String {
        format_timestamp(self.now())
    }
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UtcDateTime {
        UtcDateTime::now()
    }
}

/// A clock frozen at one instant, for reproducible output.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub UtcDateTime);

impl Clock for FixedClock {
    fn now(&self) -> UtcDateTime {
        self.0
    }
}

pub(crate) fn format_timestamp(instant: UtcDateTime) -> String {
    instant.format(TIMESTAMP_FORMAT).unwrap_or_default()
}
