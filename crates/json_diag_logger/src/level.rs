//! Severity levels and their total ordering.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::LoggerError;

/// Severity of a log record, ordered from `Off` (lowest rank) to `Error` (highest rank).
///
/// `Off` plays two roles: as the level of a record it means "never emit", and as a configured
/// minimum it filters nothing but `Off` itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Never emitted.
    Off,

    /// Most detailed diagnostics.
    Verbose,

    /// Debugging information.
    Debug,

    /// General information.
    Info,

    /// Warning conditions.
    Warn,

    /// Error conditions.
    Error,
}

impl LogLevel {
    /// All levels, in ascending rank.
    pub const ALL: [Self; 6] = [
        Self::Off,
        Self::Verbose,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
    ];

    /// Position of the level in the total order, `Off` being `0`.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Verbose => 1,
            Self::Debug => 2,
            Self::Info => 3,
            Self::Warn => 4,
            Self::Error => 5,
        }
    }

    /// Returns `true` if this level passes the given minimum.
    ///
    /// An unset minimum is no floor at all. A minimum of `Off` lets through every level except
    /// `Off` itself.
    ///
    /// ```
    /// use json_diag_logger::LogLevel;
    ///
    /// assert!(LogLevel::Warn.is_at_least(Some(LogLevel::Info)));
    /// assert!(!LogLevel::Debug.is_at_least(Some(LogLevel::Info)));
    /// assert!(LogLevel::Verbose.is_at_least(Some(LogLevel::Off)));
    /// assert!(!LogLevel::Off.is_at_least(Some(LogLevel::Off)));
    /// assert!(LogLevel::Off.is_at_least(None));
    /// ```
    #[must_use]
    pub fn is_at_least(self, minimum: Option<Self>) -> bool {
        match minimum {
            None => true,
            Some(Self::Off) => self != Self::Off,
            Some(minimum) => self.rank() >= minimum.rank(),
        }
    }

    /// The upper-case wire name of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Verbose => "VERBOSE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LoggerError::InvalidLevel(s.to_string()))
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
