// Copyright (C) 2026 The tracing-gelf-udp Authors
//
// This file is part of tracing-gelf-udp.
//
// tracing-gelf-udp is free software: you can redistribute it and/or modify it under the terms of
// the GNU General Public License as published by the Free Software Foundation, either version 3 of
// the License, or (at your option) any later version.
//
// tracing-gelf-udp is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with tracing-gelf-udp.
// If not, see <http://www.gnu.org/licenses/>.

//! GELF facility & severity defintions.
//!
//! GELF borrowed its `level` field from syslog: an integer from 0 (system is unusable) to 7
//! (debug), with the names used in `<syslog.h>`. [`Level`] models that. The `facility` field, on
//! the other hand, is a free-form label in GELF (unlike the twenty-four fixed syslog facilities),
//! so [`Facility`] is just a string with a sentinel default.
//!
//! [`LogLevel`] is the taxonomy on the _producing_ side, and [`default_severity`] is the table
//! mapping one onto the other.

type StdResult<T, E> = std::result::Result<T, E>;

/// The facility reported when none has been configured.
pub const DEFAULT_FACILITY: &str = "GELF";

/// A free-form categorization label attached to every message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Facility(String);

impl Facility {
    pub fn new<S: Into<String>>(name: S) -> Facility {
        Facility(name.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::default::Default for Facility {
    /// The default facility is "GELF".
    fn default() -> Self {
        Facility(DEFAULT_FACILITY.to_owned())
    }
}

impl std::convert::From<Option<String>> for Facility {
    fn from(x: Option<String>) -> Self {
        x.map(Facility).unwrap_or_default()
    }
}

impl std::fmt::Display for Facility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "{}", self.0)
    }
}

/// The eight syslog severity levels, as used in the GELF `level` field. The enumeration values
/// duplicate the constants documented as per the `syslog()` manual [page] & defined in
/// `<syslog.h>`.
///
/// [page]: https://man7.org/linux/man-pages/man3/syslog.3.html
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// system is unusable
    LOG_EMERG = 0,
    /// action must be take immediately
    LOG_ALERT = 1,
    /// critical conditions
    LOG_CRIT = 2,
    /// error conditions
    LOG_ERR = 3,
    /// warning conditions
    LOG_WARNING = 4,
    /// normal, but significant condition
    LOG_NOTICE = 5,
    /// informational message
    LOG_INFO = 6,
    /// debug-level message
    LOG_DEBUG = 7,
}

impl Level {
    /// The on-the-wire value of this severity
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(
            f,
            "{}",
            match self {
                Level::LOG_EMERG => "LOG_EMERG",
                Level::LOG_ALERT => "LOG_ALERT",
                Level::LOG_CRIT => "LOG_CRIT",
                Level::LOG_ERR => "LOG_ERR",
                Level::LOG_WARNING => "LOG_WARNING",
                Level::LOG_NOTICE => "LOG_NOTICE",
                Level::LOG_INFO => "LOG_INFO",
                Level::LOG_DEBUG => "LOG_DEBUG",
            }
        )
    }
}

/// Application log levels, from least to most severe.
///
/// These are the six levels commonly found in application logging frameworks. [`tracing`] only
/// produces the first five; `Fatal` is what this crate uses for its own "could not publish"
/// messages.
///
/// [`tracing`]: https://docs.rs/tracing/latest/tracing/index.html
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// Every level, least severe first.
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];
}

impl std::convert::From<&tracing::Level> for LogLevel {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE => LogLevel::Trace,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::WARN => LogLevel::Warn,
            tracing::Level::ERROR => LogLevel::Error,
        }
    }
}

/// The default severity table:
///
/// | [`LogLevel`] | [`Level`]       | value |
/// |--------------|-----------------|-------|
/// | `Fatal`      | `LOG_EMERG`     | 0     |
/// | `Error`      | `LOG_ERR`       | 3     |
/// | `Warn`       | `LOG_WARNING`   | 4     |
/// | `Info`       | `LOG_INFO`      | 6     |
/// | `Debug`      | `LOG_DEBUG`     | 7     |
/// | `Trace`      | `LOG_DEBUG`     | 7     |
pub fn default_severity(level: LogLevel) -> Level {
    match level {
        LogLevel::Fatal => Level::LOG_EMERG,
        LogLevel::Error => Level::LOG_ERR,
        LogLevel::Warn => Level::LOG_WARNING,
        LogLevel::Info => Level::LOG_INFO,
        LogLevel::Debug | LogLevel::Trace => Level::LOG_DEBUG,
    }
}

#[cfg(test)]
mod facility_level_tests {
    use super::*;

    #[test]
    fn test_facility() {
        assert_eq!(Facility::default().as_str(), "GELF");
        assert_eq!(Facility::from(None).as_str(), "GELF");
        assert_eq!(Facility::from(Some("billing".to_owned())).as_str(), "billing");
        assert_eq!(format!("{}", Facility::new("jobs")), "jobs".to_string());
    }

    #[test]
    fn test_table() {
        assert_eq!(default_severity(LogLevel::Fatal).as_u8(), 0);
        assert_eq!(default_severity(LogLevel::Error).as_u8(), 3);
        assert_eq!(default_severity(LogLevel::Warn).as_u8(), 4);
        assert_eq!(default_severity(LogLevel::Info).as_u8(), 6);
        assert_eq!(default_severity(LogLevel::Debug).as_u8(), 7);
        assert_eq!(default_severity(LogLevel::Trace).as_u8(), 7);
        assert_eq!(format!("{}", Level::LOG_WARNING), "LOG_WARNING");
    }

    /// More severe application levels never map to a less severe syslog level.
    #[test]
    fn test_monotonic() {
        for pair in LogLevel::ALL.windows(2) {
            let (less, more) = (pair[0], pair[1]);
            assert!(less < more);
            assert!(default_severity(more) <= default_severity(less));
            assert!(default_severity(more).as_u8() <= 7);
        }
    }

    #[test]
    fn test_from_tracing() {
        assert_eq!(LogLevel::from(&tracing::Level::TRACE), LogLevel::Trace);
        assert_eq!(LogLevel::from(&tracing::Level::WARN), LogLevel::Warn);
        assert_eq!(LogLevel::from(&tracing::Level::ERROR), LogLevel::Error);
    }
}
