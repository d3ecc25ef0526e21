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

//! Framework-neutral log records.
//!
//! [`LogRecord`] is the narrow interface through which the publishing pipeline sees a log event:
//! a formatted message, a level, and optionally a logger name, an error & a bag of named
//! properties. The [`event`](crate::event) module builds these from `tracing` events; other
//! front-ends can build them by hand.

use crate::facility::LogLevel;

use std::collections::BTreeMap;

/// A scalar property value. GELF additional fields may only be strings or numbers.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Str(String),
    I64(i64),
    U64(u64),
    F64(f64),
}

impl From<&str> for FieldValue {
    fn from(x: &str) -> Self {
        FieldValue::Str(x.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(x: String) -> Self {
        FieldValue::Str(x)
    }
}

impl From<i64> for FieldValue {
    fn from(x: i64) -> Self {
        FieldValue::I64(x)
    }
}

impl From<u64> for FieldValue {
    fn from(x: u64) -> Self {
        FieldValue::U64(x)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        FieldValue::F64(x)
    }
}

// GELF has no boolean type
impl From<bool> for FieldValue {
    fn from(x: bool) -> Self {
        FieldValue::Str(x.to_string())
    }
}

/// Description of an error attached to a log event.
#[derive(Clone, Debug, PartialEq)]
pub struct ExceptionInfo {
    /// Short type (or variant) name
    pub kind: String,
    /// The error's `Display` text
    pub message: String,
    /// Full rendering: `Debug` text plus the chain of sources
    pub rendered: String,
}

impl ExceptionInfo {
    pub fn new<K, M, R>(kind: K, message: M, rendered: R) -> ExceptionInfo
    where
        K: Into<String>,
        M: Into<String>,
        R: Into<String>,
    {
        ExceptionInfo {
            kind: kind.into(),
            message: message.into(),
            rendered: rendered.into(),
        }
    }

    /// Describe a type-erased error.
    ///
    /// Without the concrete type there is no type name to report, so the kind is taken from the
    /// leading identifier of the `Debug` rendering; for most derived `Debug` impls that is the
    /// struct or variant name (`Os`, `Custom`, `ParseIntError`...).
    pub fn from_dyn(err: &(dyn std::error::Error + 'static)) -> ExceptionInfo {
        let dbg = format!("{:?}", err);
        let kind: String = dbg
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == ':')
            .collect();
        let mut rendered = dbg.clone();
        let mut source = err.source();
        while let Some(cause) = source {
            rendered.push_str("\nCaused by: ");
            rendered.push_str(&cause.to_string());
            source = cause.source();
        }
        ExceptionInfo {
            kind: if kind.is_empty() {
                "Error".to_owned()
            } else {
                kind
            },
            message: err.to_string(),
            rendered,
        }
    }
}

impl std::convert::From<&crate::error::Error> for ExceptionInfo {
    fn from(err: &crate::error::Error) -> Self {
        ExceptionInfo {
            kind: err.kind().to_owned(),
            message: err.to_string(),
            rendered: format!("{:?}", err),
        }
    }
}

/// One log event as seen by the publishing pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct LogRecord {
    pub message: String,
    pub level: LogLevel,
    pub logger: Option<String>,
    pub exception: Option<ExceptionInfo>,
    pub properties: BTreeMap<String, FieldValue>,
}

impl LogRecord {
    pub fn new<S: Into<String>>(level: LogLevel, message: S) -> LogRecord {
        LogRecord {
            message: message.into(),
            level,
            logger: None,
            exception: None,
            properties: BTreeMap::new(),
        }
    }
    pub fn with_logger<S: Into<String>>(mut self, logger: S) -> Self {
        self.logger = Some(logger.into());
        self
    }
    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }
    pub fn with_property<K: Into<String>, V: Into<FieldValue>>(mut self, name: K, value: V) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}
