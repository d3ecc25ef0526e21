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

//! Primitives for mapping [`tracing`] [`Event`]s to [`LogRecord`]s.
//!
//! - the `message` field becomes the record's message
//! - the first field recorded as an error (e.g. `error!(error = &err as &dyn Error, ...)`)
//!   becomes the record's exception
//! - every other field becomes a property
//!
//! [`tracing`]: https://docs.rs/tracing/latest/tracing/index.html
//! [`Event`]: https://docs.rs/tracing/0.1.35/tracing/struct.Event.html

use crate::{
    facility::LogLevel,
    record::{ExceptionInfo, FieldValue, LogRecord},
};

use tracing_core::field::{Field, Visit};

use std::collections::BTreeMap;

const MESSAGE_FIELD: &str = "message";

#[derive(Default)]
struct RecordVisitor {
    message: Option<String>,
    exception: Option<ExceptionInfo>,
    properties: BTreeMap<String, FieldValue>,
}

impl RecordVisitor {
    fn property(&mut self, field: &Field, value: FieldValue) {
        // Fields tracing-log adds to bridged `log` records; the metadata already has them
        if cfg!(feature = "tracing-log") && field.name().starts_with("log.") {
            return;
        }
        self.properties.insert(field.name().to_owned(), value);
    }
}

impl Visit for RecordVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // The tracing macros "pre-format" the `message` field so that `value` refers to a
        // `std::fmt::Arguments` instance, which prints without enclosing double-quotes.
        let text = format!("{:?}", value);
        if field.name() == MESSAGE_FIELD {
            self.message = Some(text);
        } else {
            self.property(field, FieldValue::Str(text));
        }
    }
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(value.to_owned());
        } else {
            self.property(field, FieldValue::from(value));
        }
    }
    fn record_i64(&mut self, field: &Field, value: i64) {
        self.property(field, FieldValue::I64(value));
    }
    fn record_u64(&mut self, field: &Field, value: u64) {
        self.property(field, FieldValue::U64(value));
    }
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.property(field, FieldValue::F64(value));
    }
    fn record_bool(&mut self, field: &Field, value: bool) {
        self.property(field, FieldValue::from(value));
    }
    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        if self.exception.is_none() {
            self.exception = Some(ExceptionInfo::from_dyn(value));
        } else {
            self.property(field, FieldValue::Str(value.to_string()));
        }
    }
}

/// Build a [`LogRecord`] from `event`.
///
/// `target` & `level` are passed separately since, for events bridged from the `log` crate, the
/// caller will want to use the normalized metadata rather than the event's own. An event without
/// a `message` field is reported under its metadata name (e.g. "event src/main.rs:12").
pub fn record_from_event(
    event: &tracing_core::Event<'_>,
    target: &str,
    level: &tracing_core::Level,
) -> LogRecord {
    let mut visitor = RecordVisitor::default();
    event.record(&mut visitor);
    LogRecord {
        message: visitor
            .message
            .unwrap_or_else(|| event.metadata().name().to_owned()),
        level: LogLevel::from(level),
        logger: Some(target.to_owned()),
        exception: visitor.exception,
        properties: visitor.properties,
    }
}
