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

//! Mapping [`LogRecord`]s (and our own failures) to [`GelfMessage`]s.
//!
//! The translation sets the host, facility & severity, derives the short message, and attaches
//! additional fields:
//!
//! | field              | source                                             |
//! |--------------------|----------------------------------------------------|
//! | `Logger`           | the record's logger name, when non-empty           |
//! | `Notes`            | the record's `Notes` property, when present        |
//! | `ExceptionType`    | the attached error's type or variant name          |
//! | `ExceptionMessage` | the attached error's message                       |
//! | `Exception`        | the attached error's full rendering                |
//!
//! Other properties are carried over only when asked for (see [`Translator::promote_property`]
//! & [`Translator::promote_all_properties`]).

use crate::{
    error::Error,
    facility::{default_severity, Facility, Level, LogLevel},
    host::{HostnameProvider, SystemHostname},
    message::{is_valid_field_name, GelfMessage},
    record::{ExceptionInfo, LogRecord},
};

/// The property always carried over into an additional field of the same name
pub const NOTES_PROPERTY: &str = "Notes";
pub const LOGGER_FIELD: &str = "Logger";
pub const EXCEPTION_TYPE_FIELD: &str = "ExceptionType";
pub const EXCEPTION_MESSAGE_FIELD: &str = "ExceptionMessage";
pub const EXCEPTION_FIELD: &str = "Exception";

/// Text of the message sent in place of one that could not be published
pub const PUBLISH_FAILURE_MESSAGE: &str = "Error sending message in tracing-gelf-udp";

/// Builds [`GelfMessage`]s from [`LogRecord`]s.
pub struct Translator {
    facility: Facility,
    hostname: Box<dyn HostnameProvider>,
    map_level: Box<dyn Fn(LogLevel) -> Level + Send + Sync>,
    promoted: Vec<String>,
    promote_all: bool,
}

impl std::default::Default for Translator {
    fn default() -> Self {
        Translator {
            facility: Facility::default(),
            hostname: Box::new(SystemHostname),
            map_level: Box::new(default_severity),
            promoted: vec![NOTES_PROPERTY.to_owned()],
            promote_all: false,
        }
    }
}

impl Translator {
    pub fn facility(mut self, facility: Facility) -> Self {
        self.facility = facility;
        self
    }
    pub fn hostname<H: HostnameProvider + 'static>(mut self, hostname: H) -> Self {
        self.hostname = Box::new(hostname);
        self
    }
    /// Replace the severity table (see [`default_severity`]).
    pub fn map_level<F>(mut self, map_level: F) -> Self
    where
        F: Fn(LogLevel) -> Level + Send + Sync + 'static,
    {
        self.map_level = Box::new(map_level);
        self
    }
    /// Carry the named property over as an additional field, in addition to `Notes`.
    pub fn promote_property<S: Into<String>>(mut self, name: S) -> Self {
        self.promoted.push(name.into());
        self
    }
    /// Carry _every_ property over as an additional field.
    pub fn promote_all_properties(mut self, promote_all: bool) -> Self {
        self.promote_all = promote_all;
        self
    }

    /// Build the GELF message for `record`. Cannot fail; properties whose names aren't legal GELF
    /// field names are left out.
    pub fn translate(&self, record: &LogRecord) -> GelfMessage {
        let mut msg = GelfMessage::new(
            self.hostname.hostname(),
            record.message.as_str(),
            (*self.map_level)(record.level),
            self.facility.clone(),
        );

        for (name, value) in record.properties.iter().filter(|(name, _)| {
            self.promote_all || self.promoted.iter().any(|p| p == *name)
        }) {
            if is_valid_field_name(name) {
                // Can't fail; the name was just checked
                let _ = msg.add(name.as_str(), value.clone());
            }
        }

        if let Some(logger) = record.logger.as_deref().filter(|l| !l.trim().is_empty()) {
            msg.insert(LOGGER_FIELD, logger);
        }

        if let Some(exception) = &record.exception {
            add_exception(&mut msg, exception);
        }

        msg
    }

    /// Build the message reporting that an event could not be published.
    ///
    /// This runs inside the failure handler, so it must not fail: the text is fixed, the severity
    /// is always the most severe, and `err` is described in the exception fields.
    pub fn translate_failure(&self, err: &Error) -> GelfMessage {
        let mut msg = GelfMessage::new(
            self.hostname.hostname(),
            PUBLISH_FAILURE_MESSAGE,
            Level::LOG_EMERG,
            self.facility.clone(),
        );
        add_exception(&mut msg, &ExceptionInfo::from(err));
        msg
    }
}

fn add_exception(msg: &mut GelfMessage, exception: &ExceptionInfo) {
    msg.insert(EXCEPTION_TYPE_FIELD, exception.kind.as_str());
    msg.insert(EXCEPTION_MESSAGE_FIELD, exception.message.as_str());
    msg.insert(EXCEPTION_FIELD, exception.rendered.as_str());
}
