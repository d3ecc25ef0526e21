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

//! The GELF message model.
//!
//! A [`GelfMessage`] holds the fixed GELF fields (`version`, `host`, `short_message`,
//! `full_message`, `timestamp`, `level` & `facility`) plus any number of "additional" fields.
//! Additional field names are stored _without_ the leading underscore GELF puts on the wire; the
//! [`json`](crate::json) module adds it, which is what keeps them from ever colliding with a fixed
//! field.

use crate::{
    error::{Error, Result},
    facility::{Facility, Level},
    record::FieldValue,
};

use backtrace::Backtrace;
use chrono::prelude::*;

use std::collections::BTreeMap;

/// The GELF specification version this crate speaks
pub const GELF_VERSION: &str = "1.1";

/// Messages longer than this many characters get a truncated `short_message`.
pub const SHORT_MESSAGE_LENGTH: usize = 250;

/// Derive the `short_message` from the full message text.
///
/// Text of at most [`SHORT_MESSAGE_LENGTH`] characters is returned unchanged. Longer text is cut
/// to its first `SHORT_MESSAGE_LENGTH - 1` (i.e. 249) characters. Lengths are counted in `char`s,
/// so a multi-byte code point is never split.
pub fn short_message_of(full: &str) -> &str {
    if full.chars().nth(SHORT_MESSAGE_LENGTH).is_none() {
        return full;
    }
    let end = full
        .char_indices()
        .nth(SHORT_MESSAGE_LENGTH - 1)
        .map(|(idx, _)| idx)
        .unwrap_or(full.len());
    &full[..end]
}

/// Check a name against the GELF rules for additional fields: `^[\w\.\-]+$`, and not `id` (`_id`
/// is reserved by Graylog).
pub fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty()
        && name != "id"
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b == b'-')
}

/// One log event, ready to be serialized.
#[derive(Clone, Debug, PartialEq)]
pub struct GelfMessage {
    host: String,
    short_message: String,
    full_message: String,
    timestamp: DateTime<Utc>,
    level: Level,
    facility: Facility,
    additional: BTreeMap<String, FieldValue>,
}

impl GelfMessage {
    /// Build a message stamped with the current time; `short_message` is derived from
    /// `full_message`.
    pub fn new<H, M>(host: H, full_message: M, level: Level, facility: Facility) -> GelfMessage
    where
        H: Into<String>,
        M: Into<String>,
    {
        let full_message = full_message.into();
        GelfMessage {
            host: host.into(),
            short_message: short_message_of(&full_message).to_owned(),
            full_message,
            timestamp: Utc::now(),
            level,
            facility,
            additional: BTreeMap::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attach an additional field, replacing any previous value under the same name.
    pub fn add<K: Into<String>, V: Into<FieldValue>>(&mut self, name: K, value: V) -> Result<()> {
        let name = name.into();
        if !is_valid_field_name(&name) {
            return Err(Error::BadFieldName {
                name,
                back: Backtrace::new(),
            });
        }
        self.additional.insert(name, value.into());
        Ok(())
    }

    /// Attach an additional field whose name is known to be valid.
    pub(crate) fn insert<V: Into<FieldValue>>(&mut self, name: &'static str, value: V) {
        debug_assert!(is_valid_field_name(name));
        self.additional.insert(name.to_owned(), value.into());
    }

    pub fn version(&self) -> &'static str {
        GELF_VERSION
    }
    pub fn host(&self) -> &str {
        &self.host
    }
    pub fn short_message(&self) -> &str {
        &self.short_message
    }
    pub fn full_message(&self) -> &str {
        &self.full_message
    }
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
    pub fn level(&self) -> Level {
        self.level
    }
    pub fn facility(&self) -> &Facility {
        &self.facility
    }
    /// Additional fields, keyed by their un-prefixed names
    pub fn additional(&self) -> &BTreeMap<String, FieldValue> {
        &self.additional
    }
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.additional.get(name)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn short_message_boundaries() {
        let exactly = "x".repeat(250);
        assert_eq!(short_message_of(&exactly), exactly);

        let over = "y".repeat(251);
        assert_eq!(short_message_of(&over).len(), 249);

        let long = "z".repeat(300);
        let msg = GelfMessage::new("h", long.clone(), Level::LOG_INFO, Facility::default());
        assert_eq!(msg.short_message().chars().count(), 249);
        assert_eq!(msg.full_message().chars().count(), 300);
        assert!(long.starts_with(msg.short_message()));

        assert_eq!(short_message_of(""), "");
    }

    #[test]
    fn short_message_counts_chars_not_bytes() {
        // 250 three-byte characters: not truncated
        let wide = "世".repeat(250);
        assert_eq!(short_message_of(&wide), wide);
        // 260 of them: truncated to 249 characters, on a character boundary
        let wider = "界".repeat(260);
        let short = short_message_of(&wider);
        assert_eq!(short.chars().count(), 249);
        assert_eq!(short.len(), 249 * 3);
    }

    #[test]
    fn field_names() {
        assert!(is_valid_field_name("Notes"));
        assert!(is_valid_field_name("http.status-code_2"));
        assert!(!is_valid_field_name("id"));
        assert!(!is_valid_field_name(""));
        assert!(!is_valid_field_name("has space"));
        assert!(!is_valid_field_name("ünïcode"));

        let mut msg = GelfMessage::new("h", "m", Level::LOG_INFO, Facility::default());
        assert!(msg.add("Notes", "maintenance").is_ok());
        assert!(msg.add("id", 1_i64).is_err());
        assert_eq!(msg.additional().len(), 1);
        assert_eq!(msg.get("Notes"), Some(&FieldValue::from("maintenance")));
    }
}
