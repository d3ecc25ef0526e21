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

//! GELF JSON encoding.
//!
//! A [`GelfMessage`] serializes to a single flat JSON object: the fixed fields first, then each
//! additional field under its name prefixed with `_`:
//!
//! ```text
//! {"version":"1.1","host":"bree","short_message":"hi","full_message":"hi",
//!  "timestamp":1385053862.307,"level":6,"facility":"GELF","_Notes":"maintenance"}
//! ```

use crate::{
    error::{Error, Result},
    message::GelfMessage,
    record::FieldValue,
};

use backtrace::Backtrace;
use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};

/// Seconds since the epoch, with millisecond precision
fn epoch_seconds(msg: &GelfMessage) -> f64 {
    msg.timestamp().timestamp_millis() as f64 / 1000.0
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldValue::Str(s) => serializer.serialize_str(s),
            FieldValue::I64(n) => serializer.serialize_i64(*n),
            FieldValue::U64(n) => serializer.serialize_u64(*n),
            // JSON has no representation for NaN or the infinities
            FieldValue::F64(x) if !x.is_finite() => Err(S::Error::custom(format!(
                "{} cannot be represented in JSON",
                x
            ))),
            FieldValue::F64(x) => serializer.serialize_f64(*x),
        }
    }
}

impl Serialize for GelfMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7 + self.additional().len()))?;
        map.serialize_entry("version", self.version())?;
        map.serialize_entry("host", self.host())?;
        map.serialize_entry("short_message", self.short_message())?;
        map.serialize_entry("full_message", self.full_message())?;
        map.serialize_entry("timestamp", &epoch_seconds(self))?;
        map.serialize_entry("level", &self.level().as_u8())?;
        map.serialize_entry("facility", self.facility().as_str())?;
        for (name, value) in self.additional() {
            map.serialize_entry(&format!("_{}", name), value)?;
        }
        map.end()
    }
}

/// Encode `msg` as UTF-8 JSON.
pub fn to_json(msg: &GelfMessage) -> Result<Vec<u8>> {
    serde_json::to_vec(msg).map_err(|err| Error::Serialization {
        source: Box::new(err),
        back: Backtrace::new(),
    })
}
