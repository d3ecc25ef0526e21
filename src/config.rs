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

//! Publisher configuration.
//!
//! A [`Config`] may be deserialized from (a section of) an application's own configuration file,
//! or read from the environment:
//!
//! | variable            | field              | example        |
//! |---------------------|--------------------|----------------|
//! | `GELF_HOST`         | `host`             | `graylog.lan`  |
//! | `GELF_PORT`         | `port`             | `12201`        |
//! | `GELF_FACILITY`     | `facility`         | `billing`      |
//! | `GELF_COMPRESSION`  | `compression`      | `none`, `gzip` |
//! | `GELF_CHUNK_SIZE`   | `chunk_size`       | `1420`         |
//! | `GELF_SEND_TIMEOUT` | `send_timeout_ms`  | `250`          |
//!
//! Unset or empty variables leave the default in place.

use crate::{
    chunk::DEFAULT_CHUNK_SIZE,
    compress::Compression,
    error::{Error, Result},
    transport::{DEFAULT_HOST, DEFAULT_PORT},
};

use backtrace::Backtrace;
use serde::Deserialize;

use std::{env, str::FromStr};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The collector's host name or address
    pub host: String,
    pub port: u16,
    /// Reported as each message's facility; `None` means "GELF"
    pub facility: Option<String>,
    pub compression: Compression,
    /// Payload bytes per chunk
    pub chunk_size: usize,
    /// Bound on a single datagram send, in milliseconds
    pub send_timeout_ms: Option<u64>,
    /// Send every event field as an additional field, not just `Notes`
    pub promote_all_properties: bool,
}

impl std::default::Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            facility: None,
            compression: Compression::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            send_timeout_ms: None,
            promote_all_properties: false,
        }
    }
}

fn bad_config(name: &'static str, value: &str) -> Error {
    Error::BadConfig {
        name,
        value: value.to_owned(),
        back: Backtrace::new(),
    }
}

fn read<T: FromStr>(
    into: &mut T,
    name: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<()> {
    match lookup(name) {
        // Unset, or set but empty
        None => Ok(()),
        Some(ref v) if v.is_empty() => Ok(()),
        Some(v) => {
            *into = T::from_str(v.trim()).map_err(|_| bad_config(name, &v))?;
            Ok(())
        }
    }
}

fn parse_compression(text: &str) -> Option<Compression> {
    match text.to_ascii_lowercase().as_str() {
        "none" => Some(Compression::None),
        "gzip" => Some(Compression::default()),
        _ => None,
    }
}

impl Config {
    /// Start from the defaults & apply any `GELF_*` environment variables.
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|name| {
            env::var_os(name).map(|val| val.to_string_lossy().into_owned())
        })
    }

    /// Start from the defaults & apply whatever `lookup` returns for each `GELF_*` variable.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Config> {
        let mut config = Config::default();

        read(&mut config.host, "GELF_HOST", &lookup)?;
        read(&mut config.port, "GELF_PORT", &lookup)?;
        if let Some(facility) = lookup("GELF_FACILITY").filter(|s| !s.trim().is_empty()) {
            config.facility = Some(facility);
        }
        if let Some(text) = lookup("GELF_COMPRESSION").filter(|s| !s.is_empty()) {
            config.compression = parse_compression(text.trim())
                .ok_or_else(|| bad_config("GELF_COMPRESSION", &text))?;
        }
        read(&mut config.chunk_size, "GELF_CHUNK_SIZE", &lookup)?;
        let mut timeout = 0u64;
        read(&mut timeout, "GELF_SEND_TIMEOUT", &lookup)?;
        if timeout > 0 {
            config.send_timeout_ms = Some(timeout);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 12201);
        assert_eq!(config.compression, Compression::Gzip { min_size: 0 });
        assert_eq!(config.chunk_size, 8192);
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup_in(&[
            ("GELF_HOST", "graylog.lan"),
            ("GELF_PORT", " 12202 "),
            ("GELF_FACILITY", "billing"),
            ("GELF_COMPRESSION", "None"),
            ("GELF_CHUNK_SIZE", "1420"),
            ("GELF_SEND_TIMEOUT", "250"),
        ]))
        .unwrap();
        assert_eq!(config.host, "graylog.lan");
        assert_eq!(config.port, 12202);
        assert_eq!(config.facility.as_deref(), Some("billing"));
        assert_eq!(config.compression, Compression::None);
        assert_eq!(config.chunk_size, 1420);
        assert_eq!(config.send_timeout_ms, Some(250));
    }

    #[test]
    fn empty_values_are_ignored() {
        let config = Config::from_lookup(lookup_in(&[
            ("GELF_PORT", ""),
            ("GELF_FACILITY", "  "),
            ("GELF_COMPRESSION", ""),
        ]))
        .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn bad_values() {
        for (name, value) in [
            ("GELF_PORT", "graylog"),
            ("GELF_PORT", "70000"),
            ("GELF_COMPRESSION", "zstd"),
            ("GELF_CHUNK_SIZE", "-1"),
            ("GELF_SEND_TIMEOUT", "soon"),
        ] {
            let err = Config::from_lookup(lookup_in(&[(name, value)])).unwrap_err();
            assert_eq!(err.kind(), "BadConfig");
            assert!(format!("{}", err).contains(name));
        }
    }

    #[test]
    fn deserialize() {
        let config: Config =
            serde_json::from_str(r#"{"host": "graylog.lan", "compression": "none"}"#).unwrap();
        assert_eq!(config.host, "graylog.lan");
        assert_eq!(config.compression, Compression::None);
        assert_eq!(config.port, 12201);

        let config: Config =
            serde_json::from_str(r#"{"compression": {"gzip": {"min_size": 512}}}"#).unwrap();
        assert_eq!(config.compression, Compression::Gzip { min_size: 512 });
    }
}
