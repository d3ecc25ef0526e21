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

//! A [`tracing-subscriber`] [`Layer`] implementation for sending [`tracing`] [`Event`]s to a
//! [GELF] collector (such as [Graylog]) over UDP.
//!
//! [`tracing-subscriber`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/index.html
//! [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
//! [`tracing`]: https://docs.rs/tracing/0.1.35/tracing/index.html
//! [`Event`]: https://docs.rs/tracing/0.1.35/tracing/struct.Event.html
//! [GELF]: https://go2docs.graylog.org/current/getting_in_log_data/gelf.html
//! [Graylog]: https://graylog.org/
//!
//! # Introduction
//!
//! GELF (the "Graylog Extended Log Format") is a JSON document with a handful of well-known fields
//! (`version`, `host`, `short_message`, `full_message`, `timestamp`, `level`, `facility`) plus
//! any number of "additional" fields whose names begin with an underscore. Over UDP, each document
//! is (optionally) gzipped and, if the result is too large for one datagram, split into at most
//! 128 "chunks" that the collector reassembles.
//!
//! Each event passes through the following stages:
//!
//! 1. [`event`]: the [`Event`] is mapped to a framework-neutral [`LogRecord`]
//! 2. [`translate`]: the [`LogRecord`] becomes a [`GelfMessage`] (host, facility, severity,
//!    short message, exception & promoted fields)
//! 3. [`json`]: the message is serialized
//! 4. [`compress`]: the JSON is gzipped
//! 5. [`chunk`]: the payload is framed as one or more datagrams
//! 6. [`transport`]: the datagrams go out over UDP
//!
//! [`publish`] ties these together. Logging must never take the application down, so any failure
//! along the way is answered by a single, fixed "could not send" message carrying the error's
//! details (see [`translate::PUBLISH_FAILURE_MESSAGE`]); if even that can't be sent, the loss is
//! counted & remembered (see [`publish::undelivered_count`] & [`publish::last_undelivered`]) & the
//! caller never hears about it.
//!
//! [`Event`]: https://docs.rs/tracing/0.1.35/tracing/struct.Event.html
//! [`LogRecord`]: record::LogRecord
//! [`GelfMessage`]: message::GelfMessage
//!
//! # Usage
//!
//! [`tracing-gelf-udp`](crate)'s [`Layer`] comes with sane defaults:
//!
//! ```no_run
//! use tracing::info;
//! use tracing_gelf_udp::layer::Layer;
//! use tracing_subscriber::registry::Registry;
//! use tracing_subscriber::layer::SubscriberExt; // Needed to get `with()`
//!
//! // The default configuration is to gzip GELF messages, chunk them at 8192 bytes, and
//! // send them via UDP to port 12201 on the localhost.
//! let subscriber = Registry::default().with(Layer::try_default().unwrap());
//! let _guard = tracing::subscriber::set_default(subscriber);
//!
//! info!(Notes = "rolled back", "Hello, world!");
//! ```
//!
//! That said, the collector, facility, host name, compression, chunk size & severity mapping are
//! all configurable:
//!
//! ```no_run
//! use tracing::warn;
//! use tracing_gelf_udp::{compress::Compression, layer::Layer};
//! use tracing_subscriber::registry::Registry;
//! use tracing_subscriber::layer::SubscriberExt; // Needed to get `with()`
//!
//! let layer = Layer::builder()
//!     .facility("billing")
//!     .hostname("bree.local")
//!     .compression(Compression::Gzip { min_size: 512 })
//!     .chunk_size(1420)
//!     .promote_all_properties(true)
//!     .build_udp("graylog.lan:12201")
//!     .unwrap();
//! let subscriber = Registry::default().with(layer);
//! let _guard = tracing::subscriber::set_default(subscriber);
//!
//! warn!(invoice = 1138, "Payment overdue");
//! ```
//!
//! or read from the environment (`GELF_HOST`, `GELF_PORT` &c; see [`config`]):
//!
//! ```no_run
//! use tracing_gelf_udp::{config::Config, layer::Layer};
//! use tracing_subscriber::registry::Registry;
//! use tracing_subscriber::layer::SubscriberExt; // Needed to get `with()`
//!
//! let layer = Layer::from_config(&Config::from_env().unwrap()).unwrap();
//! let subscriber = Registry::default().with(layer);
//! ```

pub mod chunk;
pub mod compress;
pub mod config;
pub mod error;
pub mod event;
pub mod facility;
pub mod host;
pub mod json;
pub mod layer;
pub mod message;
pub mod publish;
pub mod record;
pub mod translate;
pub mod transport;
