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

//! Publishing one log record, start to finish.
//!
//! [`Publisher::publish`] runs a record through every stage on the calling thread:
//!
//! ```text
//! translate -> serialize -> compress -> chunk -> send          => Outcome::Sent
//!      any of those fails
//!        -> translate_failure -> serialize -> compress -> chunk -> send
//!                                                              => Outcome::SentFallback
//!           any of _those_ fails                               => Outcome::Undelivered
//! ```
//!
//! Errors never reach the caller; logging must not take the application down. A message that
//! could not be delivered even as a fallback is counted in [`undelivered_count`] and remembered
//! in [`last_undelivered`], where the application can look for it at its leisure.
//!
//! The failure is also reported through `tracing`, but note that `tracing` discards events
//! emitted while another event is being dispatched: when the [`Publisher`] is driven by this
//! crate's [`Layer`](crate::layer::Layer), those diagnostics go nowhere. They are only seen when
//! the [`Publisher`] is used directly (and even then this crate's own [`Layer`] ignores them).
//!
//! [`Layer`]: crate::layer::Layer

use crate::{
    chunk::{maybe_chunk, validate_chunk_size, Datagrams, DEFAULT_CHUNK_SIZE},
    compress::Compression,
    error::{Error, Result},
    facility::Level,
    json::to_json,
    message::GelfMessage,
    record::LogRecord,
    translate::Translator,
    transport::Transport,
};

use tracing::{debug, error};

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex,
};

static UNDELIVERED: AtomicU64 = AtomicU64::new(0);
static LAST_UNDELIVERED: Mutex<Option<Undelivered>> = Mutex::new(None);

/// The number of log records, process-wide, for which neither the message nor the fallback
/// reporting its failure could be sent.
pub fn undelivered_count() -> u64 {
    UNDELIVERED.load(Ordering::Relaxed)
}

/// The most recent record, process-wide, that could be sent neither as itself nor as a fallback.
pub fn last_undelivered() -> Option<Undelivered> {
    match LAST_UNDELIVERED.lock() {
        Ok(slot) => slot.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn remember_undelivered(lost: Undelivered) {
    let mut slot = match LAST_UNDELIVERED.lock() {
        Ok(slot) => slot,
        Err(poisoned) => poisoned.into_inner(),
    };
    *slot = Some(lost);
}

/// What is known about a log record that was lost outright.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Undelivered {
    /// Severity the lost record would have been sent at
    pub level: Level,
    /// Why the record itself couldn't be sent
    pub first: String,
    /// Why the fallback reporting that couldn't be sent
    pub second: String,
}

impl std::fmt::Display for Undelivered {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} record lost: {}; the fallback failed as well: {}",
            self.level, self.first, self.second
        )
    }
}

/// How [`Publisher::publish`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The record went out as a GELF message
    Sent,
    /// The record could not be sent, but a message reporting that could
    SentFallback,
    /// Neither could be sent
    Undelivered,
}

/// Turns [`LogRecord`]s into GELF datagrams on a [`Transport`].
pub struct Publisher<T: Transport> {
    translator: Translator,
    compression: Compression,
    chunk_size: usize,
    transport: T,
}

impl<T: Transport> Publisher<T> {
    /// Gzip everything, chunk at [`DEFAULT_CHUNK_SIZE`].
    pub fn new(translator: Translator, transport: T) -> Publisher<T> {
        Publisher {
            translator,
            compression: Compression::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            transport,
        }
    }
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }
    /// Payloads larger than `chunk_size` bytes are chunked into pieces of that size.
    pub fn chunk_size(mut self, chunk_size: usize) -> Result<Self> {
        self.chunk_size = validate_chunk_size(chunk_size)?;
        Ok(self)
    }
    pub fn translator(&self) -> &Translator {
        &self.translator
    }
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Publish `record`, falling back to a report of the failure if that doesn't work out.
    pub fn publish(&self, record: &LogRecord) -> Outcome {
        let msg = self.translator.translate(record);
        match self.send_message(&msg) {
            Ok(_) => Outcome::Sent,
            Err(err) => self.publish_failure(&err, msg.level()),
        }
    }

    fn publish_failure(&self, err: &Error, level: Level) -> Outcome {
        let fallback = self.translator.translate_failure(err);
        match self.send_message(&fallback) {
            Ok(_) => {
                debug!(kind = err.kind(), "sent a fallback message in place of a log record");
                Outcome::SentFallback
            }
            Err(second) => {
                let lost = Undelivered {
                    level,
                    first: err.to_string(),
                    second: second.to_string(),
                };
                error!("{}", lost);
                remember_undelivered(lost);
                UNDELIVERED.fetch_add(1, Ordering::Relaxed);
                Outcome::Undelivered
            }
        }
    }

    /// Serialize, compress, chunk & send `msg`; returns the number of datagrams sent.
    pub fn send_message(&self, msg: &GelfMessage) -> Result<usize> {
        let payload = self.compression.apply(to_json(msg)?)?;
        let datagrams = maybe_chunk(&payload, self.chunk_size)?;
        match &datagrams {
            Datagrams::Single(bytes) => {
                self.transport.send(bytes)?;
            }
            Datagrams::Chunked(frames) => {
                debug!(
                    bytes = payload.len(),
                    chunks = frames.len(),
                    "sending a chunked GELF message"
                );
                for frame in frames {
                    self.transport.send(&frame.encode())?;
                }
            }
        }
        Ok(datagrams.len())
    }
}

#[cfg(test)]
pub(crate) mod test_support {

    use crate::{
        chunk::{reassemble, ChunkFrame},
        compress::decompress,
        error::{Error, Result},
        transport::Transport,
    };

    use backtrace::Backtrace;
    use serde_json::Value;

    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    /// A [`Transport`] that keeps what it's given & can be told to fail.
    #[derive(Default)]
    pub struct RecordingTransport {
        pub sent: Mutex<Vec<Vec<u8>>>,
        pub attempts: AtomicUsize,
        /// fail this many sends before succeeding again
        pub fail_next: AtomicUsize,
    }

    impl RecordingTransport {
        pub fn failing(n: usize) -> RecordingTransport {
            let transpo = RecordingTransport::default();
            transpo.fail_next.store(n, Ordering::SeqCst);
            transpo
        }
        pub fn datagrams(&self) -> Vec<Vec<u8>> {
            self.sent.lock().unwrap().clone()
        }
        /// Reassemble, decompress & parse everything sent so far, as a collector would.
        pub fn messages(&self) -> Vec<Value> {
            decode_all(&self.datagrams())
        }
    }

    impl Transport for RecordingTransport {
        fn send(&self, buf: &[u8]) -> Result<usize> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            let failing = self
                .fail_next
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                return Err(Error::Network {
                    source: std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        "simulated failure",
                    ),
                    back: Backtrace::new(),
                });
            }
            self.sent.lock().unwrap().push(buf.to_vec());
            Ok(buf.len())
        }
    }

    pub fn decode_all(datagrams: &[Vec<u8>]) -> Vec<Value> {
        let mut out = Vec::new();
        let mut pending: Vec<ChunkFrame> = Vec::new();
        for dgram in datagrams {
            match ChunkFrame::parse(dgram) {
                Some(frame) => pending.push(frame),
                None => out.push(serde_json::from_slice(&decompress(dgram).unwrap()).unwrap()),
            }
        }
        // chunks of concurrent messages may interleave
        let mut ids = Vec::new();
        for frame in &pending {
            if !ids.contains(&frame.message_id) {
                ids.push(frame.message_id);
            }
        }
        for id in ids {
            let frames: Vec<ChunkFrame> = pending
                .iter()
                .filter(|f| f.message_id == id)
                .cloned()
                .collect();
            let payload = reassemble(&frames).unwrap();
            out.push(serde_json::from_slice(&decompress(&payload).unwrap()).unwrap());
        }
        out
    }
}
