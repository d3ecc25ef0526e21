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

//! Chunked GELF framing.
//!
//! A payload too large for one datagram is split into at most 128 chunks, each prefixed with a
//! twelve byte header:
//!
//! ```text
//!  0      2                      10     11     12
//! +------+----------------------+------+------+--------------------+
//! | 1e0f |  message id (8 bytes) | seq  | cnt  | payload ...        |
//! +------+----------------------+------+------+--------------------+
//! ```
//!
//! The collector buffers chunks by message id until it has all `cnt` of them, then concatenates
//! their payloads in `seq` order. Chunks may arrive in any order (or not at all; the collector
//! discards incomplete sets after a timeout).

use crate::error::{Error, Result};

use backtrace::Backtrace;
use bytes::{Buf, BufMut};

/// Marks a datagram as one chunk of a larger message
pub const CHUNK_MAGIC: [u8; 2] = [0x1e, 0x0f];
pub const CHUNK_HEADER_SIZE: usize = 12;
/// The protocol's ceiling on chunks per message
pub const MAX_CHUNKS: usize = 128;
/// Default payload bytes per chunk (header excluded)
pub const DEFAULT_CHUNK_SIZE: usize = 8192;
/// Largest chunk payload that still fits in one IPv4 UDP datagram with its header
pub const MAX_CHUNK_SIZE: usize = 65_507 - CHUNK_HEADER_SIZE;

/// Eight bytes identifying all the chunks of one message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId([u8; 8]);

impl MessageId {
    /// A fresh id drawn from the thread-local CSPRNG.
    ///
    /// Ids must not repeat within a collector's reassembly window, or chunks of two messages get
    /// mixed; 64 random bits make that vanishingly unlikely even under heavy concurrent logging.
    pub fn generate() -> MessageId {
        MessageId(rand::random())
    }
    pub fn from_bytes(bytes: [u8; 8]) -> MessageId {
        MessageId(bytes)
    }
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

/// One chunk of a chunked message, borrowing its payload from the full serialized message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkFrame<'a> {
    pub message_id: MessageId,
    pub sequence_index: u8,
    pub sequence_count: u8,
    pub payload: &'a [u8],
}

impl<'a> ChunkFrame<'a> {
    /// Lay this chunk out as a datagram.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(CHUNK_HEADER_SIZE + self.payload.len());
        buf.put_slice(&CHUNK_MAGIC);
        buf.put_slice(self.message_id.as_bytes());
        buf.put_u8(self.sequence_index);
        buf.put_u8(self.sequence_count);
        buf.put_slice(self.payload);
        buf
    }

    /// Read a datagram as a chunk, the way a collector would. Returns `None` if `datagram` doesn't
    /// carry the chunk magic or has an impossible header.
    pub fn parse(datagram: &'a [u8]) -> Option<ChunkFrame<'a>> {
        if datagram.len() < CHUNK_HEADER_SIZE || datagram[..2] != CHUNK_MAGIC {
            return None;
        }
        let mut buf = &datagram[2..];
        let mut id = [0u8; 8];
        buf.copy_to_slice(&mut id);
        let sequence_index = buf.get_u8();
        let sequence_count = buf.get_u8();
        if sequence_count == 0
            || sequence_index >= sequence_count
            || sequence_count as usize > MAX_CHUNKS
        {
            return None;
        }
        Some(ChunkFrame {
            message_id: MessageId(id),
            sequence_index,
            sequence_count,
            payload: buf,
        })
    }
}

/// Check that `size` payload bytes per chunk is usable.
pub fn validate_chunk_size(size: usize) -> Result<usize> {
    if size == 0 || size > MAX_CHUNK_SIZE {
        Err(Error::BadChunkSize {
            size,
            back: Backtrace::new(),
        })
    } else {
        Ok(size)
    }
}

/// Split `bytes` into chunks of `chunk_size` payload bytes under a fresh [`MessageId`].
///
/// Every chunk but the last carries exactly `chunk_size` bytes; the last carries the remainder (a
/// full `chunk_size` when `bytes.len()` divides evenly). Empty input yields no chunks. Fails with
/// [`Error::ChunkOverflow`] if more than [`MAX_CHUNKS`] would be needed.
pub fn chunk(bytes: &[u8], chunk_size: usize) -> Result<Vec<ChunkFrame<'_>>> {
    let chunk_size = validate_chunk_size(chunk_size)?;
    let count = (bytes.len() + chunk_size - 1) / chunk_size;
    if count > MAX_CHUNKS {
        return Err(Error::ChunkOverflow {
            len: bytes.len(),
            chunk_size,
            count,
            back: Backtrace::new(),
        });
    }

    let message_id = MessageId::generate();
    Ok(bytes
        .chunks(chunk_size)
        .enumerate()
        .map(|(idx, payload)| ChunkFrame {
            message_id,
            // `count <= 128`, so both fit in a `u8`
            sequence_index: idx as u8,
            sequence_count: count as u8,
            payload,
        })
        .collect())
}

/// What actually goes on the wire for one message.
#[derive(Debug, PartialEq, Eq)]
pub enum Datagrams<'a> {
    /// The payload fits in one datagram & is sent without framing
    Single(&'a [u8]),
    Chunked(Vec<ChunkFrame<'a>>),
}

impl<'a> Datagrams<'a> {
    pub fn len(&self) -> usize {
        match self {
            Datagrams::Single(_) => 1,
            Datagrams::Chunked(frames) => frames.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Send `bytes` as-is when it is no larger than `chunk_size`; chunk it otherwise.
pub fn maybe_chunk(bytes: &[u8], chunk_size: usize) -> Result<Datagrams<'_>> {
    let chunk_size = validate_chunk_size(chunk_size)?;
    if bytes.len() <= chunk_size {
        Ok(Datagrams::Single(bytes))
    } else {
        chunk(bytes, chunk_size).map(Datagrams::Chunked)
    }
}

/// Put a full set of chunks back together, in whatever order they're given. Returns `None` if any
/// are missing, duplicated, or belong to another message.
pub fn reassemble(frames: &[ChunkFrame<'_>]) -> Option<Vec<u8>> {
    let first = frames.first()?;
    if frames.len() != first.sequence_count as usize {
        return None;
    }
    let mut ordered: Vec<Option<&ChunkFrame>> = vec![None; frames.len()];
    for frame in frames {
        if frame.message_id != first.message_id || frame.sequence_count != first.sequence_count {
            return None;
        }
        let slot = ordered.get_mut(frame.sequence_index as usize)?;
        if slot.replace(frame).is_some() {
            return None;
        }
    }
    Some(
        ordered
            .into_iter()
            .flatten()
            .flat_map(|frame| frame.payload.iter().copied())
            .collect(),
    )
}
