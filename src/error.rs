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

//! [tracing-gelf-udp](crate) errors

use backtrace::Backtrace;

/// [tracing-gelf-udp](crate) error type
///
/// I've chosen to eschew libraries like [thiserror] & [anyhow] in favor of a straightforward
/// enumeration with a few match arms chosen on the basis of what the caller will need to respond.
/// Every variant carries the [`Backtrace`] at which it was created; the `Debug` implementation
/// renders it, which is what ends up in the `_Exception` field of a fallback message.
///
/// [thiserror]: https://docs.rs/thiserror
/// [anyhow]: https://docs.rs/anyhow
#[non_exhaustive]
pub enum Error {
    /// A GELF message could not be encoded as JSON
    Serialization {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
    /// The compression codec failed
    Compression {
        source: std::io::Error,
        back: Backtrace,
    },
    /// The payload would need more than 128 chunks
    ChunkOverflow {
        len: usize,
        chunk_size: usize,
        count: usize,
        back: Backtrace,
    },
    /// Socket creation, address resolution or send failure
    Network {
        source: std::io::Error,
        back: Backtrace,
    },
    /// A chunk size of zero, or one that would not fit in a UDP datagram
    BadChunkSize { size: usize, back: Backtrace },
    /// Additional field names must match `^[\w\.\-]+$` & may not be `id`
    BadFieldName { name: String, back: Backtrace },
    /// An environment variable held an unusable value
    BadConfig {
        name: &'static str,
        value: String,
        back: Backtrace,
    },
}

impl Error {
    /// The variant name; used as the exception type when an error is reported as a GELF message.
    // `Error` is non-exhaustive; see the comment on `Display`.
    #[allow(unreachable_patterns)]
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Serialization { .. } => "Serialization",
            Error::Compression { .. } => "Compression",
            Error::ChunkOverflow { .. } => "ChunkOverflow",
            Error::Network { .. } => "Network",
            Error::BadChunkSize { .. } => "BadChunkSize",
            Error::BadFieldName { .. } => "BadFieldName",
            Error::BadConfig { .. } => "BadConfig",
            _ => "Other",
        }
    }

    fn backtrace(&self) -> &Backtrace {
        match self {
            Error::Serialization { back, .. }
            | Error::Compression { back, .. }
            | Error::ChunkOverflow { back, .. }
            | Error::Network { back, .. }
            | Error::BadChunkSize { back, .. }
            | Error::BadFieldName { back, .. }
            | Error::BadConfig { back, .. } => back,
        }
    }
}

impl std::fmt::Display for Error {
    // `Error` is non-exhaustive so that adding variants won't be a breaking change to our
    // callers. That means the compiler won't catch us if we miss a variant here, so we
    // always include a `_` arm.
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Serialization { source, .. } => {
                write!(f, "While serializing a GELF message, got {}", source)
            }
            Error::Compression { source, .. } => {
                write!(f, "While compressing a GELF message, got {}", source)
            }
            Error::ChunkOverflow {
                len,
                chunk_size,
                count,
                ..
            } => write!(
                f,
                "A {} byte payload needs {} chunks of {} bytes; GELF allows at most 128",
                len, count, chunk_size
            ),
            Error::Network { source, .. } => write!(f, "Transport error: {}", source),
            Error::BadChunkSize { size, .. } => {
                write!(f, "{} is not a usable GELF chunk size", size)
            }
            Error::BadFieldName { name, .. } => {
                write!(f, "{:?} is not a valid GELF additional field name", name)
            }
            Error::BadConfig { name, value, .. } => {
                write!(f, "Environment variable {} has unusable value {:?}", name, value)
            }
            _ => write!(f, "Other tracing-gelf-udp error"),
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}\n{:?}", self, self.backtrace())
    }
}

impl std::error::Error for Error {
    // `Error` is non-exhaustive; see the comment on `Display`.
    #[allow(unreachable_patterns)]
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Serialization { source, .. } => Some(source.as_ref()),
            Error::Compression { source, .. } => Some(source),
            Error::Network { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
