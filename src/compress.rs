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

//! Payload compression.
//!
//! GELF collectors sniff the first two bytes of a (reassembled) payload to decide how to read it:
//! `1f 8b` is gzip, `78 xx` (with a valid zlib header checksum) is zlib, anything else is taken to
//! be raw JSON. This crate only ever _produces_ gzip, but [`decompress`] understands all three so
//! that tests can read back what a collector would.

use crate::error::{Error, Result};

use backtrace::Backtrace;
use libflate::{gzip, zlib};
use serde::Deserialize;

use std::io::{Read, Write};

const MAGIC_GZIP: [u8; 2] = [0x1f, 0x8b];
const MAGIC_ZLIB: u8 = 0x78;

/// Compression policy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    /// Send serialized JSON as-is
    None,
    /// Gzip every payload of at least `min_size` bytes; smaller ones go out raw
    Gzip { min_size: usize },
}

impl std::default::Default for Compression {
    /// Gzip everything.
    fn default() -> Self {
        Compression::Gzip { min_size: 0 }
    }
}

impl Compression {
    /// Apply this policy to `bytes`.
    pub fn apply(&self, bytes: Vec<u8>) -> Result<Vec<u8>> {
        match self {
            Compression::Gzip { min_size } if bytes.len() >= *min_size => compress(&bytes),
            _ => Ok(bytes),
        }
    }
}

fn codec_err(err: std::io::Error) -> Error {
    Error::Compression {
        source: err,
        back: Backtrace::new(),
    }
}

/// Gzip `bytes`.
pub fn compress(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = gzip::Encoder::new(Vec::with_capacity(bytes.len() / 2 + 32)).map_err(codec_err)?;
    encoder.write_all(bytes).map_err(codec_err)?;
    encoder.finish().into_result().map_err(codec_err)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Detected {
    Gzip,
    Zlib,
    Raw,
}

fn detect(bytes: &[u8]) -> Detected {
    match bytes {
        [a, b, ..] if [*a, *b] == MAGIC_GZIP => Detected::Gzip,
        [a, b, ..] if *a == MAGIC_ZLIB && ((u16::from(*a) << 8) + u16::from(*b)) % 31 == 0 => {
            Detected::Zlib
        }
        _ => Detected::Raw,
    }
}

/// The receiving side's inverse of [`compress`]: gunzip (or inflate) `bytes` if they look
/// compressed, else hand them back unchanged.
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match detect(bytes) {
        Detected::Gzip => {
            gzip::Decoder::new(bytes)
                .and_then(|mut decoder| decoder.read_to_end(&mut out))
                .map_err(codec_err)?;
        }
        Detected::Zlib => {
            zlib::Decoder::new(bytes)
                .and_then(|mut decoder| decoder.read_to_end(&mut out))
                .map_err(codec_err)?;
        }
        Detected::Raw => out.extend_from_slice(bytes),
    }
    Ok(out)
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn round_trip() {
        let inputs: [&[u8]; 4] = [
            b"",
            b"{\"short_message\":\"hi\"}",
            "Hello, 世界!".as_bytes(),
            &[0u8, 1, 2, 254, 255, 0x1f, 0x8b],
        ];
        for x in inputs.iter() {
            let packed = compress(x).unwrap();
            assert_eq!(&packed[..2], &MAGIC_GZIP);
            assert_eq!(&decompress(&packed).unwrap()[..], *x);
        }

        let big: Vec<u8> = (0..100_000u32).map(|i| (i * 7 % 251) as u8).collect();
        assert_eq!(decompress(&compress(&big).unwrap()).unwrap(), big);
    }

    #[test]
    fn raw_json_passes_through() {
        let json = b"{\"version\":\"1.1\"}";
        assert_eq!(decompress(json).unwrap(), json.to_vec());
        assert_eq!(decompress(b"").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn zlib_is_understood() {
        let mut encoder = zlib::Encoder::new(Vec::new()).unwrap();
        encoder.write_all(b"Hello World!").unwrap();
        let packed = encoder.finish().into_result().unwrap();
        assert_eq!(decompress(&packed).unwrap(), b"Hello World!".to_vec());
    }

    #[test]
    fn truncated_gzip_is_an_error() {
        let packed = compress(&[42u8; 4096]).unwrap();
        let err = decompress(&packed[..packed.len() / 2]).unwrap_err();
        assert_eq!(err.kind(), "Compression");
    }

    #[test]
    fn policies() {
        let payload = b"0123456789".to_vec();
        assert_eq!(Compression::None.apply(payload.clone()).unwrap(), payload);
        assert_eq!(
            Compression::Gzip { min_size: 11 }.apply(payload.clone()).unwrap(),
            payload
        );
        let packed = Compression::Gzip { min_size: 10 }.apply(payload.clone()).unwrap();
        assert_eq!(&packed[..2], &MAGIC_GZIP);
        let packed = Compression::default().apply(Vec::new()).unwrap();
        assert_eq!(&packed[..2], &MAGIC_GZIP);
    }
}
