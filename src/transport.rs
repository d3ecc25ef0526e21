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

//! The GELF transport layer.
//!
//! This module defines the [`Transport`] trait that all implementations must support, as well as
//! the UDP implementation.
//!
//! # Examples
//!
//! To send GELF messages over UDP to a collector listening on port 12201 (the default) on
//! localhost:
//!
//! ```rust
//! use tracing_gelf_udp::transport::UdpTransport;
//! let transpo = UdpTransport::local().unwrap();
//! ```
//!
//! On a non-standard port on another host:
//!
//! ```rust
//! use tracing_gelf_udp::transport::UdpTransport;
//! let transpo = UdpTransport::new("some-host.domain.invalid:12202");
//! assert!(transpo.is_err()); // no such host, after all
//! ```

use crate::error::{Error, Result};

use backtrace::Backtrace;

use std::{
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket},
    time::Duration,
};

/// The standard GELF UDP port
pub const DEFAULT_PORT: u16 = 12201;
/// Where messages go when nothing else has been configured
pub const DEFAULT_HOST: &str = "127.0.0.1";

fn network_err(err: std::io::Error) -> Error {
    Error::Network {
        source: err,
        back: Backtrace::new(),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                      transport mechanisms                                      //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Operations all transport layers must support.
///
/// Implementations are shared between every thread that logs, so `send` takes `&self` and must be
/// safe to call concurrently.
pub trait Transport: Send + Sync {
    /// Send one datagram. No acknowledgement is expected; `Ok` means the datagram was handed to
    /// the operating system.
    fn send(&self, buf: &[u8]) -> Result<usize>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, buf: &[u8]) -> Result<usize> {
        (**self).send(buf)
    }
}

/// Sending GELF messages via UDP datagrams.
///
/// One socket is opened up-front & reused for every message. Each `send` is a single `send(2)` of
/// a complete datagram, which the kernel performs atomically, so concurrent callers need no
/// further synchronization; chunks of different messages may interleave on the wire, which is
/// fine since the collector reassembles by message id.
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl UdpTransport {
    /// Construct a [`Transport`] implementation via UDP at `addr`.
    pub fn new<A: ToSocketAddrs>(addr: A) -> Result<UdpTransport> {
        let peer = addr
            .to_socket_addrs()
            .map_err(network_err)?
            .next()
            .ok_or_else(|| {
                network_err(std::io::Error::new(
                    std::io::ErrorKind::AddrNotAvailable,
                    "the collector address resolved to nothing",
                ))
            })?;
        // Bind to any available port on an interface of the right family...
        let local: SocketAddr = match peer {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local).map_err(network_err)?;
        // and connect to the collector at `peer`:
        socket.connect(peer).map_err(network_err)?;
        Ok(UdpTransport { socket, peer })
    }
    /// Construct a [`Transport`] implementation via UDP at `host`:`port`.
    pub fn with_host_and_port(host: &str, port: u16) -> Result<UdpTransport> {
        UdpTransport::new((host, port))
    }
    /// Construct a [`Transport`] implementation via UDP at 127.0.0.1:12201
    pub fn local() -> Result<UdpTransport> {
        UdpTransport::with_host_and_port(DEFAULT_HOST, DEFAULT_PORT)
    }
    /// Bound the time a single send may block; `None` blocks indefinitely.
    pub fn send_timeout(self, timeout: Option<Duration>) -> Result<UdpTransport> {
        self.socket.set_write_timeout(timeout).map_err(network_err)?;
        Ok(self)
    }
    /// The collector's address
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

impl Transport for UdpTransport {
    fn send(&self, buf: &[u8]) -> Result<usize> {
        self.socket.send(buf).map_err(network_err)
    }
}
