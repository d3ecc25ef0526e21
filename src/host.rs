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

//! Where the GELF `host` field comes from.

use lazy_static::lazy_static;

/// Something that can name this host.
pub trait HostnameProvider: Send + Sync {
    fn hostname(&self) -> String;
}

lazy_static! {
    // A process's hostname doesn't change over its lifetime; resolve it once.
    static ref SYSTEM_HOSTNAME: String = discover_hostname();
}

/// Attempt to figure-out a name for this host.
///
/// First try [gethostname()]; failing that (or if the result isn't valid UTF-8), fall back to a
/// local IP address, and failing _that_ to "localhost". Never fails.
///
/// [gethostname()]: https://man7.org/linux/man-pages/man2/gethostname.2.html
fn discover_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|hn| hn.into_string().ok())
        .filter(|hn| !hn.is_empty())
        .or_else(|| local_ip_address::local_ip().ok().map(|ip| ip.to_string()))
        .unwrap_or_else(|| "localhost".to_owned())
}

/// The operating system's notion of this host's name, cached process-wide.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemHostname;

impl HostnameProvider for SystemHostname {
    fn hostname(&self) -> String {
        SYSTEM_HOSTNAME.clone()
    }
}

/// A hostname fixed at configuration time.
#[derive(Clone, Debug)]
pub struct FixedHostname(pub String);

impl HostnameProvider for FixedHostname {
    fn hostname(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn system_hostname_is_stable() {
        let a = SystemHostname.hostname();
        let b = SystemHostname.hostname();
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn fixed_hostname() {
        assert_eq!(FixedHostname("bree.local".to_owned()).hostname(), "bree.local");
    }
}
