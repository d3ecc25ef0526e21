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

//! Test sending GELF to port 12201 on the local host (or wherever `GELF_HOST` & `GELF_PORT`
//! point).

use tracing::{debug, error, info, trace, warn};
use tracing_gelf_udp::{
    config::Config,
    layer::Layer,
    publish::{last_undelivered, undelivered_count},
};
use tracing_subscriber::{
    layer::SubscriberExt, // Needed to get `with()`
    registry::Registry,
};

pub fn main() {
    // Setup the real subsriber...
    let config = Config::from_env().unwrap();
    let subscriber = Registry::default().with(Layer::from_config(&config).unwrap());
    // and install it.
    let _guard = tracing::subscriber::set_default(subscriber);

    trace!("Hello, 世界!");
    debug!("Hello, 世界!");
    info!(Notes = "greeting", "Hello, 世界!");
    warn!("Hello, 世界!");
    let err = "x1".parse::<u32>().unwrap_err();
    error!(error = &err as &(dyn std::error::Error + 'static), "Hello, 世界!");

    // Large enough, even gzipped, to need several chunks
    let big: String = (0..40_000u64)
        .map(|i| format!("{:x}", i.wrapping_mul(0x9e37_79b9_7f4a_7c15)))
        .collect();
    info!("{}", big);

    if undelivered_count() > 0 {
        eprintln!("{} message(s) could not be delivered", undelivered_count());
        if let Some(lost) = last_undelivered() {
            eprintln!("last: {}", lost);
        }
        std::process::exit(1);
    }
}
