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

//! [tracing-gelf-udp](crate) [`Layer`] implementation.
//!
//! [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
//!
//! [`Layer`] is parameterized by its [`Transport`]; [`UdpTransport`] is what you want outside of
//! tests.

use crate::{
    chunk::DEFAULT_CHUNK_SIZE,
    compress::Compression,
    config::Config,
    error::Result,
    event::record_from_event,
    facility::{Facility, Level, LogLevel},
    host::FixedHostname,
    publish::Publisher,
    translate::Translator,
    transport::{Transport, UdpTransport},
};

use tracing::Event;
use tracing_subscriber::layer::Context;

// When the tracing-log feature is enabled, use NormalizeEvent to recover the original target of
// events that originated from the `log` crate.
#[cfg(feature = "tracing-log")]
use tracing_log::NormalizeEvent;

use std::{net::ToSocketAddrs, time::Duration};

/// Events emitted by this crate (about its own troubles) are not themselves sent as GELF. Those
/// raised from within `on_event` never get this far (`tracing` drops events emitted during a
/// dispatch); the ones that do come from a [`Publisher`] used directly.
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(OWN_TARGET)
        .map_or(false, |rest| rest.is_empty() || rest.starts_with("::"))
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                          struct Layer                                          //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A [`tracing-subscriber`]-compliant [`Layer`] implementation that will send [`Event`]s to a GELF
/// collector.
///
/// Every event is published synchronously on the thread that emitted it; the [`Layer`] holds no
/// queue & no background worker.
///
/// [`tracing-subscriber`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/index.html
/// [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
/// [`Event`]: https://docs.rs/tracing/0.1.35/tracing/struct.Event.html
pub struct Layer<T: Transport = UdpTransport> {
    publisher: Publisher<T>,
}

impl Layer<UdpTransport> {
    /// Attempt to construct a [`Layer`] that will send gzipped GELF messages via UDP to port 12201
    /// on localhost
    pub fn try_default() -> Result<Self> {
        Layer::from_config(&Config::default())
    }
    /// Construct a [`Layer`] as described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Layer::builder()
            .compression(config.compression)
            .chunk_size(config.chunk_size)
            .send_timeout(config.send_timeout_ms.map(Duration::from_millis))
            .promote_all_properties(config.promote_all_properties);
        if let Some(facility) = &config.facility {
            builder = builder.facility(facility.as_str());
        }
        builder.build_udp((config.host.as_str(), config.port))
    }
    pub fn builder() -> LayerBuilder {
        LayerBuilder::default()
    }
}

impl<T: Transport> Layer<T> {
    /// Construct a Layer that will send GELF messages, with default settings, via `transport`
    pub fn with_transport(transport: T) -> Self {
        Layer {
            publisher: Publisher::new(Translator::default(), transport),
        }
    }
    pub fn publisher(&self) -> &Publisher<T> {
        &self.publisher
    }
}

/// Fluent construction of a [`Layer`]
pub struct LayerBuilder {
    translator: Translator,
    compression: Compression,
    chunk_size: usize,
    send_timeout: Option<Duration>,
}

impl std::default::Default for LayerBuilder {
    fn default() -> Self {
        LayerBuilder {
            translator: Translator::default(),
            compression: Compression::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            send_timeout: None,
        }
    }
}

impl LayerBuilder {
    pub fn facility<S: Into<String>>(mut self, facility: S) -> Self {
        self.translator = self.translator.facility(Facility::new(facility));
        self
    }
    /// Report `hostname` rather than the one the system reports
    pub fn hostname<S: Into<String>>(mut self, hostname: S) -> Self {
        self.translator = self.translator.hostname(FixedHostname(hostname.into()));
        self
    }
    pub fn map_level<F>(mut self, map_level: F) -> Self
    where
        F: Fn(LogLevel) -> Level + Send + Sync + 'static,
    {
        self.translator = self.translator.map_level(map_level);
        self
    }
    pub fn promote_property<S: Into<String>>(mut self, name: S) -> Self {
        self.translator = self.translator.promote_property(name);
        self
    }
    pub fn promote_all_properties(mut self, promote_all: bool) -> Self {
        self.translator = self.translator.promote_all_properties(promote_all);
        self
    }
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }
    /// Payload bytes per chunk; validated when the [`Layer`] is built
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
    /// Only meaningful for [`build_udp`](LayerBuilder::build_udp)
    pub fn send_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.send_timeout = timeout;
        self
    }
    /// Build a [`Layer`] sending to the collector at `addr` over UDP
    pub fn build_udp<A: ToSocketAddrs>(self, addr: A) -> Result<Layer<UdpTransport>> {
        let transport = UdpTransport::new(addr)?.send_timeout(self.send_timeout)?;
        self.build_with_transport(transport)
    }
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Result<Layer<T>> {
        Ok(Layer {
            publisher: Publisher::new(self.translator, transport)
                .compression(self.compression)
                .chunk_size(self.chunk_size)?,
        })
    }
}

/// The [`Layer`] implementation proper.
///
/// [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
impl<S, T> tracing_subscriber::layer::Layer<S> for Layer<T>
where
    S: tracing::Subscriber,
    T: Transport + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // For events bridged from the `log` crate, normalized_metadata() has the original target;
        // for native tracing events it returns None & we use the event's own metadata.
        #[cfg(feature = "tracing-log")]
        let normalized_meta = event.normalized_metadata();
        #[cfg(feature = "tracing-log")]
        let meta = normalized_meta.as_ref().unwrap_or_else(|| event.metadata());
        #[cfg(not(feature = "tracing-log"))]
        let meta = event.metadata();

        if is_own_target(meta.target()) {
            return;
        }

        // Failures are handled (and counted) by the publisher; nothing to do with the outcome.
        let _ = self
            .publisher
            .publish(&record_from_event(event, meta.target(), meta.level()));
    }
}

#[cfg(test)]
mod smoke {

    use super::*;

    use crate::publish::test_support::{decode_all, RecordingTransport};

    use tracing_subscriber::layer::SubscriberExt; // Needed to get `with()`

    use std::sync::Arc;

    fn layer(transpo: Arc<RecordingTransport>) -> Layer<Arc<RecordingTransport>> {
        Layer::builder()
            .hostname("bree.local")
            .facility("billing")
            .build_with_transport(transpo)
            .unwrap()
    }

    #[test]
    fn own_target() {
        assert!(is_own_target("tracing_gelf_udp"));
        assert!(is_own_target("tracing_gelf_udp::publish"));
        assert!(!is_own_target("tracing_gelf_udp_extras"));
        assert!(!is_own_target("app"));
    }

    #[test]
    fn events_are_published() {
        let transpo = Arc::new(RecordingTransport::default());
        let subscriber =
            tracing_subscriber::registry::Registry::default().with(layer(Arc::clone(&transpo)));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "app", Notes = "maintenance", "Hello, world!");
            tracing::debug!(target: "app", "{}", "y".repeat(300));
            // Not forwarded: this crate's own diagnostics
            tracing::error!(target: "tracing_gelf_udp::publish", "internal");
        });

        let msgs = transpo.messages();
        assert_eq!(msgs.len(), 2);

        assert_eq!(msgs[0]["short_message"], "Hello, world!");
        assert_eq!(msgs[0]["host"], "bree.local");
        assert_eq!(msgs[0]["facility"], "billing");
        assert_eq!(msgs[0]["level"], 6);
        assert_eq!(msgs[0]["_Notes"], "maintenance");
        assert_eq!(msgs[0]["_Logger"], "app");

        assert_eq!(msgs[1]["level"], 7);
        assert_eq!(msgs[1]["short_message"].as_str().unwrap().len(), 249);
        assert_eq!(msgs[1]["full_message"].as_str().unwrap().len(), 300);
        assert!(msgs[1].get("_ExceptionType").is_none());
    }

    #[test]
    fn failures_never_reach_the_caller() {
        let transpo = Arc::new(RecordingTransport::failing(1));
        let subscriber =
            tracing_subscriber::registry::Registry::default().with(layer(Arc::clone(&transpo)));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "app", "lost");
        });
        let msgs = decode_all(&transpo.datagrams());
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0]["level"], 0);
        assert_eq!(msgs[0]["_ExceptionType"], "Network");
    }

    /// Remembers the target of every event it sees.
    struct Targets(Arc<std::sync::Mutex<Vec<String>>>);

    impl<S: tracing::Subscriber> tracing_subscriber::layer::Layer<S> for Targets {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            self.0
                .lock()
                .unwrap()
                .push(event.metadata().target().to_owned());
        }
    }

    #[test]
    fn lost_records_are_remembered() {
        let before = crate::publish::undelivered_count();
        let seen = Arc::new(std::sync::Mutex::new(Vec::<String>::new()));
        let transpo = Arc::new(RecordingTransport::failing(2));
        let subscriber = tracing_subscriber::registry::Registry::default()
            .with(layer(Arc::clone(&transpo)))
            .with(Targets(Arc::clone(&seen)));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "app", "lost");
        });

        assert!(transpo.datagrams().is_empty());
        assert!(crate::publish::undelivered_count() > before);
        let lost = crate::publish::last_undelivered().unwrap();
        assert!(lost.first.contains("simulated failure"));
        // The publisher's own `error!` was raised mid-dispatch, so no layer ever sees it
        assert_eq!(*seen.lock().unwrap(), vec!["app".to_owned()]);
    }

    #[test]
    fn direct_publisher_diagnostics_are_not_forwarded() {
        let transpo = Arc::new(RecordingTransport::default());
        let seen = Arc::new(std::sync::Mutex::new(Vec::<String>::new()));
        let subscriber = tracing_subscriber::registry::Registry::default()
            .with(layer(Arc::clone(&transpo)))
            .with(Targets(Arc::clone(&seen)));
        let direct = Publisher::new(Translator::default(), RecordingTransport::failing(2));
        tracing::subscriber::with_default(subscriber, || {
            direct.publish(&crate::record::LogRecord::new(LogLevel::Info, "gone"));
        });
        // The sibling layer heard about it; the GELF layer did not forward it
        assert!(seen
            .lock()
            .unwrap()
            .iter()
            .any(|t| t == "tracing_gelf_udp::publish"));
        assert!(transpo.datagrams().is_empty());
    }

    #[test]
    fn bad_chunk_size_is_rejected() {
        let err = Layer::builder()
            .chunk_size(0)
            .build_with_transport(RecordingTransport::default())
            .err()
            .unwrap();
        assert_eq!(err.kind(), "BadChunkSize");
    }

    #[test]
    fn udp_end_to_end() {
        let collector = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        collector
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let config = Config {
            port: collector.local_addr().unwrap().port(),
            facility: Some("e2e".to_owned()),
            chunk_size: 1024,
            ..Config::default()
        };
        let subscriber =
            tracing_subscriber::registry::Registry::default().with(Layer::from_config(&config).unwrap());
        // enough text that the gzipped payload still needs several chunks
        let text: String = (0..20_000u32)
            .map(|i| char::from(b'a' + ((i * 7919 % 26) as u8)))
            .collect::<String>()
            + &format!("{:?}", (0..3000u32).map(|i| i.wrapping_mul(2_654_435_761)).collect::<Vec<_>>());
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "app", "{}", text);
        });

        let mut dgrams = Vec::new();
        let mut buf = vec![0u8; 65_536];
        loop {
            let n = collector.recv(&mut buf).unwrap();
            dgrams.push(buf[..n].to_vec());
            match crate::chunk::ChunkFrame::parse(&dgrams[0]) {
                Some(first) if dgrams.len() < first.sequence_count as usize => continue,
                _ => break,
            }
        }
        let msgs = decode_all(&dgrams);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0]["facility"], "e2e");
        assert_eq!(msgs[0]["level"], 3);
        assert_eq!(msgs[0]["full_message"], text.as_str());
    }
}
