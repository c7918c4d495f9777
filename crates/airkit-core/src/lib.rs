//! Bridge pipeline between a text metrics feed and a smart-home accessory.
//!
//! This crate implements the repeating poll cycle that keeps an accessory's
//! characteristics in sync with an environmental sensor exposed as an HTTP
//! metrics feed:
//!
//! fetch → parse → aggregate → classify → publish, once per configured
//! interval, forever.
//!
//! # Design
//!
//! - **Fetcher** ([`SensorClient`]): one best-effort GET per cycle, no
//!   retries; the next cycle is the retry policy.
//! - **Parser** ([`parse_metrics`]): extracts `(metric, value)` pairs from
//!   lines starting with a known metric name.
//! - **Aggregator** ([`Aggregator`]): last-known-good cache; a metric absent
//!   from one fetch keeps its previous value.
//! - **Classifier** ([`co2_detected`]): reduces the CO2 level to the binary
//!   detected characteristic at the 850 ppm boundary.
//! - **Publisher** ([`publish`] via [`AccessorySink`]): fire-and-forget
//!   writes into the transport's characteristic store.
//! - **Scheduler** ([`Bridge`]): drives the above on a single background
//!   task until told to stop.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use airkit_core::{Bridge, BridgeConfig, MockSink};
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() {
//!     let sink = Arc::new(MockSink::new());
//!     let bridge = Bridge::new(BridgeConfig::default(), Arc::clone(&sink));
//!
//!     let (_stop_tx, stop_rx) = watch::channel(false);
//!     bridge.run(stop_rx).await;
//! }
//! ```

pub mod accessory;
pub mod bridge;
pub mod error;
pub mod fetch;
pub mod mock;
pub mod parse;
pub mod readings;
pub mod thresholds;

pub use accessory::{AccessorySink, CHARACTERISTIC_STEP, publish};
pub use bridge::{Bridge, BridgeConfig};
pub use error::{Error, Result};
pub use fetch::{MetricsSource, SensorClient};
pub use mock::{MockSink, MockSource};
pub use parse::{parse_line, parse_metrics};
pub use readings::Aggregator;
pub use thresholds::{CO2_ALERT_PPM, co2_detected};

// Re-export from airkit-types
pub use airkit_types::{AccessoryState, Metric, Reading, ReadingSet};
