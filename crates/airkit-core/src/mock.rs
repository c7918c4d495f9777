//! Mock sink and source implementations for testing.
//!
//! [`MockSink`] records characteristic writes so tests can assert on exactly
//! what a cycle published; [`MockSource`] replays a scripted sequence of feed
//! bodies and failures so the bridge loop can run without a network.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use airkit_types::AccessoryState;

use crate::accessory::AccessorySink;
use crate::error::{Error, Result};
use crate::fetch::MetricsSource;

/// An accessory sink that records every write into an [`AccessoryState`].
///
/// # Example
///
/// ```
/// use airkit_core::{AccessorySink, MockSink};
///
/// #[tokio::main]
/// async fn main() {
///     let sink = MockSink::new();
///     sink.set_co2_level(912.0).await;
///     assert_eq!(sink.state().await.co2_level, 912.0);
/// }
/// ```
#[derive(Debug, Default)]
pub struct MockSink {
    state: RwLock<AccessoryState>,
    writes: AtomicU32,
}

impl MockSink {
    /// Create a sink with all characteristics at their defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub async fn state(&self) -> AccessoryState {
        self.state.read().await.clone()
    }

    /// Total number of characteristic writes received.
    #[must_use]
    pub fn write_count(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessorySink for MockSink {
    async fn set_temperature(&self, value: f64, step: f64) {
        let mut state = self.state.write().await;
        state.temperature = value;
        state.temperature_step = step;
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    async fn set_humidity(&self, value: f64, step: f64) {
        let mut state = self.state.write().await;
        state.humidity = value;
        state.humidity_step = step;
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    async fn set_co2_level(&self, value: f64) {
        self.state.write().await.co2_level = value;
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    async fn set_co2_detected(&self, detected: bool) {
        self.state.write().await.co2_detected = detected;
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

/// A metrics source that replays scripted responses.
///
/// Responses are consumed front to back; once the script is exhausted every
/// further fetch returns an empty body (which parses to nothing, leaving the
/// aggregator stale).
#[derive(Debug, Default)]
pub struct MockSource {
    responses: Mutex<VecDeque<Result<String>>>,
}

impl MockSource {
    /// Create a source with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful fetch returning `body`.
    pub fn push_body(&self, body: impl Into<String>) {
        self.responses
            .lock()
            .expect("mock script lock poisoned")
            .push_back(Ok(body.into()));
    }

    /// Queue a failed fetch.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.responses
            .lock()
            .expect("mock script lock poisoned")
            .push_back(Err(Error::Unavailable(message.into())));
    }
}

#[async_trait]
impl MetricsSource for MockSource {
    async fn fetch(&self) -> Result<String> {
        self.responses
            .lock()
            .expect("mock script lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }

    fn endpoint(&self) -> &str {
        "mock://feed"
    }
}
