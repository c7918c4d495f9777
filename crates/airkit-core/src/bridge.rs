//! The periodic fetch → parse → aggregate → classify → publish loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use crate::accessory::{AccessorySink, publish};
use crate::fetch::{MetricsSource, SensorClient};
use crate::parse::parse_metrics;
use crate::readings::Aggregator;
use crate::thresholds::co2_detected;

/// After this many consecutive fetch failures, per-cycle warnings go quiet
/// until the feed recovers.
const FAILURE_LOG_LIMIT: u32 = 3;

/// Immutable bridge configuration, fixed for the process lifetime.
///
/// Constructed once at startup and handed to [`Bridge::new`]; there is no
/// process-wide mutable state behind it.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Sensor host including scheme, e.g. `http://0.0.0.0`.
    pub host: String,
    /// Sensor port.
    pub port: u16,
    /// Sleep between cycles.
    pub interval: Duration,
    /// Development mode: substitute a randomized temperature for parsed data.
    pub development: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: "http://0.0.0.0".to_string(),
            port: 1006,
            interval: Duration::from_secs(5),
            development: false,
        }
    }
}

/// Bridges the metrics feed into an accessory sink, one cycle per interval.
///
/// The loop runs on a single task; within a cycle the pipeline stages execute
/// strictly sequentially, so at most one fetch is ever in flight and the
/// reading cache has exactly one writer by construction.
pub struct Bridge<S, F = SensorClient> {
    source: F,
    sink: Arc<S>,
    aggregator: Aggregator,
    development: bool,
    interval: Duration,
}

impl<S: AccessorySink> Bridge<S> {
    /// Create a bridge that polls `config.host:config.port` over HTTP.
    #[must_use]
    pub fn new(config: BridgeConfig, sink: Arc<S>) -> Self {
        let source = SensorClient::new(&config.host, config.port);
        Self::with_source(config, source, sink)
    }
}

impl<S, F> Bridge<S, F>
where
    S: AccessorySink,
    F: MetricsSource,
{
    /// Create a bridge over a custom metrics source.
    #[must_use]
    pub fn with_source(config: BridgeConfig, source: F, sink: Arc<S>) -> Self {
        Self {
            source,
            sink,
            aggregator: Aggregator::new(),
            development: config.development,
            interval: config.interval,
        }
    }

    /// Run cycles until `stop_rx` flips to `true`.
    ///
    /// A failed cycle never aborts the loop; the previous readings are
    /// republished and the next tick retries. That is the system's entire
    /// retry policy: no backoff, no cap on consecutive failures.
    pub async fn run(mut self, mut stop_rx: watch::Receiver<bool>) {
        info!(
            endpoint = self.source.endpoint(),
            interval = ?self.interval,
            "starting bridge loop"
        );
        if self.development {
            info!("development mode on, ignoring sensor temperature and returning random values");
        }

        let mut ticker = interval(self.interval);
        // A cycle that outruns the interval delays the next tick instead of
        // bursting to catch up: there is always a full interval's sleep
        // between the end of one cycle and the start of the next.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut consecutive_failures = 0u32;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.cycle(&mut consecutive_failures).await;
                }
                changed = stop_rx.changed() => {
                    // A dropped sender counts as a stop request.
                    if changed.is_err() || *stop_rx.borrow() {
                        info!("bridge loop received stop signal");
                        break;
                    }
                }
            }
        }

        info!("bridge loop stopped");
    }

    /// One complete fetch → parse → aggregate → classify → publish pass.
    ///
    /// On fetch failure the aggregator is left untouched and the last known
    /// values are published unchanged.
    async fn cycle(&mut self, consecutive_failures: &mut u32) {
        match self.source.fetch().await {
            Ok(body) => {
                *consecutive_failures = 0;
                let pairs = parse_metrics(&body);
                debug!(matched = pairs.len(), "parsed metrics feed");
                self.aggregator.apply(&pairs);
            }
            Err(e) => {
                *consecutive_failures += 1;
                if *consecutive_failures <= FAILURE_LOG_LIMIT {
                    warn!(
                        "failed to fetch {}: {} (attempt {})",
                        self.source.endpoint(),
                        e,
                        consecutive_failures
                    );
                } else if *consecutive_failures == FAILURE_LOG_LIMIT + 1 {
                    error!(
                        "failed to fetch {} after {} attempts, will continue trying silently",
                        self.source.endpoint(),
                        consecutive_failures
                    );
                }
            }
        }

        if self.development {
            self.aggregator.randomize_temperature();
        }

        let readings = *self.aggregator.readings();
        let detected = co2_detected(readings.co2.value);
        publish(self.sink.as_ref(), &readings, detected).await;

        for reading in readings.iter() {
            info!(
                "{}: {:.1} {}",
                reading.metric,
                reading.value,
                reading.metric.unit()
            );
        }
        info!("CO2 detected: {}", detected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::mock::{MockSink, MockSource};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::time::Instant;

    fn test_bridge(development: bool) -> (Bridge<MockSink, MockSource>, Arc<MockSink>) {
        let sink = Arc::new(MockSink::new());
        let config = BridgeConfig {
            development,
            ..BridgeConfig::default()
        };
        let bridge = Bridge::with_source(config, MockSource::new(), Arc::clone(&sink));
        (bridge, sink)
    }

    #[tokio::test]
    async fn test_cycle_publishes_parsed_readings() {
        let (mut bridge, sink) = test_bridge(false);
        bridge
            .source
            .push_body("ambient_temperature 21.5\nambient_humidity 40.2\nco2 900\n");

        let mut failures = 0;
        bridge.cycle(&mut failures).await;

        let state = sink.state().await;
        assert_eq!(state.temperature, 21.5);
        assert_eq!(state.humidity, 40.2);
        assert_eq!(state.co2_level, 900.0);
        assert!(state.co2_detected);
        assert_eq!(failures, 0);
    }

    #[tokio::test]
    async fn test_cycle_at_threshold_is_not_detected() {
        let (mut bridge, sink) = test_bridge(false);
        bridge.source.push_body("co2 850\n");

        let mut failures = 0;
        bridge.cycle(&mut failures).await;

        assert!(!sink.state().await.co2_detected);
    }

    #[tokio::test]
    async fn test_fetch_failure_republishes_last_known_values() {
        let (mut bridge, sink) = test_bridge(false);
        bridge
            .source
            .push_body("ambient_temperature 21.5\nambient_humidity 40.2\nco2 900\n");
        bridge.source.push_failure("connection refused");

        let mut failures = 0;
        bridge.cycle(&mut failures).await;
        let before = sink.state().await;

        bridge.cycle(&mut failures).await;
        let after = sink.state().await;

        assert_eq!(after, before);
        assert_eq!(failures, 1);
        // All four characteristics were still written both cycles.
        assert_eq!(sink.write_count(), 8);
    }

    #[tokio::test]
    async fn test_failure_counter_resets_on_success() {
        let (mut bridge, _sink) = test_bridge(false);
        bridge.source.push_failure("refused");
        bridge.source.push_failure("refused");
        bridge.source.push_body("co2 500\n");
        bridge.source.push_failure("refused");

        let mut failures = 0;
        bridge.cycle(&mut failures).await;
        bridge.cycle(&mut failures).await;
        assert_eq!(failures, 2);

        bridge.cycle(&mut failures).await;
        assert_eq!(failures, 0);

        bridge.cycle(&mut failures).await;
        assert_eq!(failures, 1);
    }

    #[tokio::test]
    async fn test_same_body_twice_is_idempotent() {
        let body = "ambient_temperature 18.0\nambient_humidity 51.5\nco2 640\n";
        let (mut bridge, sink) = test_bridge(false);
        bridge.source.push_body(body);
        bridge.source.push_body(body);

        let mut failures = 0;
        bridge.cycle(&mut failures).await;
        let first = sink.state().await;
        bridge.cycle(&mut failures).await;

        assert_eq!(sink.state().await, first);
    }

    #[tokio::test]
    async fn test_missing_metric_keeps_previous_value() {
        let (mut bridge, sink) = test_bridge(false);
        bridge
            .source
            .push_body("ambient_temperature 21.5\nambient_humidity 40.2\nco2 900\n");
        bridge.source.push_body("co2 430\n");

        let mut failures = 0;
        bridge.cycle(&mut failures).await;
        bridge.cycle(&mut failures).await;

        let state = sink.state().await;
        assert_eq!(state.temperature, 21.5);
        assert_eq!(state.humidity, 40.2);
        assert_eq!(state.co2_level, 430.0);
        assert!(!state.co2_detected);
    }

    #[tokio::test]
    async fn test_development_mode_randomizes_temperature_only() {
        let (mut bridge, sink) = test_bridge(true);

        let mut failures = 0;
        for _ in 0..50 {
            bridge
                .source
                .push_body("ambient_temperature 99.0\nambient_humidity 40.2\nco2 900\n");
            bridge.cycle(&mut failures).await;

            let state = sink.state().await;
            assert!(
                (15.0..30.0).contains(&state.temperature),
                "temperature {} out of development range",
                state.temperature
            );
            assert_eq!(state.humidity, 40.2);
            assert_eq!(state.co2_level, 900.0);
        }
    }

    #[tokio::test]
    async fn test_development_mode_applies_even_when_fetch_fails() {
        let (mut bridge, sink) = test_bridge(true);
        bridge.source.push_failure("refused");

        let mut failures = 0;
        bridge.cycle(&mut failures).await;

        let t = sink.state().await.temperature;
        assert!((15.0..30.0).contains(&t));
    }

    #[tokio::test]
    async fn test_duplicate_co2_lines_last_wins() {
        let (mut bridge, sink) = test_bridge(false);
        bridge.source.push_body("co2 800\nco2 950\n");

        let mut failures = 0;
        bridge.cycle(&mut failures).await;

        let state = sink.state().await;
        assert_eq!(state.co2_level, 950.0);
        assert!(state.co2_detected);
    }

    /// A source whose fetch takes a fixed time, recording when each starts.
    struct SlowSource {
        delay: Duration,
        starts: Arc<Mutex<Vec<Instant>>>,
    }

    #[async_trait]
    impl MetricsSource for SlowSource {
        async fn fetch(&self) -> Result<String> {
            self.starts
                .lock()
                .expect("start log lock poisoned")
                .push(Instant::now());
            tokio::time::sleep(self.delay).await;
            Ok("co2 600\n".to_string())
        }

        fn endpoint(&self) -> &str {
            "mock://slow"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_cycle_still_sleeps_full_interval() {
        // A 12s fetch against a 5s interval: the next cycle must not start
        // until a full interval has passed after the slow cycle ends.
        let starts = Arc::new(Mutex::new(Vec::new()));
        let source = SlowSource {
            delay: Duration::from_secs(12),
            starts: Arc::clone(&starts),
        };
        let sink = Arc::new(MockSink::new());
        let config = BridgeConfig {
            interval: Duration::from_secs(5),
            ..BridgeConfig::default()
        };
        let bridge = Bridge::with_source(config, source, sink);

        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(bridge.run(stop_rx));

        tokio::time::sleep(Duration::from_secs(60)).await;
        stop_tx.send(true).unwrap();
        task.await.unwrap();

        let starts = starts.lock().unwrap();
        assert!(starts.len() >= 3, "expected at least 3 cycles");
        for pair in starts.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(
                gap >= Duration::from_secs(17),
                "next cycle started after only {gap:?}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_stop_sender_ends_loop() {
        let sink = Arc::new(MockSink::new());
        let bridge =
            Bridge::with_source(BridgeConfig::default(), MockSource::new(), Arc::clone(&sink));

        let (stop_tx, stop_rx) = watch::channel(false);
        drop(stop_tx);

        // Without a live sender the loop must exit rather than spin.
        tokio::spawn(bridge.run(stop_rx)).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cycles_until_stopped() {
        let sink = Arc::new(MockSink::new());
        let source = MockSource::new();
        for _ in 0..4 {
            source.push_body("co2 600\n");
        }
        let config = BridgeConfig {
            interval: Duration::from_secs(5),
            ..BridgeConfig::default()
        };
        let bridge = Bridge::with_source(config, source, Arc::clone(&sink));

        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(bridge.run(stop_rx));

        // First cycle fires immediately; two more after 10 virtual seconds.
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(sink.write_count() >= 8);

        stop_tx.send(true).unwrap();
        task.await.unwrap();

        assert_eq!(sink.state().await.co2_level, 600.0);
    }
}
