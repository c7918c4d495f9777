//! Reading aggregation across poll cycles.

use airkit_types::{Metric, ReadingSet};
use rand::Rng;

/// Development-mode temperature range, degrees Celsius (half-open).
const DEV_TEMPERATURE_RANGE: std::ops::Range<f64> = 15.0..30.0;

/// Holds the latest known value for each metric channel.
///
/// Slots update incrementally as parsed pairs arrive; a metric absent from a
/// cycle keeps its previous value (stale-but-last-known-good). There is no
/// "unknown" state once a first reading has landed, and nothing resets the
/// cache short of a process restart.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    readings: ReadingSet,
}

impl Aggregator {
    /// Create an aggregator with all channels at the initial 0.0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slots named in `pairs`, in order.
    ///
    /// Duplicate metrics within one batch are applied sequentially, so the
    /// last pair wins.
    pub fn apply(&mut self, pairs: &[(Metric, f64)]) {
        for &(metric, value) in pairs {
            self.readings.set(metric, value);
        }
    }

    /// Replace the temperature channel with a uniform draw from [15.0, 30.0).
    ///
    /// Development-mode substitute for live sensor data; humidity and CO2
    /// keep whatever was parsed (or is stale).
    pub fn randomize_temperature(&mut self) {
        let value = rand::rng().random_range(DEV_TEMPERATURE_RANGE);
        self.readings.set(Metric::Temperature, value);
    }

    /// Current snapshot of all three channels.
    #[must_use]
    pub fn readings(&self) -> &ReadingSet {
        &self.readings
    }
}
