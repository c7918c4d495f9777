//! Accessory sink trait and characteristic publisher.
//!
//! The external accessory transport (pairing, encryption, client delivery)
//! is an opaque collaborator; the bridge only ever touches its write
//! interface, modeled here as [`AccessorySink`].

use async_trait::async_trait;

use airkit_types::ReadingSet;

/// Display step granularity advertised with temperature and humidity writes.
pub const CHARACTERISTIC_STEP: f64 = 0.1;

/// Write interface of the accessory transport's characteristic store.
///
/// Writes are one-way: the transport owns delivery to paired clients and the
/// bridge never reads back confirmation, so the methods are infallible at
/// this seam. A transport that fails a write fails it silently, matching the
/// external protocol's own guarantees.
#[async_trait]
pub trait AccessorySink: Send + Sync {
    /// Write the current temperature characteristic (°C) and its step.
    async fn set_temperature(&self, value: f64, step: f64);

    /// Write the current relative humidity characteristic (%RH) and its step.
    async fn set_humidity(&self, value: f64, step: f64);

    /// Write the CO2 level characteristic (ppm).
    async fn set_co2_level(&self, value: f64);

    /// Write the CO2 detected characteristic (1/0 on the wire).
    async fn set_co2_detected(&self, detected: bool);
}

/// Overwrite all four characteristics from the current readings.
///
/// Called once per cycle with whatever the aggregator holds, whether or not
/// this cycle's fetch succeeded; a failed fetch republishes the last known
/// values unchanged.
pub async fn publish<S>(sink: &S, readings: &ReadingSet, detected: bool)
where
    S: AccessorySink + ?Sized,
{
    sink.set_temperature(readings.temperature.value, CHARACTERISTIC_STEP)
        .await;
    sink.set_humidity(readings.humidity.value, CHARACTERISTIC_STEP)
        .await;
    sink.set_co2_level(readings.co2.value).await;
    sink.set_co2_detected(detected).await;
}
