//! Core types for cached sensor readings and accessory state.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A metric channel exported by the sensor's metrics feed.
///
/// The feed is line-oriented text where each relevant line starts with one of
/// the three fixed identifiers returned by [`Metric::name`]. The set is fixed
/// by the exporter; the bridge never learns new channels at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Metric {
    /// Ambient temperature in degrees Celsius.
    Temperature,
    /// Relative humidity percentage (0-100).
    Humidity,
    /// CO2 concentration in ppm.
    Co2,
}

impl Metric {
    /// All metrics, in feed declaration order.
    ///
    /// This is the static name-to-slot mapping table the line parser walks
    /// for each line.
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Humidity, Metric::Co2];

    /// The identifier the metrics feed uses for this metric.
    ///
    /// # Examples
    ///
    /// ```
    /// use airkit_types::Metric;
    ///
    /// assert_eq!(Metric::Temperature.name(), "ambient_temperature");
    /// assert_eq!(Metric::Humidity.name(), "ambient_humidity");
    /// assert_eq!(Metric::Co2.name(), "co2");
    /// ```
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Temperature => "ambient_temperature",
            Metric::Humidity => "ambient_humidity",
            Metric::Co2 => "co2",
        }
    }

    /// Look up a metric by its feed identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use airkit_types::Metric;
    ///
    /// assert_eq!(Metric::from_name("co2"), Some(Metric::Co2));
    /// assert_eq!(Metric::from_name("co2_total"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Metric::ALL.into_iter().find(|m| m.name() == name)
    }

    /// The unit suffix used when logging this metric.
    #[must_use]
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity => "%RH",
            Metric::Co2 => "ppm",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Temperature => write!(f, "Temperature"),
            Metric::Humidity => write!(f, "Humidity"),
            Metric::Co2 => write!(f, "CO2"),
        }
    }
}

/// A single named sensor value cached between poll cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Which channel this value belongs to.
    pub metric: Metric,
    /// The last successfully parsed value, or 0.0 before the first.
    pub value: f64,
}

impl Reading {
    /// A reading at the initial default value for `metric`.
    #[must_use]
    pub fn initial(metric: Metric) -> Self {
        Self { metric, value: 0.0 }
    }
}

/// The most recently observed sensor state across all three channels.
///
/// Each slot always holds the last successfully parsed value for its metric,
/// or the initial 0.0 if none has ever been parsed. Slots are never cleared;
/// only a process restart resets them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReadingSet {
    /// Ambient temperature reading.
    pub temperature: Reading,
    /// Relative humidity reading.
    pub humidity: Reading,
    /// CO2 concentration reading.
    pub co2: Reading,
}

impl Default for ReadingSet {
    fn default() -> Self {
        Self {
            temperature: Reading::initial(Metric::Temperature),
            humidity: Reading::initial(Metric::Humidity),
            co2: Reading::initial(Metric::Co2),
        }
    }
}

impl ReadingSet {
    /// Current value for `metric`.
    #[must_use]
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature.value,
            Metric::Humidity => self.humidity.value,
            Metric::Co2 => self.co2.value,
        }
    }

    /// Overwrite the slot for `metric`.
    pub fn set(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::Temperature => self.temperature.value = value,
            Metric::Humidity => self.humidity.value = value,
            Metric::Co2 => self.co2.value = value,
        }
    }

    /// Iterate the three readings in feed declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Reading> + '_ {
        [self.temperature, self.humidity, self.co2].into_iter()
    }
}

/// Snapshot of the accessory transport's characteristic store.
///
/// The four characteristic values are overwritten wholesale once per bridge
/// cycle; consistency guarantees for concurrent client reads belong to the
/// transport that owns the store, not to this type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccessoryState {
    /// Current temperature characteristic in °C.
    pub temperature: f64,
    /// Display step granularity advertised for temperature.
    pub temperature_step: f64,
    /// Current relative humidity characteristic in %RH.
    pub humidity: f64,
    /// Display step granularity advertised for humidity.
    pub humidity_step: f64,
    /// CO2 level characteristic in ppm.
    pub co2_level: f64,
    /// CO2 detected characteristic (1/0 on the wire).
    pub co2_detected: bool,
    /// When any characteristic was last overwritten.
    #[cfg_attr(
        feature = "serde",
        serde(with = "time::serde::rfc3339::option")
    )]
    pub updated_at: Option<time::OffsetDateTime>,
}

impl Default for AccessoryState {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            temperature_step: 0.0,
            humidity: 0.0,
            humidity_step: 0.0,
            co2_level: 0.0,
            co2_detected: false,
            updated_at: None,
        }
    }
}
