//! CO2 alert threshold.
//!
//! The accessory protocol's CO2-detected characteristic is binary, so the
//! bridge reduces the ppm level to a single boundary check, evaluated fresh
//! from the current reading every cycle.

/// CO2 concentration above which the accessory reports "detected", in ppm.
///
/// 850 ppm is the eight-hour indoor ceiling from the Australian Building
/// Codes Board's indoor air quality verification handbook.
pub const CO2_ALERT_PPM: f64 = 850.0;

/// Classify a CO2 level against [`CO2_ALERT_PPM`].
///
/// Strict inequality: exactly 850.0 ppm is not detected.
///
/// # Examples
///
/// ```
/// use airkit_core::co2_detected;
///
/// assert!(!co2_detected(850.0));
/// assert!(co2_detected(850.1));
/// ```
#[must_use]
pub fn co2_detected(ppm: f64) -> bool {
    ppm > CO2_ALERT_PPM
}
