//! Platform-agnostic types for the airkit sensor bridge.
//!
//! This crate provides the shared vocabulary between the bridge pipeline
//! (airkit-core) and the accessory transport (airkit-bridge):
//!
//! - Metric identifiers for the sensor's line-oriented metrics feed
//! - Cached reading types carried between poll cycles
//! - The accessory characteristic snapshot published each cycle
//! - Error types for numeric payload parsing
//!
//! # Example
//!
//! ```
//! use airkit_types::{Metric, ReadingSet};
//!
//! let mut readings = ReadingSet::default();
//! readings.set(Metric::Co2, 912.0);
//! assert_eq!(readings.get(Metric::Co2), 912.0);
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{AccessoryState, Metric, Reading, ReadingSet};
