//! Error types for airkit-core.
//!
//! Nothing in the bridge pipeline is fatal to the process: a failed cycle is
//! logged by the scheduler and the previous readings stand until the next
//! tick. The only fatal startup condition (failing to start the accessory
//! transport) lives in the binary, not here.

use thiserror::Error;

/// Errors from the bridge pipeline.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The metrics feed could not be fetched.
    ///
    /// Covers every transport failure uniformly: refused connection, DNS
    /// failure, timeout. A non-success HTTP status is deliberately not an
    /// error; see [`crate::SensorClient`].
    #[error("failed to fetch metrics feed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The metrics source is unavailable for a non-HTTP reason.
    ///
    /// Used by alternative [`crate::MetricsSource`] implementations, such as
    /// the scripted mock source.
    #[error("metrics feed unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias using airkit-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
