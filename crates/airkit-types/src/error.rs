//! Error types for feed data parsing in airkit-types.

use thiserror::Error;

/// Errors that can occur when interpreting a metric line's numeric payload.
///
/// A line that matches no known metric name is not an error at all; only a
/// matched line whose number fails to parse produces one, and the bridge
/// drops that single line's contribution.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The payload after a matched metric name is not a signed decimal.
    #[error("invalid numeric payload: {0:?}")]
    InvalidNumber(String),
}

/// Result type alias using airkit-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
