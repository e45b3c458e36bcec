//! Error types for algoviz-trace.

use thiserror::Error;

/// Result type for algoviz-trace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading result payloads.
#[derive(Debug, Error)]
pub enum Error {
    /// The payload did not match the expected shape for its family.
    #[error("malformed {family} payload: {source}")]
    MalformedPayload {
        family: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A field the family depends on is absent.
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// A denomination key could not be read as a positive size.
    #[error("invalid denomination `{0}`")]
    InvalidDenomination(String),

    /// Per-segment cost and distance lists differ in length.
    #[error("{costs} segment costs but {distances} segment distances")]
    MismatchedSegments { costs: usize, distances: usize },

    /// The payload would expand into more steps than a trace may hold.
    #[error("payload needs {needed} steps, limit is {limit}")]
    TooLarge { needed: u64, limit: usize },
}
