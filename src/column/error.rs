//! Error types for the JSON text column adapter.

use thiserror::Error;

/// Errors raised while encoding or decoding a JSON text column.
#[derive(Debug, Error)]
pub enum JsonTextError {
    /// The value cannot be represented as JSON.
    #[error("value cannot be encoded as JSON text: {0}")]
    Encode(#[source] serde_json::Error),

    /// The stored column text is not valid JSON.
    #[error("stored column text is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

impl JsonTextError {
    /// Returns `true` when the error was raised while reading stored text.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
