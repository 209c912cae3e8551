//! Error types for document domain validation.

use crate::timestamps::TimestampOrderError;
use thiserror::Error;

/// Errors returned while constructing document domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentDomainError {
    /// A required field is empty or whitespace-only.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending column.
        field: &'static str,
    },

    /// A field exceeds the width of its storage column.
    #[error("{field} exceeds {max} character limit ({length} characters)")]
    FieldTooLong {
        /// Name of the offending column.
        field: &'static str,
        /// Maximum number of characters the column holds.
        max: usize,
        /// Number of characters supplied.
        length: usize,
    },

    /// Stored timestamps are out of order.
    #[error(transparent)]
    TimestampOrder(#[from] TimestampOrderError),
}
