//! Validated identifier and tag types for documents.
//!
//! Each type enforces the width of the column it is stored in so that
//! overflow is reported as a validation failure before reaching the driver.

use super::DocumentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum length of a document identifier, matching `VARCHAR(255)`.
pub const MAX_DOCUMENT_ID_LENGTH: usize = 255;

/// Maximum length of a schema tag, matching `VARCHAR(64)`.
pub const MAX_DOCUMENT_SCHEMA_LENGTH: usize = 64;

/// Maximum length of an instance key, matching `VARCHAR(64)`.
pub const MAX_INSTANCE_KEY_LENGTH: usize = 64;

fn validate(
    value: String,
    field: &'static str,
    max: usize,
) -> Result<String, DocumentDomainError> {
    if value.trim().is_empty() {
        return Err(DocumentDomainError::EmptyField { field });
    }
    let length = value.chars().count();
    if length > max {
        return Err(DocumentDomainError::FieldTooLong { field, max, length });
    }
    Ok(value)
}

macro_rules! validated_string {
    ($(#[$meta:meta])* $name:ident, $field:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a validated `", $field, "` value.")]
            ///
            /// # Errors
            ///
            /// Returns [`DocumentDomainError::EmptyField`] for empty or
            /// whitespace-only input and [`DocumentDomainError::FieldTooLong`]
            /// when the value exceeds the column width.
            pub fn new(value: impl Into<String>) -> Result<Self, DocumentDomainError> {
                validate(value.into(), $field, $max).map(Self)
            }

            /// Returns the value as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Unwraps the owned string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = DocumentDomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

validated_string!(
    /// Caller-supplied primary key of a document row.
    DocumentId,
    "id",
    MAX_DOCUMENT_ID_LENGTH
);

validated_string!(
    /// Schema tag identifying the kind of payload, e.g.
    /// `deckhand/Certificate/v1`.
    DocumentSchema,
    "document_schema",
    MAX_DOCUMENT_SCHEMA_LENGTH
);

validated_string!(
    /// Logical identifier of a document, unique across all rows.
    InstanceKey,
    "instance_key",
    MAX_INSTANCE_KEY_LENGTH
);

impl DocumentId {
    /// Creates a random identifier for callers without their own scheme.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Index of the revision a document belongs to.
///
/// Revisions are managed outside this crate; the index is stored as a plain
/// integer reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionIndex(i32);

impl RevisionIndex {
    /// Wraps a revision index.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl From<i32> for RevisionIndex {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for RevisionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
