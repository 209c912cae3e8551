//! Repository port for document persistence.

use crate::document::domain::{Document, DocumentId, InstanceKey, RevisionIndex};
use async_trait::async_trait;
use std::ops::RangeInclusive;
use std::sync::Arc;
use thiserror::Error;

/// Result type for document repository operations.
pub type DocumentRepositoryResult<T> = Result<T, DocumentRepositoryError>;

/// Document persistence contract.
///
/// Implementations decode both JSON payloads before returning a document
/// and must surface undecodable payloads as
/// [`DocumentRepositoryError::Decode`].
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Stores a new document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentRepositoryError::DuplicateDocumentId`] or
    /// [`DocumentRepositoryError::DuplicateInstanceKey`] when either unique
    /// key is taken, and [`DocumentRepositoryError::Encode`] when a payload
    /// cannot be written as JSON text.
    async fn insert(&self, document: &Document) -> DocumentRepositoryResult<()>;

    /// Persists every column of an existing document except its primary key.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentRepositoryError::NotFound`] when the document does
    /// not exist and [`DocumentRepositoryError::DuplicateInstanceKey`] when
    /// the new instance key belongs to another document.
    async fn update(&self, document: &Document) -> DocumentRepositoryResult<()>;

    /// Finds a document by primary key.
    ///
    /// Returns `None` when the document does not exist.
    async fn find_by_id(&self, id: &DocumentId) -> DocumentRepositoryResult<Option<Document>>;

    /// Finds a document by instance key.
    ///
    /// Returns `None` when no document has the key.
    async fn find_by_instance_key(
        &self,
        key: &InstanceKey,
    ) -> DocumentRepositoryResult<Option<Document>>;

    /// Returns documents whose revision falls within `revisions`, ordered by
    /// revision and then by identifier.
    async fn list_by_revision_range(
        &self,
        revisions: RangeInclusive<RevisionIndex>,
    ) -> DocumentRepositoryResult<Vec<Document>>;

    /// Removes a document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentRepositoryError::NotFound`] when the document does
    /// not exist.
    async fn delete(&self, id: &DocumentId) -> DocumentRepositoryResult<()>;
}

/// Errors returned by document repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DocumentRepositoryError {
    /// A document with the same primary key already exists.
    #[error("duplicate document identifier: {0}")]
    DuplicateDocumentId(DocumentId),

    /// A document with the same instance key already exists.
    #[error("duplicate instance key: {0}")]
    DuplicateInstanceKey(InstanceKey),

    /// The document was not found.
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    /// A payload could not be encoded as JSON text.
    #[error("payload encoding failed: {0}")]
    Encode(Arc<dyn std::error::Error + Send + Sync>),

    /// A stored payload is not valid JSON.
    #[error("stored payload is corrupt: {0}")]
    Decode(Arc<dyn std::error::Error + Send + Sync>),

    /// Persisted identifiers could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DocumentRepositoryError {
    /// Wraps a payload encoding error.
    pub fn encode(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Encode(Arc::new(err))
    }

    /// Wraps a payload decoding error.
    pub fn decode(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Decode(Arc::new(err))
    }

    /// Wraps a data-quality error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns `true` for either unique-key collision.
    #[must_use]
    pub const fn is_uniqueness_violation(&self) -> bool {
        matches!(
            self,
            Self::DuplicateDocumentId(_) | Self::DuplicateInstanceKey(_)
        )
    }
}
