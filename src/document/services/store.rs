//! Service layer for document persistence.
//!
//! Provides [`DocumentService`], the create/lookup/update/delete facade used
//! by revision assembly and by read paths.

use crate::column::{JsonText, JsonTextError};
use crate::document::{
    domain::{
        Document, DocumentChanges, DocumentDomainError, DocumentId, DocumentSchema, InstanceKey,
        NewDocumentParams, RevisionIndex,
    },
    ports::{DocumentRepository, DocumentRepositoryError},
};
use mockable::Clock;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Request payload for creating a document. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDocumentRequest {
    id: String,
    revision_index: i32,
    document_schema: String,
    instance_key: String,
    document_metadata: Value,
    document_data: Value,
}

impl CreateDocumentRequest {
    /// Creates a request from already structured payloads.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        revision_index: i32,
        document_schema: impl Into<String>,
        instance_key: impl Into<String>,
        document_metadata: Value,
        document_data: Value,
    ) -> Self {
        Self {
            id: id.into(),
            revision_index,
            document_schema: document_schema.into(),
            instance_key: instance_key.into(),
            document_metadata,
            document_data,
        }
    }

    /// Creates a request from arbitrary serializable payloads.
    ///
    /// # Errors
    ///
    /// Returns [`JsonTextError::Encode`] when either payload is not
    /// representable in JSON.
    pub fn from_serializable<M, D>(
        id: impl Into<String>,
        revision_index: i32,
        document_schema: impl Into<String>,
        instance_key: impl Into<String>,
        document_metadata: &M,
        document_data: &D,
    ) -> Result<Self, JsonTextError>
    where
        M: Serialize + ?Sized,
        D: Serialize + ?Sized,
    {
        Ok(Self::new(
            id,
            revision_index,
            document_schema,
            instance_key,
            JsonText::from_serializable(document_metadata)?.into_inner(),
            JsonText::from_serializable(document_data)?.into_inner(),
        ))
    }
}

/// Request payload for updating a document. Unset fields are left as they
/// are; the identifier cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateDocumentRequest {
    revision_index: Option<i32>,
    document_schema: Option<String>,
    instance_key: Option<String>,
    document_metadata: Option<Value>,
    document_data: Option<Value>,
}

impl UpdateDocumentRequest {
    /// Creates a request that changes nothing but the update timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the document to another revision.
    #[must_use]
    pub const fn with_revision_index(mut self, revision_index: i32) -> Self {
        self.revision_index = Some(revision_index);
        self
    }

    /// Replaces the schema tag.
    #[must_use]
    pub fn with_document_schema(mut self, document_schema: impl Into<String>) -> Self {
        self.document_schema = Some(document_schema.into());
        self
    }

    /// Replaces the instance key.
    #[must_use]
    pub fn with_instance_key(mut self, instance_key: impl Into<String>) -> Self {
        self.instance_key = Some(instance_key.into());
        self
    }

    /// Replaces the metadata payload.
    #[must_use]
    pub fn with_document_metadata(mut self, document_metadata: Value) -> Self {
        self.document_metadata = Some(document_metadata);
        self
    }

    /// Replaces the data payload.
    #[must_use]
    pub fn with_document_data(mut self, document_data: Value) -> Self {
        self.document_data = Some(document_data);
        self
    }

    fn into_changes(self) -> Result<DocumentChanges, DocumentDomainError> {
        Ok(DocumentChanges {
            revision_index: self.revision_index.map(RevisionIndex::new),
            document_schema: self.document_schema.map(DocumentSchema::new).transpose()?,
            instance_key: self.instance_key.map(InstanceKey::new).transpose()?,
            document_metadata: self.document_metadata,
            document_data: self.document_data,
        })
    }
}

/// Service-level errors for document operations.
#[derive(Debug, Error)]
pub enum DocumentServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DocumentDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] DocumentRepositoryError),
}

/// Result type for document service operations.
pub type DocumentServiceResult<T> = Result<T, DocumentServiceError>;

/// Document persistence orchestration service.
#[derive(Clone)]
pub struct DocumentService<R, C>
where
    R: DocumentRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> DocumentService<R, C>
where
    R: DocumentRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new document service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates and stores a document with both timestamps set to now.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentServiceError::Domain`] when a field is empty or too
    /// long, or [`DocumentServiceError::Repository`] when a unique key is
    /// taken, a payload cannot be encoded, or storage fails.
    pub async fn create(&self, request: CreateDocumentRequest) -> DocumentServiceResult<Document> {
        let CreateDocumentRequest {
            id,
            revision_index,
            document_schema,
            instance_key,
            document_metadata,
            document_data,
        } = request;

        let params = NewDocumentParams {
            id: DocumentId::new(id)?,
            revision_index: RevisionIndex::new(revision_index),
            document_schema: DocumentSchema::new(document_schema)?,
            instance_key: InstanceKey::new(instance_key)?,
            document_metadata,
            document_data,
        };
        let doc = Document::new(params, &*self.clock);

        self.repository
            .insert(&doc)
            .await
            .inspect_err(|err| log_rejection("create", doc.id(), err))?;
        debug!(
            document_id = %doc.id(),
            instance_key = %doc.instance_key(),
            revision_index = %doc.revision_index(),
            "document created"
        );
        Ok(doc)
    }

    /// Finds a document by primary key.
    ///
    /// Returns `Ok(None)` when no document has the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentServiceError::Domain`] when the identifier fails
    /// validation, or [`DocumentServiceError::Repository`] when lookup fails
    /// or a stored payload is not valid JSON.
    pub async fn find_by_id(&self, id: &str) -> DocumentServiceResult<Option<Document>> {
        let document_id = DocumentId::new(id)?;
        Ok(self
            .repository
            .find_by_id(&document_id)
            .await
            .inspect_err(|err| log_rejection("find_by_id", &document_id, err))?)
    }

    /// Finds a document by instance key.
    ///
    /// Returns `Ok(None)` when no document has the key.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentServiceError::Domain`] when the key fails
    /// validation, or [`DocumentServiceError::Repository`] when lookup fails
    /// or a stored payload is not valid JSON.
    pub async fn find_by_instance_key(&self, key: &str) -> DocumentServiceResult<Option<Document>> {
        let instance_key = InstanceKey::new(key)?;
        Ok(self
            .repository
            .find_by_instance_key(&instance_key)
            .await
            .inspect_err(|err| log_rejection("find_by_instance_key", &instance_key, err))?)
    }

    /// Returns documents belonging to the given revisions, ordered by
    /// revision and identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentServiceError::Repository`] when lookup fails or a
    /// stored payload is not valid JSON.
    pub async fn list_by_revision_range(
        &self,
        revisions: RangeInclusive<i32>,
    ) -> DocumentServiceResult<Vec<Document>> {
        let (first, last) = revisions.into_inner();
        Ok(self
            .repository
            .list_by_revision_range(RevisionIndex::new(first)..=RevisionIndex::new(last))
            .await?)
    }

    /// Replaces the requested fields and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentServiceError::Domain`] when a replacement value
    /// fails validation, or [`DocumentServiceError::Repository`] when the
    /// document does not exist, the new instance key is taken, or storage
    /// fails.
    pub async fn update(
        &self,
        id: &str,
        request: UpdateDocumentRequest,
    ) -> DocumentServiceResult<Document> {
        let document_id = DocumentId::new(id)?;
        let changes = request.into_changes()?;
        let mut doc = self.find_by_id_or_error(&document_id).await?;
        doc.apply(changes, &*self.clock);

        self.repository
            .update(&doc)
            .await
            .inspect_err(|err| log_rejection("update", &document_id, err))?;
        debug!(document_id = %doc.id(), "document updated");
        Ok(doc)
    }

    /// Removes a document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentServiceError::Repository`] with
    /// [`DocumentRepositoryError::NotFound`] when the document does not exist;
    /// callers wanting idempotent deletes may ignore that case.
    pub async fn delete(&self, id: &str) -> DocumentServiceResult<()> {
        let document_id = DocumentId::new(id)?;
        self.repository.delete(&document_id).await?;
        debug!(document_id = %document_id, "document deleted");
        Ok(())
    }

    async fn find_by_id_or_error(&self, id: &DocumentId) -> DocumentServiceResult<Document> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DocumentRepositoryError::NotFound(id.clone()).into())
    }
}

fn log_rejection(operation: &'static str, key: &impl fmt::Display, err: &DocumentRepositoryError) {
    match err {
        DocumentRepositoryError::DuplicateDocumentId(_)
        | DocumentRepositoryError::DuplicateInstanceKey(_) => {
            warn!(operation, key = %key, error = %err, "unique key rejected");
        }
        DocumentRepositoryError::Decode(_) => {
            warn!(operation, key = %key, error = %err, "stored document payload is corrupt");
        }
        _ => {}
    }
}
