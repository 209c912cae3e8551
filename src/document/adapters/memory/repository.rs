//! In-memory repository for document tests and embedding.
//!
//! Rows are held the way the database holds them: both payloads are stored
//! as JSON text and decoded on every read, so the column adapter runs on
//! the same paths as it does against `PostgreSQL`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::column::JsonTextType;
use crate::document::{
    domain::{
        Document, DocumentId, DocumentSchema, InstanceKey, PersistedDocumentData, RevisionIndex,
    },
    ports::{DocumentRepository, DocumentRepositoryError, DocumentRepositoryResult},
};
use crate::timestamps::Timestamped;

const PAYLOAD_COLUMN: JsonTextType = JsonTextType::unbounded();

/// Payload column selector for raw storage access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadColumn {
    /// The `document_metadata` column.
    Metadata,
    /// The `document_data` column.
    Data,
}

/// Thread-safe in-memory document repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentRepository {
    state: Arc<RwLock<InMemoryDocumentState>>,
}

#[derive(Debug, Default)]
struct InMemoryDocumentState {
    rows: HashMap<DocumentId, StoredRow>,
    instance_key_index: HashMap<InstanceKey, DocumentId>,
}

#[derive(Debug, Clone)]
struct StoredRow {
    id: DocumentId,
    revision_index: RevisionIndex,
    document_schema: DocumentSchema,
    instance_key: InstanceKey,
    document_metadata: String,
    document_data: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredRow {
    fn encode(doc: &Document) -> DocumentRepositoryResult<Self> {
        Ok(Self {
            id: doc.id().clone(),
            revision_index: doc.revision_index(),
            document_schema: doc.document_schema().clone(),
            instance_key: doc.instance_key().clone(),
            document_metadata: PAYLOAD_COLUMN
                .encode_value(doc.document_metadata())
                .map_err(DocumentRepositoryError::encode)?,
            document_data: PAYLOAD_COLUMN
                .encode_value(doc.document_data())
                .map_err(DocumentRepositoryError::encode)?,
            created_at: doc.created_at(),
            updated_at: doc.updated_at(),
        })
    }

    fn decode(&self) -> DocumentRepositoryResult<Document> {
        let data = PersistedDocumentData {
            id: self.id.clone(),
            revision_index: self.revision_index,
            document_schema: self.document_schema.clone(),
            instance_key: self.instance_key.clone(),
            document_metadata: PAYLOAD_COLUMN
                .decode_text(&self.document_metadata)
                .map_err(DocumentRepositoryError::decode)?,
            document_data: PAYLOAD_COLUMN
                .decode_text(&self.document_data)
                .map_err(DocumentRepositoryError::decode)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        Document::from_persisted(data).map_err(DocumentRepositoryError::invalid_persisted_data)
    }

    fn column_mut(&mut self, column: PayloadColumn) -> &mut String {
        match column {
            PayloadColumn::Metadata => &mut self.document_metadata,
            PayloadColumn::Data => &mut self.document_data,
        }
    }

    fn column(&self, column: PayloadColumn) -> &str {
        match column {
            PayloadColumn::Metadata => &self.document_metadata,
            PayloadColumn::Data => &self.document_data,
        }
    }
}

impl InMemoryDocumentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored text of a payload column, bypassing the adapter.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentRepositoryError::Persistence`] when the state lock
    /// is poisoned.
    pub fn stored_payload(
        &self,
        id: &DocumentId,
        column: PayloadColumn,
    ) -> DocumentRepositoryResult<Option<String>> {
        let state = self.read_state()?;
        Ok(state.rows.get(id).map(|row| row.column(column).to_owned()))
    }

    /// Overwrites the stored text of a payload column, bypassing the adapter.
    ///
    /// This mirrors writing to the column directly in SQL and is how tests
    /// simulate corrupted rows.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentRepositoryError::NotFound`] when the document does
    /// not exist.
    pub fn overwrite_stored_payload(
        &self,
        id: &DocumentId,
        column: PayloadColumn,
        text: impl Into<String>,
    ) -> DocumentRepositoryResult<()> {
        let mut state = self.write_state()?;
        let row = state
            .rows
            .get_mut(id)
            .ok_or_else(|| DocumentRepositoryError::NotFound(id.clone()))?;
        *row.column_mut(column) = text.into();
        Ok(())
    }

    fn read_state(&self) -> DocumentRepositoryResult<RwLockReadGuard<'_, InMemoryDocumentState>> {
        self.state.read().map_err(|err| {
            DocumentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write_state(
        &self,
    ) -> DocumentRepositoryResult<RwLockWriteGuard<'_, InMemoryDocumentState>> {
        self.state.write().map_err(|err| {
            DocumentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn insert(&self, doc: &Document) -> DocumentRepositoryResult<()> {
        let row = StoredRow::encode(doc)?;
        let mut state = self.write_state()?;

        if state.rows.contains_key(doc.id()) {
            return Err(DocumentRepositoryError::DuplicateDocumentId(
                doc.id().clone(),
            ));
        }

        if state.instance_key_index.contains_key(doc.instance_key()) {
            return Err(DocumentRepositoryError::DuplicateInstanceKey(
                doc.instance_key().clone(),
            ));
        }

        state
            .instance_key_index
            .insert(doc.instance_key().clone(), doc.id().clone());
        state.rows.insert(doc.id().clone(), row);
        Ok(())
    }

    async fn update(&self, doc: &Document) -> DocumentRepositoryResult<()> {
        let mut state = self.write_state()?;

        let old_key = state
            .rows
            .get(doc.id())
            .ok_or_else(|| DocumentRepositoryError::NotFound(doc.id().clone()))?
            .instance_key
            .clone();

        if *doc.instance_key() != old_key {
            if let Some(indexed_id) = state.instance_key_index.get(doc.instance_key())
                && indexed_id != doc.id()
            {
                return Err(DocumentRepositoryError::DuplicateInstanceKey(
                    doc.instance_key().clone(),
                ));
            }
        }

        let mut row = StoredRow::encode(doc)?;
        if let Some(existing) = state.rows.get(doc.id()) {
            row.created_at = existing.created_at;
        }

        if *doc.instance_key() != old_key {
            state.instance_key_index.remove(&old_key);
            state
                .instance_key_index
                .insert(doc.instance_key().clone(), doc.id().clone());
        }
        state.rows.insert(doc.id().clone(), row);
        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> DocumentRepositoryResult<Option<Document>> {
        let state = self.read_state()?;
        state.rows.get(id).map(StoredRow::decode).transpose()
    }

    async fn find_by_instance_key(
        &self,
        key: &InstanceKey,
    ) -> DocumentRepositoryResult<Option<Document>> {
        let state = self.read_state()?;
        state
            .instance_key_index
            .get(key)
            .and_then(|id| state.rows.get(id))
            .map(StoredRow::decode)
            .transpose()
    }

    async fn list_by_revision_range(
        &self,
        revisions: RangeInclusive<RevisionIndex>,
    ) -> DocumentRepositoryResult<Vec<Document>> {
        let state = self.read_state()?;
        let mut rows: Vec<&StoredRow> = state
            .rows
            .values()
            .filter(|row| revisions.contains(&row.revision_index))
            .collect();
        rows.sort_by(|a, b| (a.revision_index, &a.id).cmp(&(b.revision_index, &b.id)));
        rows.into_iter().map(StoredRow::decode).collect()
    }

    async fn delete(&self, id: &DocumentId) -> DocumentRepositoryResult<()> {
        let mut state = self.write_state()?;
        let row = state
            .rows
            .remove(id)
            .ok_or_else(|| DocumentRepositoryError::NotFound(id.clone()))?;
        state.instance_key_index.remove(&row.instance_key);
        Ok(())
    }
}
