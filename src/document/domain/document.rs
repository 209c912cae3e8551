//! Document aggregate root.

use super::{DocumentDomainError, DocumentId, DocumentSchema, InstanceKey, RevisionIndex};
use crate::timestamps::{Timestamped, Timestamps};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A configuration document.
///
/// The metadata and data payloads are held by value and only ever replaced
/// as a whole. There is no mutable access to a stored payload, so every
/// change goes through [`Document::apply`] and refreshes `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    revision_index: RevisionIndex,
    document_schema: DocumentSchema,
    instance_key: InstanceKey,
    document_metadata: Value,
    document_data: Value,
    timestamps: Timestamps,
}

/// Parameter object for creating a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocumentParams {
    /// Caller-supplied primary key.
    pub id: DocumentId,
    /// Owning revision.
    pub revision_index: RevisionIndex,
    /// Payload schema tag.
    pub document_schema: DocumentSchema,
    /// Globally unique logical key.
    pub instance_key: InstanceKey,
    /// Metadata payload.
    pub document_metadata: Value,
    /// Data payload.
    pub document_data: Value,
}

/// Parameter object for reconstructing a persisted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDocumentData {
    /// Persisted primary key.
    pub id: DocumentId,
    /// Persisted revision reference.
    pub revision_index: RevisionIndex,
    /// Persisted schema tag.
    pub document_schema: DocumentSchema,
    /// Persisted instance key.
    pub instance_key: InstanceKey,
    /// Decoded metadata payload.
    pub document_metadata: Value,
    /// Decoded data payload.
    pub document_data: Value,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Replacement values for an update. Unset fields are left unchanged.
///
/// The primary key cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentChanges {
    /// New revision reference.
    pub revision_index: Option<RevisionIndex>,
    /// New schema tag.
    pub document_schema: Option<DocumentSchema>,
    /// New instance key.
    pub instance_key: Option<InstanceKey>,
    /// New metadata payload.
    pub document_metadata: Option<Value>,
    /// New data payload.
    pub document_data: Option<Value>,
}

impl DocumentChanges {
    /// Returns `true` when no field is replaced.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.revision_index.is_none()
            && self.document_schema.is_none()
            && self.instance_key.is_none()
            && self.document_metadata.is_none()
            && self.document_data.is_none()
    }
}

impl Document {
    /// Creates a document stamped with the current clock time.
    #[must_use]
    pub fn new(params: NewDocumentParams, clock: &impl Clock) -> Self {
        let NewDocumentParams {
            id,
            revision_index,
            document_schema,
            instance_key,
            document_metadata,
            document_data,
        } = params;
        Self {
            id,
            revision_index,
            document_schema,
            instance_key,
            document_metadata,
            document_data,
            timestamps: Timestamps::new(clock),
        }
    }

    /// Reconstructs a document from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentDomainError::TimestampOrder`] when the stored
    /// `updated_at` precedes `created_at`.
    pub fn from_persisted(data: PersistedDocumentData) -> Result<Self, DocumentDomainError> {
        Ok(Self {
            id: data.id,
            revision_index: data.revision_index,
            document_schema: data.document_schema,
            instance_key: data.instance_key,
            document_metadata: data.document_metadata,
            document_data: data.document_data,
            timestamps: Timestamps::from_persisted(data.created_at, data.updated_at)?,
        })
    }

    /// Returns the primary key.
    #[must_use]
    pub const fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Returns the owning revision.
    #[must_use]
    pub const fn revision_index(&self) -> RevisionIndex {
        self.revision_index
    }

    /// Returns the schema tag.
    #[must_use]
    pub const fn document_schema(&self) -> &DocumentSchema {
        &self.document_schema
    }

    /// Returns the instance key.
    #[must_use]
    pub const fn instance_key(&self) -> &InstanceKey {
        &self.instance_key
    }

    /// Returns the metadata payload.
    #[must_use]
    pub const fn document_metadata(&self) -> &Value {
        &self.document_metadata
    }

    /// Returns the data payload.
    #[must_use]
    pub const fn document_data(&self) -> &Value {
        &self.document_data
    }

    /// Replaces the fields named in `changes` and refreshes `updated_at`.
    pub fn apply(&mut self, changes: DocumentChanges, clock: &impl Clock) {
        let DocumentChanges {
            revision_index,
            document_schema,
            instance_key,
            document_metadata,
            document_data,
        } = changes;

        if let Some(value) = revision_index {
            self.revision_index = value;
        }
        if let Some(value) = document_schema {
            self.document_schema = value;
        }
        if let Some(value) = instance_key {
            self.instance_key = value;
        }
        if let Some(value) = document_metadata {
            self.document_metadata = value;
        }
        if let Some(value) = document_data {
            self.document_data = value;
        }
        self.timestamps.touch(clock);
    }
}

impl Timestamped for Document {
    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}
