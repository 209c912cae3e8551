//! Diesel row models for document persistence.

use super::schema::document;
use crate::column::JsonText;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for document records.
///
/// Both payload columns are decoded by the [`JsonText`] adapter while the
/// row is loaded.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = document)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentRow {
    /// Document identifier.
    pub id: String,
    /// Owning revision.
    pub revision_index: i32,
    /// Payload schema tag.
    pub document_schema: String,
    /// Unique logical document key.
    pub instance_key: String,
    /// Metadata payload.
    pub document_metadata: JsonText,
    /// Data payload.
    pub document_data: JsonText,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for document records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = document)]
pub struct NewDocumentRow {
    /// Document identifier.
    pub id: String,
    /// Owning revision.
    pub revision_index: i32,
    /// Payload schema tag.
    pub document_schema: String,
    /// Unique logical document key.
    pub instance_key: String,
    /// Metadata payload.
    pub document_metadata: JsonText,
    /// Data payload.
    pub document_data: JsonText,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied by document updates. The primary key and creation
/// timestamp are never rewritten.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = document)]
pub struct DocumentChangeset {
    /// Owning revision.
    pub revision_index: i32,
    /// Payload schema tag.
    pub document_schema: String,
    /// Unique logical document key.
    pub instance_key: String,
    /// Metadata payload.
    pub document_metadata: JsonText,
    /// Data payload.
    pub document_data: JsonText,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
