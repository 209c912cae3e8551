//! Domain model for configuration documents.
//!
//! A document pairs identity, a revision reference, and a schema tag with
//! two JSON payloads. All infrastructure concerns are kept outside the
//! domain boundary.

mod document;
mod error;
mod ids;

pub use document::{Document, DocumentChanges, NewDocumentParams, PersistedDocumentData};
pub use error::DocumentDomainError;
pub use ids::{
    DocumentId, DocumentSchema, InstanceKey, MAX_DOCUMENT_ID_LENGTH, MAX_DOCUMENT_SCHEMA_LENGTH,
    MAX_INSTANCE_KEY_LENGTH, RevisionIndex,
};
