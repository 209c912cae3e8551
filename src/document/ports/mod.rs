//! Port contracts for document persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the document
//! service.

pub mod repository;

pub use repository::{DocumentRepository, DocumentRepositoryError, DocumentRepositoryResult};
