//! In-memory adapters for document persistence.

mod repository;

pub use repository::{InMemoryDocumentRepository, PayloadColumn};
