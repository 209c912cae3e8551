//! `PostgreSQL` adapters for document persistence.

mod errors;
mod models;
mod repository;
mod schema;

pub use repository::{DocumentPgPool, PostgresDocumentRepository};
