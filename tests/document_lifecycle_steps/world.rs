//! Shared world state for document persistence BDD scenarios.

use std::sync::Arc;

use crate::test_helpers::{InMemoryService, in_memory_service};
use deckhand_store::document::{
    adapters::memory::InMemoryDocumentRepository,
    domain::Document,
    services::{CreateDocumentRequest, DocumentServiceError},
};
use rstest::fixture;
use serde_json::{Value, json};

/// Scenario world for document persistence behaviour tests.
pub struct DocumentWorld {
    /// Repository handle for raw column access.
    pub repository: Arc<InMemoryDocumentRepository>,
    /// The document service under test.
    pub service: InMemoryService,
    /// Request queued for creation.
    pub pending: Option<CreateDocumentRequest>,
    /// Documents stored during the scenario, in creation order.
    pub stored: Vec<Document>,
    /// Result of the last create attempt.
    pub last_create_result: Option<Result<Document, DocumentServiceError>>,
    /// Result of the last lookup.
    pub last_load_result: Option<Result<Option<Document>, DocumentServiceError>>,
}

impl DocumentWorld {
    /// Creates a world over an empty repository.
    #[must_use]
    pub fn new() -> Self {
        let (repository, service) = in_memory_service();
        Self {
            repository,
            service,
            pending: None,
            stored: Vec::new(),
            last_create_result: None,
            last_load_result: None,
        }
    }

    /// Returns the document stored under `id` during the scenario.
    pub fn stored_document(&self, id: &str) -> Result<&Document, eyre::Report> {
        self.stored
            .iter()
            .find(|doc| doc.id().as_str() == id)
            .ok_or_else(|| eyre::eyre!("document '{id}' was not stored in this scenario"))
    }
}

impl Default for DocumentWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DocumentWorld {
    DocumentWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Sample metadata payload.
pub fn sample_metadata(id: &str) -> Value {
    json!({"name": id, "storagePolicy": "cleartext"})
}

/// Sample data payload with nesting and a null leaf.
pub fn sample_data() -> Value {
    json!({"a": [1, 2, 3], "b": {"c": null}})
}

/// Builds a [`CreateDocumentRequest`] with sample payloads.
pub fn build_request(id: &str, revision: i32, key: &str) -> CreateDocumentRequest {
    CreateDocumentRequest::new(
        id,
        revision,
        "deckhand/Certificate/v1",
        key,
        sample_metadata(id),
        sample_data(),
    )
}
