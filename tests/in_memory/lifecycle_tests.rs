//! End-to-end document flows through the public service API.

use crate::test_helpers::in_memory_service;
use deckhand_store::document::{
    adapters::memory::PayloadColumn,
    domain::DocumentId,
    ports::DocumentRepositoryError,
    services::{CreateDocumentRequest, DocumentServiceError, UpdateDocumentRequest},
};
use deckhand_store::timestamps::Timestamped;
use rstest::rstest;
use serde_json::{Value, json};

fn certificate(id: &str, revision: i32, key: &str, data: Value) -> CreateDocumentRequest {
    CreateDocumentRequest::new(
        id,
        revision,
        "deckhand/Certificate/v1",
        key,
        json!({"name": key, "layeringDefinition": {"layer": "site"}}),
        data,
    )
}

#[rstest]
#[tokio::test]
async fn stored_document_reads_back_with_structured_payloads() {
    let (repository, service) = in_memory_service();
    let data = json!({"a": [1, 2, 3], "b": {"c": null}});

    let created = service
        .create(certificate("d1", 1, "k1", data.clone()))
        .await
        .expect("create");
    let loaded = service
        .find_by_id("d1")
        .await
        .expect("lookup")
        .expect("document exists");

    assert_eq!(loaded, created);
    assert_eq!(loaded.document_data(), &data);
    assert_eq!(loaded.created_at(), loaded.updated_at());

    let stored = repository
        .stored_payload(&DocumentId::new("d1").expect("id"), PayloadColumn::Data)
        .expect("state")
        .expect("row");
    let reparsed: Value = serde_json::from_str(&stored).expect("stored text is JSON");
    assert_eq!(reparsed, data);
}

#[rstest]
#[tokio::test]
async fn duplicate_instance_key_leaves_first_document_in_place() {
    let (_, service) = in_memory_service();
    service
        .create(certificate("d1", 1, "k1", json!({"v": 1})))
        .await
        .expect("first create");

    let err = service
        .create(certificate("d2", 1, "k1", json!({"v": 2})))
        .await
        .expect_err("duplicate key");

    assert!(matches!(
        err,
        DocumentServiceError::Repository(DocumentRepositoryError::DuplicateInstanceKey(_))
    ));
    let holder = service
        .find_by_instance_key("k1")
        .await
        .expect("lookup")
        .expect("holder");
    assert_eq!(holder.id().as_str(), "d1");
    assert_eq!(holder.document_data(), &json!({"v": 1}));
    assert!(service.find_by_id("d2").await.expect("lookup").is_none());
}

#[rstest]
#[tokio::test]
async fn update_replaces_payload_and_refreshes_updated_at() {
    let (_, service) = in_memory_service();
    let created = service
        .create(certificate("d1", 1, "k1", json!({"v": 1})))
        .await
        .expect("create");

    let updated = service
        .update(
            "d1",
            UpdateDocumentRequest::new()
                .with_revision_index(2)
                .with_document_data(json!({"v": 2})),
        )
        .await
        .expect("update");
    let reloaded = service
        .find_by_id("d1")
        .await
        .expect("lookup")
        .expect("document exists");

    assert_eq!(reloaded, updated);
    assert_eq!(reloaded.created_at(), created.created_at());
    assert!(reloaded.updated_at() > created.updated_at());
    assert_eq!(reloaded.revision_index().value(), 2);
    assert_eq!(reloaded.document_data(), &json!({"v": 2}));
    assert_eq!(reloaded.document_metadata(), created.document_metadata());
}

#[rstest]
#[tokio::test]
async fn corrupted_payload_is_a_decode_failure() {
    let (repository, service) = in_memory_service();
    service
        .create(certificate("d1", 1, "k1", json!({})))
        .await
        .expect("create");
    repository
        .overwrite_stored_payload(
            &DocumentId::new("d1").expect("id"),
            PayloadColumn::Metadata,
            "{not json",
        )
        .expect("overwrite");

    let err = service.find_by_id("d1").await.expect_err("corrupt row");

    assert!(matches!(
        err,
        DocumentServiceError::Repository(DocumentRepositoryError::Decode(_))
    ));
    assert!(
        service.list_by_revision_range(1..=1).await.is_err(),
        "listing fails on the corrupt row as well"
    );
}

#[rstest]
#[tokio::test]
async fn revision_listing_orders_by_revision_then_id() {
    let (_, service) = in_memory_service();
    for (id, revision, key) in [("c", 2, "k3"), ("b", 1, "k2"), ("a", 2, "k1"), ("z", 4, "k4")] {
        service
            .create(certificate(id, revision, key, json!({})))
            .await
            .expect("create");
    }

    let listed = service
        .list_by_revision_range(1..=2)
        .await
        .expect("list");
    let ids: Vec<&str> = listed.iter().map(|doc| doc.id().as_str()).collect();

    assert_eq!(ids, ["b", "a", "c"]);
}

#[rstest]
#[tokio::test]
async fn deleted_document_frees_its_instance_key() {
    let (_, service) = in_memory_service();
    service
        .create(certificate("d1", 1, "k1", json!({})))
        .await
        .expect("create");

    service.delete("d1").await.expect("delete");
    service
        .create(certificate("d2", 1, "k1", json!({})))
        .await
        .expect("key is free again");

    assert!(matches!(
        service.delete("d1").await,
        Err(DocumentServiceError::Repository(
            DocumentRepositoryError::NotFound(_)
        ))
    ));
}
