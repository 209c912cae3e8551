//! Then steps for document persistence BDD scenarios.

use super::world::{DocumentWorld, run_async, sample_data, sample_metadata};
use deckhand_store::document::{
    adapters::memory::PayloadColumn,
    domain::{Document, DocumentId},
    ports::DocumentRepositoryError,
    services::DocumentServiceError,
};
use deckhand_store::timestamps::Timestamped;
use eyre::WrapErr;
use rstest_bdd_macros::then;
use serde_json::Value;

fn load(world: &DocumentWorld, id: &str) -> Result<Document, eyre::Report> {
    run_async(world.service.find_by_id(id))
        .wrap_err("find_by_id")?
        .ok_or_else(|| eyre::eyre!("expected document '{id}' to exist"))
}

#[then(r#"the document "{id}" reads back with the same payloads"#)]
fn reads_back(world: &mut DocumentWorld, id: String) -> Result<(), eyre::Report> {
    let loaded = load(world, &id)?;
    if loaded.document_metadata() != &sample_metadata(&id) {
        return Err(eyre::eyre!(
            "metadata changed: {}",
            loaded.document_metadata()
        ));
    }
    if loaded.document_data() != &sample_data() {
        return Err(eyre::eyre!("data changed: {}", loaded.document_data()));
    }
    Ok(())
}

#[then(r#"the stored data column of "{id}" is valid JSON"#)]
fn stored_data_is_json(world: &mut DocumentWorld, id: String) -> Result<(), eyre::Report> {
    let document_id = DocumentId::new(id).wrap_err("document id")?;
    let text = world
        .repository
        .stored_payload(&document_id, PayloadColumn::Data)
        .wrap_err("read stored payload")?
        .ok_or_else(|| eyre::eyre!("no stored row"))?;
    let parsed: Value = serde_json::from_str(&text).wrap_err("stored text parses as JSON")?;
    if parsed != sample_data() {
        return Err(eyre::eyre!("stored text decodes to {parsed}"));
    }
    Ok(())
}

#[then("creation fails with a duplicate instance key error")]
fn creation_fails_with_duplicate_key(world: &mut DocumentWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_create_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing create result in scenario world"))?;
    if !matches!(
        result,
        Err(DocumentServiceError::Repository(
            DocumentRepositoryError::DuplicateInstanceKey(_)
        ))
    ) {
        return Err(eyre::eyre!(
            "expected duplicate instance key error, got {result:?}"
        ));
    }
    Ok(())
}

#[then(r#"the instance key "{key}" still belongs to "{id}""#)]
fn key_still_belongs(world: &mut DocumentWorld, key: String, id: String) -> Result<(), eyre::Report> {
    let holder = run_async(world.service.find_by_instance_key(&key))
        .wrap_err("find_by_instance_key")?
        .ok_or_else(|| eyre::eyre!("no document holds '{key}'"))?;
    if holder.id().as_str() != id {
        return Err(eyre::eyre!("'{key}' belongs to {}", holder.id()));
    }
    Ok(())
}

#[then(r#"the document "{id}" has a later update timestamp"#)]
fn later_update_timestamp(world: &mut DocumentWorld, id: String) -> Result<(), eyre::Report> {
    let before = world.stored_document(&id)?.updated_at();
    let after = load(world, &id)?.updated_at();
    if after <= before {
        return Err(eyre::eyre!("updated_at did not advance: {before} -> {after}"));
    }
    Ok(())
}

#[then(r#"the creation timestamp of "{id}" is unchanged"#)]
fn creation_unchanged(world: &mut DocumentWorld, id: String) -> Result<(), eyre::Report> {
    let before = world.stored_document(&id)?.created_at();
    let after = load(world, &id)?.created_at();
    if after != before {
        return Err(eyre::eyre!("created_at moved: {before} -> {after}"));
    }
    Ok(())
}

#[then("loading fails with a decode error")]
fn loading_fails_with_decode(world: &mut DocumentWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_load_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing load result in scenario world"))?;
    if !matches!(
        result,
        Err(DocumentServiceError::Repository(
            DocumentRepositoryError::Decode(_)
        ))
    ) {
        return Err(eyre::eyre!("expected decode error, got {result:?}"));
    }
    Ok(())
}
