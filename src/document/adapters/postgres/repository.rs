//! `PostgreSQL` repository implementation for document storage.

use super::{
    errors::{insert_error, read_error, require_affected, update_error},
    models::{DocumentChangeset, DocumentRow, NewDocumentRow},
    schema::document,
};
use crate::column::JsonText;
use crate::document::{
    domain::{
        Document, DocumentId, DocumentSchema, InstanceKey, PersistedDocumentData, RevisionIndex,
    },
    ports::{DocumentRepository, DocumentRepositoryError, DocumentRepositoryResult},
};
use crate::timestamps::Timestamped;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use std::ops::RangeInclusive;

/// `PostgreSQL` connection pool type used by document adapters.
pub type DocumentPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed document repository.
#[derive(Debug, Clone)]
pub struct PostgresDocumentRepository {
    pool: DocumentPgPool,
}

impl PostgresDocumentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: DocumentPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> DocumentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> DocumentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(DocumentRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(DocumentRepositoryError::persistence)?
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn insert(&self, doc: &Document) -> DocumentRepositoryResult<()> {
        let document_id = doc.id().clone();
        let instance_key = doc.instance_key().clone();
        let new_row = to_new_row(doc);

        self.run_blocking(move |connection| {
            diesel::insert_into(document::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| insert_error(err, &document_id, &instance_key))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, doc: &Document) -> DocumentRepositoryResult<()> {
        let document_id = doc.id().clone();
        let instance_key = doc.instance_key().clone();
        let changeset = to_changeset(doc);

        self.run_blocking(move |connection| {
            let updated_count =
                diesel::update(document::table.filter(document::id.eq(document_id.as_str())))
                    .set(&changeset)
                    .execute(connection)
                    .map_err(|err| update_error(err, &instance_key))?;
            require_affected(updated_count, document_id)
        })
        .await
    }

    async fn find_by_id(&self, id: &DocumentId) -> DocumentRepositoryResult<Option<Document>> {
        let id_str = id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = document::table
                .filter(document::id.eq(&id_str))
                .select(DocumentRow::as_select())
                .first::<DocumentRow>(connection)
                .optional()
                .map_err(read_error)?;
            row.map(row_to_document).transpose()
        })
        .await
    }

    async fn find_by_instance_key(
        &self,
        key: &InstanceKey,
    ) -> DocumentRepositoryResult<Option<Document>> {
        let key_str = key.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = document::table
                .filter(document::instance_key.eq(&key_str))
                .select(DocumentRow::as_select())
                .first::<DocumentRow>(connection)
                .optional()
                .map_err(read_error)?;
            row.map(row_to_document).transpose()
        })
        .await
    }

    async fn list_by_revision_range(
        &self,
        revisions: RangeInclusive<RevisionIndex>,
    ) -> DocumentRepositoryResult<Vec<Document>> {
        let (first, last) = (revisions.start().value(), revisions.end().value());
        self.run_blocking(move |connection| {
            let rows = document::table
                .filter(document::revision_index.between(first, last))
                .order((document::revision_index.asc(), document::id.asc()))
                .select(DocumentRow::as_select())
                .load::<DocumentRow>(connection)
                .map_err(read_error)?;
            rows.into_iter().map(row_to_document).collect()
        })
        .await
    }

    async fn delete(&self, id: &DocumentId) -> DocumentRepositoryResult<()> {
        let document_id = id.clone();
        self.run_blocking(move |connection| {
            let deleted_count =
                diesel::delete(document::table.filter(document::id.eq(document_id.as_str())))
                    .execute(connection)
                    .map_err(DocumentRepositoryError::persistence)?;
            require_affected(deleted_count, document_id)
        })
        .await
    }
}

fn to_new_row(doc: &Document) -> NewDocumentRow {
    NewDocumentRow {
        id: doc.id().as_str().to_owned(),
        revision_index: doc.revision_index().value(),
        document_schema: doc.document_schema().as_str().to_owned(),
        instance_key: doc.instance_key().as_str().to_owned(),
        document_metadata: JsonText::new(doc.document_metadata().clone()),
        document_data: JsonText::new(doc.document_data().clone()),
        created_at: doc.created_at(),
        updated_at: doc.updated_at(),
    }
}

fn to_changeset(doc: &Document) -> DocumentChangeset {
    DocumentChangeset {
        revision_index: doc.revision_index().value(),
        document_schema: doc.document_schema().as_str().to_owned(),
        instance_key: doc.instance_key().as_str().to_owned(),
        document_metadata: JsonText::new(doc.document_metadata().clone()),
        document_data: JsonText::new(doc.document_data().clone()),
        updated_at: doc.updated_at(),
    }
}

fn row_to_document(row: DocumentRow) -> DocumentRepositoryResult<Document> {
    let DocumentRow {
        id,
        revision_index,
        document_schema,
        instance_key,
        document_metadata,
        document_data,
        created_at,
        updated_at,
    } = row;

    let data = PersistedDocumentData {
        id: DocumentId::new(id).map_err(DocumentRepositoryError::invalid_persisted_data)?,
        revision_index: RevisionIndex::new(revision_index),
        document_schema: DocumentSchema::new(document_schema)
            .map_err(DocumentRepositoryError::invalid_persisted_data)?,
        instance_key: InstanceKey::new(instance_key)
            .map_err(DocumentRepositoryError::invalid_persisted_data)?,
        document_metadata: document_metadata.into_inner(),
        document_data: document_data.into_inner(),
        created_at,
        updated_at,
    };
    Document::from_persisted(data).map_err(DocumentRepositoryError::invalid_persisted_data)
}
