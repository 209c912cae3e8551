//! Classification of Diesel errors into repository errors.

use crate::column::{decode_failure, encode_failure};
use crate::document::{
    domain::{DocumentId, InstanceKey},
    ports::{DocumentRepositoryError, DocumentRepositoryResult},
};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Name of the unique constraint on `document.instance_key`.
pub(super) const INSTANCE_KEY_CONSTRAINT: &str = "document_instance_key_key";

/// Maps an insert failure. Any unique violation other than the instance key
/// constraint is the primary key.
pub(super) fn insert_error(
    err: DieselError,
    id: &DocumentId,
    key: &InstanceKey,
) -> DocumentRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_instance_key_violation(info.as_ref()) =>
        {
            DocumentRepositoryError::DuplicateInstanceKey(key.clone())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DocumentRepositoryError::DuplicateDocumentId(id.clone())
        }
        other => write_error(other),
    }
}

/// Maps an update failure. The primary key is never rewritten, so only the
/// instance key can collide.
pub(super) fn update_error(err: DieselError, key: &InstanceKey) -> DocumentRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_instance_key_violation(info.as_ref()) =>
        {
            DocumentRepositoryError::DuplicateInstanceKey(key.clone())
        }
        other => write_error(other),
    }
}

pub(super) fn read_error(err: DieselError) -> DocumentRepositoryError {
    if decode_failure(&err).is_some() {
        return DocumentRepositoryError::decode(err);
    }
    DocumentRepositoryError::persistence(err)
}

pub(super) fn write_error(err: DieselError) -> DocumentRepositoryError {
    if encode_failure(&err).is_some() {
        return DocumentRepositoryError::encode(err);
    }
    DocumentRepositoryError::persistence(err)
}

/// Turns a zero row count from `UPDATE`/`DELETE` into `NotFound`.
pub(super) fn require_affected(count: usize, id: DocumentId) -> DocumentRepositoryResult<()> {
    if count == 0 {
        return Err(DocumentRepositoryError::NotFound(id));
    }
    Ok(())
}

fn is_instance_key_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == INSTANCE_KEY_CONSTRAINT)
}
