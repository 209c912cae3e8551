//! Constraint and corruption handling for the JSON text adapter.

use crate::sqlite::helpers::{conn, document, load, record};
use deckhand_store::column::{JsonTextError, decode_failure};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use rstest::rstest;
use serde_json::json;

#[rstest]
fn duplicate_instance_key_is_a_unique_violation(mut conn: SqliteConnection) {
    let original = record("d1", "k1", json!({"name": "ca"}), json!({"pem": "---"}));
    diesel::insert_into(document::table)
        .values(&original)
        .execute(&mut conn)
        .expect("insert");

    let result = diesel::insert_into(document::table)
        .values(&record("d2", "k1", json!({}), json!({})))
        .execute(&mut conn);

    assert!(
        matches!(
            result,
            Err(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                _
            ))
        ),
        "expected unique violation, got {result:?}"
    );
    assert_eq!(load(&mut conn, "d1").expect("load"), Some(original));
    assert_eq!(load(&mut conn, "d2").expect("load"), None);
}

#[rstest]
fn corrupted_text_fails_to_load_with_a_decode_error(mut conn: SqliteConnection) {
    diesel::insert_into(document::table)
        .values(&record("d1", "k1", json!({"name": "ca"}), json!({})))
        .execute(&mut conn)
        .expect("insert");
    diesel::sql_query("UPDATE document SET document_metadata = '{not json' WHERE id = 'd1'")
        .execute(&mut conn)
        .expect("raw update");

    let err = load(&mut conn, "d1").expect_err("corrupt row must not load");

    assert!(
        matches!(decode_failure(&err), Some(JsonTextError::Decode(_))),
        "expected adapter decode failure, got {err:?}"
    );
}

#[rstest]
fn other_load_failures_are_not_reported_as_decode_errors(mut conn: SqliteConnection) {
    let err = diesel::sql_query("SELECT * FROM missing_table")
        .execute(&mut conn)
        .expect_err("query must fail");
    assert!(decode_failure(&err).is_none());
}
