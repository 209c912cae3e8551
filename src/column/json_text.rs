//! JSON text column adapter.
//!
//! Structured values live in memory as [`serde_json::Value`] and in the
//! database as variable-length text. [`JsonTextType`] carries the pure
//! encode/decode pair for a column; [`JsonText`] registers the same
//! conversions with Diesel so any `Text` column declared with it is encoded
//! on write and decoded on read.

use super::JsonTextError;
use super::finite::ensure_finite;
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::Pg;
use diesel::result::Error as DieselError;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::io::Write;

/// Column descriptor for JSON values stored as text.
///
/// The declared maximum length describes the underlying column only. The
/// adapter never truncates or rejects long payloads; overflow surfaces as the
/// database driver's own error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonTextType {
    max_length: Option<u32>,
}

impl JsonTextType {
    /// Describes an unbounded `TEXT` column.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { max_length: None }
    }

    /// Describes a `VARCHAR(max_length)` column.
    #[must_use]
    pub const fn with_max_length(max_length: u32) -> Self {
        Self {
            max_length: Some(max_length),
        }
    }

    /// Returns the declared column width, if any.
    #[must_use]
    pub const fn max_length(self) -> Option<u32> {
        self.max_length
    }

    /// Returns the SQL type of the underlying storage column.
    #[must_use]
    pub fn sql_type(self) -> Cow<'static, str> {
        match self.max_length {
            Some(width) => Cow::Owned(format!("VARCHAR({width})")),
            None => Cow::Borrowed("TEXT"),
        }
    }

    /// Encodes a value for storage.
    ///
    /// `None` is the null sentinel and maps to SQL `NULL` (also `None`).
    ///
    /// # Errors
    ///
    /// Returns [`JsonTextError::Encode`] when the value cannot be written as
    /// JSON.
    pub fn encode(self, value: Option<&Value>) -> Result<Option<String>, JsonTextError> {
        value.map(|present| self.encode_value(present)).transpose()
    }

    /// Encodes a value for a `NOT NULL` column.
    ///
    /// # Errors
    ///
    /// Returns [`JsonTextError::Encode`] when the value cannot be written as
    /// JSON.
    pub fn encode_value(self, value: &Value) -> Result<String, JsonTextError> {
        encode_value(value)
    }

    /// Decodes stored column text.
    ///
    /// SQL `NULL` (`None`) yields the null sentinel.
    ///
    /// # Errors
    ///
    /// Returns [`JsonTextError::Decode`] when the text is present but is not
    /// valid JSON.
    pub fn decode(self, text: Option<&str>) -> Result<Option<Value>, JsonTextError> {
        text.map(|present| self.decode_text(present)).transpose()
    }

    /// Decodes text read from a `NOT NULL` column.
    ///
    /// # Errors
    ///
    /// Returns [`JsonTextError::Decode`] when the text is not valid JSON.
    pub fn decode_text(self, text: &str) -> Result<Value, JsonTextError> {
        decode_text(text)
    }
}

/// A JSON value bound to a `Text` column.
///
/// Use `JsonText` for `NOT NULL` columns and `Option<JsonText>` for
/// `Nullable<Text>` columns, where `None` is stored as SQL `NULL`.
///
/// The wrapped value is never exposed mutably. Changing a stored payload
/// means building a new `JsonText` and assigning it.
#[derive(Debug, Clone, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub struct JsonText(Value);

impl JsonText {
    /// Wraps an already structured value.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Converts any serializable value into a column value.
    ///
    /// # Errors
    ///
    /// Returns [`JsonTextError::Encode`] when the value is not representable
    /// in JSON, such as a map with non-string keys or a `NaN` or infinite
    /// float.
    pub fn from_serializable<T>(value: &T) -> Result<Self, JsonTextError>
    where
        T: Serialize + ?Sized,
    {
        ensure_finite(value).map_err(JsonTextError::Encode)?;
        serde_json::to_value(value)
            .map(Self)
            .map_err(JsonTextError::Encode)
    }

    /// Returns the wrapped value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Unwraps the structured value.
    #[must_use]
    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Deserializes the wrapped value into a typed structure.
    ///
    /// # Errors
    ///
    /// Returns [`JsonTextError::Decode`] when the value does not match `T`.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, JsonTextError> {
        T::deserialize(&self.0).map_err(JsonTextError::Decode)
    }
}

impl From<Value> for JsonText {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<JsonText> for Value {
    fn from(text: JsonText) -> Self {
        text.0
    }
}

impl ToSql<Text, Pg> for JsonText {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        let encoded = encode_value(&self.0)?;
        out.write_all(encoded.as_bytes())?;
        Ok(IsNull::No)
    }
}

impl ToSql<Text, Sqlite> for JsonText {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(encode_value(&self.0)?);
        Ok(IsNull::No)
    }
}

impl<DB> FromSql<Text, DB> for JsonText
where
    DB: Backend,
    String: FromSql<Text, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> deserialize::Result<Self> {
        let text = <String as FromSql<Text, DB>>::from_sql(bytes)?;
        Ok(Self(decode_text(&text)?))
    }
}

/// Returns the adapter error behind a failed row load, if the row failed
/// because a JSON text column held invalid JSON.
///
/// Diesel may wrap the adapter error with the name of the failing field, so
/// the whole source chain is searched.
#[must_use]
pub fn decode_failure(err: &DieselError) -> Option<&JsonTextError> {
    match err {
        DieselError::DeserializationError(inner) => {
            find_adapter_error(&**inner).filter(|adapter_err| adapter_err.is_decode())
        }
        _ => None,
    }
}

/// Returns the adapter error behind a failed write, if a bound JSON value
/// could not be encoded.
#[must_use]
pub fn encode_failure(err: &DieselError) -> Option<&JsonTextError> {
    match err {
        DieselError::SerializationError(inner) => {
            find_adapter_error(&**inner).filter(|adapter_err| !adapter_err.is_decode())
        }
        _ => None,
    }
}

fn find_adapter_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a JsonTextError> {
    let mut current = Some(err);
    while let Some(cause) = current {
        if let Some(adapter_err) = cause.downcast_ref::<JsonTextError>() {
            return Some(adapter_err);
        }
        current = cause.source();
    }
    None
}

fn encode_value(value: &Value) -> Result<String, JsonTextError> {
    serde_json::to_string(value).map_err(JsonTextError::Encode)
}

fn decode_text(text: &str) -> Result<Value, JsonTextError> {
    serde_json::from_str(text).map_err(JsonTextError::Decode)
}
