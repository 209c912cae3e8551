//! Custom column types registered with Diesel.
//!
//! The only adapter today is the JSON text column: structured values are
//! encoded as JSON text on write and parsed back on read.

mod error;
mod finite;
mod json_text;

pub use error::JsonTextError;
pub use json_text::{JsonText, JsonTextType, decode_failure, encode_failure};
