//! Raw, untyped documents as exchanged with pagination engines.

use serde_json::Value;

use crate::{Error, Result};

/// An untyped, self-describing key/value document.
///
/// Engines return documents in this shape; the [`Decoder`] turns them into
/// typed records. Filters, projections and pipeline stages use the same
/// representation.
///
/// [`Decoder`]: crate::Decoder
pub type Document = serde_json::Map<String, Value>;

/// Converts a JSON value into a [`Document`].
///
/// Only objects are documents; any other value is rejected as an invalid
/// query, since filters and pipeline stages are the values passed through here.
pub fn document_from_value(value: Value) -> Result<Document> {
    match value {
        Value::Object(document) => Ok(document),
        other => Err(Error::invalid_query().with_message(format!(
            "expected a document, found {}",
            value_type_name(&other)
        ))),
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a document",
    }
}
