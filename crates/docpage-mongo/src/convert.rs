//! Conversion between JSON documents and BSON.

use bson::Bson;
use docpage::{Collation, CollationStrength, Document, Error, Result, SortKey};
use serde_json::Value;

/// Converts a JSON document into a BSON document.
///
/// Extended JSON wrappers such as `{ "$oid": ... }` and `{ "$date": ... }`
/// are recognized and turned into their BSON types.
pub fn to_bson_document(document: Document) -> Result<bson::Document> {
    match Bson::try_from(Value::Object(document)) {
        Ok(Bson::Document(document)) => Ok(document),
        Ok(other) => Err(Error::invalid_query()
            .with_message(format!("expected a document, found {:?}", other.element_type()))),
        Err(error) => Err(Error::invalid_query()
            .with_message("document is not valid extended JSON")
            .with_source(error)),
    }
}

/// Converts a BSON document into a JSON document.
pub fn to_json_document(document: bson::Document) -> Document {
    document
        .into_iter()
        .map(|(key, value)| (key, to_json_value(value)))
        .collect()
}

/// Converts a BSON value into JSON.
///
/// Object identifiers become hexadecimal strings and dates become RFC 3339
/// strings; everything else uses relaxed extended JSON.
pub fn to_json_value(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(date) => match date.try_to_rfc3339_string() {
            Ok(date) => Value::String(date),
            Err(_) => Bson::DateTime(date).into_relaxed_extjson(),
        },
        Bson::Document(document) => Value::Object(to_json_document(document)),
        Bson::Array(values) => Value::Array(values.into_iter().map(to_json_value).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Builds an ordered sort document from sort keys.
pub fn sort_document(keys: &[SortKey]) -> Result<bson::Document> {
    to_bson_document(SortKey::to_document(keys))
}

/// Converts a collation into the driver's representation.
pub fn to_driver_collation(collation: &Collation) -> mongodb::options::Collation {
    let strength = collation.strength.map(|strength| match strength {
        CollationStrength::Primary => mongodb::options::CollationStrength::Primary,
        CollationStrength::Secondary => mongodb::options::CollationStrength::Secondary,
        CollationStrength::Tertiary => mongodb::options::CollationStrength::Tertiary,
        CollationStrength::Quaternary => mongodb::options::CollationStrength::Quaternary,
        CollationStrength::Identical => mongodb::options::CollationStrength::Identical,
    });

    mongodb::options::Collation::builder()
        .locale(collation.locale.clone())
        .strength(strength)
        .case_level(collation.case_level)
        .numeric_ordering(collation.numeric_ordering)
        .build()
}
