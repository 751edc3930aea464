//! Field selection for the find path.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Document;

/// Ordered set of fields to retain in found documents.
///
/// The store keeps its own key field (`_id`) unless it is excluded
/// explicitly by the engine; every other field not listed is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Projection {
    fields: Vec<String>,
}

impl Projection {
    /// Creates a projection over the given fields, dropping duplicates.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut projection = Self::default();
        for field in fields {
            let field = field.into();
            if !projection.fields.contains(&field) {
                projection.fields.push(field);
            }
        }
        projection
    }

    /// Returns the selected fields in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns whether the field is selected.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Returns whether no field is selected.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Builds an inclusion document, e.g. `{ "name": 1, "quantity": 1 }`.
    pub fn to_document(&self) -> Document {
        self.fields
            .iter()
            .map(|field| (field.clone(), Value::from(1)))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Projection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn duplicates_are_dropped() {
        let projection = Projection::new(["name", "quantity", "name"]);
        assert_eq!(projection.fields(), ["name", "quantity"]);
        assert!(projection.contains("quantity"));
        assert!(!projection.contains("price"));
    }

    #[test]
    fn inclusion_document() {
        let projection: Projection = ["name", "quantity"].into_iter().collect();
        assert_eq!(
            Value::Object(projection.to_document()),
            json!({ "name": 1, "quantity": 1 })
        );
    }
}
