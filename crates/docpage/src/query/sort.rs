//! Sort keys for paginated queries.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Sort direction for a single key.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order (A-Z, oldest first, smallest first).
    #[default]
    Asc,
    /// Descending order (Z-A, newest first, largest first).
    Desc,
    /// Store-native scoring directive, e.g. `textScore` for full text search.
    Meta(String),
}

impl SortDirection {
    /// Creates a store-native scoring directive.
    pub fn meta(name: impl Into<String>) -> Self {
        Self::Meta(name.into())
    }

    /// Returns the direction as a sort document value: `1`, `-1` or `{ "$meta": name }`.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Asc => json!(1),
            Self::Desc => json!(-1),
            Self::Meta(name) => json!({ "$meta": name }),
        }
    }

    /// Parses a sort document value back into a direction.
    ///
    /// Accepts positive/negative numbers, `"asc"`/`"desc"` and `{ "$meta": name }`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(n) if n > 0.0 => Some(Self::Asc),
                Some(n) if n < 0.0 => Some(Self::Desc),
                _ => None,
            },
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "asc" | "ascending" => Some(Self::Asc),
                "desc" | "descending" => Some(Self::Desc),
                _ => None,
            },
            Value::Object(o) => o
                .get("$meta")
                .and_then(Value::as_str)
                .map(|name| Self::Meta(name.to_owned())),
            _ => None,
        }
    }

    /// Returns whether the direction is descending.
    #[inline]
    pub fn is_desc(&self) -> bool {
        matches!(self, Self::Desc)
    }
}

impl From<i32> for SortDirection {
    /// Mirrors the store convention: negative is descending, anything else ascending.
    fn from(value: i32) -> Self {
        if value < 0 { Self::Desc } else { Self::Asc }
    }
}

/// One `(field, direction)` entry of an ordered sort specification.
///
/// The first key is the primary sort; later keys break ties in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    /// Creates a new sort key.
    #[inline]
    pub fn new(field: impl Into<String>, direction: impl Into<SortDirection>) -> Self {
        Self {
            field: field.into(),
            direction: direction.into(),
        }
    }

    /// Creates an ascending sort key.
    #[inline]
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Creates a descending sort key.
    #[inline]
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Builds a sort document from ordered keys, e.g. `{ "price": -1, "quantity": -1 }`.
    pub fn to_document(keys: &[SortKey]) -> crate::Document {
        keys.iter()
            .map(|key| (key.field.clone(), key.direction.to_value()))
            .collect()
    }
}
