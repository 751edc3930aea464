//! Value lookup and store-like ordering of JSON values.

use std::cmp::Ordering;

use docpage::{Collation, Document, SortKey};
use serde_json::Value;

/// Resolves a dotted field path, e.g. `dimensions.width`.
pub(crate) fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(object) => object.get(segment)?,
            Value::Array(array) => array.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Type bracket of a value; values of different brackets never compare equal
/// and order by bracket. Missing fields sort as null.
fn bracket(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

/// Returns whether both values fall in the same type bracket.
pub(crate) fn same_bracket(a: Option<&Value>, b: Option<&Value>) -> bool {
    bracket(a) == bracket(b)
}

/// Compares two values the way the store orders them.
pub(crate) fn compare(a: Option<&Value>, b: Option<&Value>, collation: Option<&Collation>) -> Ordering {
    let by_bracket = bracket(a).cmp(&bracket(b));
    if by_bracket != Ordering::Equal {
        return by_bracket;
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => compare_strings(x, y, collation),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Array(x)), Some(Value::Array(y))) => {
            for (x, y) in x.iter().zip(y) {
                let ordering = compare(Some(x), Some(y), collation);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        (Some(Value::Object(x)), Some(Value::Object(y))) => {
            for ((kx, vx), (ky, vy)) in x.iter().zip(y) {
                let ordering = kx
                    .cmp(ky)
                    .then_with(|| compare(Some(vx), Some(vy), collation));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => Ordering::Equal,
    }
}

fn compare_strings(x: &str, y: &str, collation: Option<&Collation>) -> Ordering {
    if collation.is_some_and(Collation::ignores_case) {
        x.to_lowercase().cmp(&y.to_lowercase())
    } else {
        x.cmp(y)
    }
}

/// Returns whether two values are equal under the collation.
pub(crate) fn equals(a: Option<&Value>, b: Option<&Value>, collation: Option<&Collation>) -> bool {
    same_bracket(a, b) && compare(a, b, collation) == Ordering::Equal
}

/// Stable multi-key sort of documents, primary key first.
pub(crate) fn sort_documents(
    documents: &mut [Document],
    keys: &[SortKey],
    collation: Option<&Collation>,
) {
    if keys.is_empty() {
        return;
    }

    documents.sort_by(|a, b| {
        keys.iter()
            .map(|key| {
                let ordering = compare(lookup(a, &key.field), lookup(b, &key.field), collation);
                if key.direction.is_desc() {
                    ordering.reverse()
                } else {
                    ordering
                }
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use docpage::{CollationStrength, document_from_value};
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        document_from_value(value).unwrap()
    }

    #[test]
    fn dotted_lookup() {
        let document = doc(json!({ "size": { "w": 3, "tags": ["a", "b"] } }));
        assert_eq!(lookup(&document, "size.w"), Some(&json!(3)));
        assert_eq!(lookup(&document, "size.tags.1"), Some(&json!("b")));
        assert_eq!(lookup(&document, "size.h"), None);
    }

    #[test]
    fn brackets_order_across_types() {
        assert_eq!(compare(None, Some(&json!(1)), None), Ordering::Less);
        assert_eq!(compare(Some(&json!(100)), Some(&json!("1")), None), Ordering::Less);
        assert_eq!(compare(Some(&json!(2)), Some(&json!(10.5)), None), Ordering::Less);
    }

    #[test]
    fn collation_folds_case() {
        let collation = Collation::new("en").with_strength(CollationStrength::Secondary);
        let (a, b) = (json!("apple"), json!("Banana"));

        assert_eq!(compare(Some(&a), Some(&b), None), Ordering::Greater);
        assert_eq!(compare(Some(&a), Some(&b), Some(&collation)), Ordering::Less);
        assert!(equals(Some(&json!("LAMP")), Some(&json!("lamp")), Some(&collation)));
    }

    #[test]
    fn multi_key_sort_breaks_ties() {
        let mut documents = vec![
            doc(json!({ "name": "a", "price": 10, "quantity": 1 })),
            doc(json!({ "name": "b", "price": 20, "quantity": 1 })),
            doc(json!({ "name": "c", "price": 10, "quantity": 5 })),
        ];

        sort_documents(
            &mut documents,
            &[SortKey::desc("price"), SortKey::desc("quantity")],
            None,
        );

        let names: Vec<_> = documents.iter().map(|d| d["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["b", "c", "a"]);
    }
}
