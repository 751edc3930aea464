//! Evaluation of store-style match predicates against documents.

use docpage::{Collation, Document, Error, Result};
use serde_json::Value;

use super::compare::{compare, equals, lookup, same_bracket};

/// Returns whether `document` satisfies `filter`.
///
/// An empty filter matches every document. Unknown operators are rejected
/// as invalid queries, the way the store rejects them.
pub(crate) fn matches(
    document: &Document,
    filter: &Document,
    collation: Option<&Collation>,
) -> Result<bool> {
    for (key, condition) in filter {
        let matched = match key.as_str() {
            "$and" => all_of(document, condition, collation)?,
            "$or" => any_of(document, condition, collation)?,
            "$nor" => !any_of(document, condition, collation)?,
            operator if operator.starts_with('$') => {
                return Err(unknown_operator(operator));
            }
            field => field_matches(lookup(document, field), condition, collation)?,
        };

        if !matched {
            return Ok(false);
        }
    }

    Ok(true)
}

fn sub_filters(condition: &Value) -> Result<Vec<&Document>> {
    let Value::Array(filters) = condition else {
        return Err(Error::invalid_query().with_message("logical operators take an array"));
    };

    filters
        .iter()
        .map(|filter| match filter {
            Value::Object(filter) => Ok(filter),
            _ => Err(Error::invalid_query().with_message("logical operands must be documents")),
        })
        .collect()
}

fn all_of(document: &Document, condition: &Value, collation: Option<&Collation>) -> Result<bool> {
    for filter in sub_filters(condition)? {
        if !matches(document, filter, collation)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn any_of(document: &Document, condition: &Value, collation: Option<&Collation>) -> Result<bool> {
    for filter in sub_filters(condition)? {
        if matches(document, filter, collation)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn is_operator_document(condition: &Value) -> bool {
    match condition {
        Value::Object(object) => {
            !object.is_empty() && object.keys().all(|key| key.starts_with('$'))
        }
        _ => false,
    }
}

fn field_matches(
    value: Option<&Value>,
    condition: &Value,
    collation: Option<&Collation>,
) -> Result<bool> {
    let Value::Object(operators) = condition else {
        return Ok(equal_or_contains(value, condition, collation));
    };

    if !is_operator_document(condition) {
        return Ok(equal_or_contains(value, condition, collation));
    }

    for (operator, operand) in operators {
        let matched = match operator.as_str() {
            "$eq" => equal_or_contains(value, operand, collation),
            "$ne" => !equal_or_contains(value, operand, collation),
            "$gt" => ordered(value, operand, collation, |o| o.is_gt()),
            "$gte" => ordered(value, operand, collation, |o| o.is_ge()),
            "$lt" => ordered(value, operand, collation, |o| o.is_lt()),
            "$lte" => ordered(value, operand, collation, |o| o.is_le()),
            "$in" => in_list(value, operand, collation)?,
            "$nin" => !in_list(value, operand, collation)?,
            "$exists" => match operand {
                Value::Bool(expected) => value.is_some() == *expected,
                _ => return Err(Error::invalid_query().with_message("$exists takes a boolean")),
            },
            other => return Err(unknown_operator(other)),
        };

        if !matched {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Equality, where an array field also matches when any element is equal.
fn equal_or_contains(value: Option<&Value>, expected: &Value, collation: Option<&Collation>) -> bool {
    if equals(value, Some(expected), collation) {
        return true;
    }

    match value {
        Some(Value::Array(elements)) => elements
            .iter()
            .any(|element| equals(Some(element), Some(expected), collation)),
        _ => false,
    }
}

/// Range comparison; only values of the same type bracket are comparable.
fn ordered(
    value: Option<&Value>,
    operand: &Value,
    collation: Option<&Collation>,
    accept: impl Fn(std::cmp::Ordering) -> bool,
) -> bool {
    let check = |candidate: &Value| {
        same_bracket(Some(candidate), Some(operand))
            && accept(compare(Some(candidate), Some(operand), collation))
    };

    match value {
        Some(Value::Array(elements)) if !operand.is_array() => elements.iter().any(check),
        Some(candidate) => check(candidate),
        None => false,
    }
}

fn in_list(value: Option<&Value>, operand: &Value, collation: Option<&Collation>) -> Result<bool> {
    let Value::Array(candidates) = operand else {
        return Err(Error::invalid_query().with_message("$in and $nin take an array"));
    };

    Ok(candidates
        .iter()
        .any(|candidate| equal_or_contains(value, candidate, collation)))
}

fn unknown_operator(operator: &str) -> Error {
    Error::invalid_query().with_message(format!("unknown operator '{operator}'"))
}

#[cfg(test)]
mod tests {
    use docpage::{CollationStrength, ErrorKind, document_from_value};
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        document_from_value(value).unwrap()
    }

    fn product() -> Document {
        doc(json!({
            "name": "Desk Lamp",
            "quantity": 4,
            "price": 45.0,
            "tags": ["light", "office"]
        }))
    }

    fn check(filter: Value) -> bool {
        matches(&product(), &doc(filter), None).unwrap()
    }

    #[test]
    fn empty_filter_matches() {
        assert!(check(json!({})));
    }

    #[test]
    fn implicit_equality() {
        assert!(check(json!({ "quantity": 4 })));
        assert!(check(json!({ "quantity": 4.0 })));
        assert!(!check(json!({ "quantity": "4" })));
        assert!(check(json!({ "tags": "office" })));
    }

    #[test]
    fn comparison_operators() {
        assert!(check(json!({ "quantity": { "$gt": 0 } })));
        assert!(check(json!({ "price": { "$gte": 45, "$lt": 50 } })));
        assert!(!check(json!({ "price": { "$lte": 44.99 } })));
        assert!(!check(json!({ "name": { "$gt": 3 } })));
        assert!(check(json!({ "quantity": { "$ne": 5 } })));
    }

    #[test]
    fn membership_and_existence() {
        assert!(check(json!({ "quantity": { "$in": [1, 4, 9] } })));
        assert!(check(json!({ "tags": { "$nin": ["garden"] } })));
        assert!(check(json!({ "discount": { "$exists": false } })));
        assert!(!check(json!({ "price": { "$exists": false } })));
    }

    #[test]
    fn logical_operators() {
        assert!(check(json!({ "$or": [{ "quantity": 0 }, { "price": 45.0 }] })));
        assert!(!check(json!({ "$and": [{ "quantity": 4 }, { "price": 1 }] })));
        assert!(check(json!({ "$nor": [{ "quantity": 0 }] })));
    }

    #[test]
    fn collation_applies_to_equality() {
        let collation = Collation::new("en").with_strength(CollationStrength::Primary);
        let filter = doc(json!({ "name": "desk lamp" }));
        assert!(!matches(&product(), &filter, None).unwrap());
        assert!(matches(&product(), &filter, Some(&collation)).unwrap());
    }

    #[test]
    fn unknown_operators_are_rejected() {
        let error = matches(&product(), &doc(json!({ "price": { "$near": 1 } })), None).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidQuery);

        let error = matches(&product(), &doc(json!({ "$where": "true" })), None).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidQuery);
    }
}
