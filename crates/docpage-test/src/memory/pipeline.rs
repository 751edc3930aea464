//! Aggregation stages supported by the in-memory engine.

use docpage::{Collation, Document, Error, Result, SortDirection, SortKey};
use serde_json::Value;

use super::compare::{lookup, sort_documents};
use super::filter::matches;

/// A single parsed pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Stage {
    Match(Document),
    Project(Document),
    Sort(Vec<SortKey>),
    Skip(usize),
    Limit(usize),
    Unset(Vec<String>),
}

impl Stage {
    /// Parses a stage document of the form `{ "$name": spec }`.
    pub(crate) fn parse(stage: &Document) -> Result<Self> {
        let mut entries = stage.iter();
        let (Some((name, spec)), None) = (entries.next(), entries.next()) else {
            return Err(Error::invalid_query()
                .with_message("a pipeline stage must have exactly one field"));
        };

        match name.as_str() {
            "$match" => Ok(Self::Match(expect_document(name, spec)?.clone())),
            "$project" => Ok(Self::Project(expect_document(name, spec)?.clone())),
            "$sort" => parse_sort(expect_document(name, spec)?).map(Self::Sort),
            "$skip" => expect_count(name, spec).map(Self::Skip),
            "$limit" => match expect_count(name, spec)? {
                0 => Err(Error::invalid_query().with_message("$limit must be positive")),
                limit => Ok(Self::Limit(limit)),
            },
            "$unset" => parse_unset(spec).map(Self::Unset),
            other => Err(Error::invalid_query()
                .with_message(format!("unsupported pipeline stage '{other}'"))),
        }
    }

    /// Applies the stage to the current document stream.
    pub(crate) fn apply(
        &self,
        documents: Vec<Document>,
        collation: Option<&Collation>,
    ) -> Result<Vec<Document>> {
        match self {
            Self::Match(filter) => {
                let mut matched = Vec::with_capacity(documents.len());
                for document in documents {
                    if matches(&document, filter, collation)? {
                        matched.push(document);
                    }
                }
                Ok(matched)
            }
            Self::Project(spec) => documents
                .iter()
                .map(|document| project(document, spec))
                .collect(),
            Self::Sort(keys) => {
                let mut documents = documents;
                sort_documents(&mut documents, keys, collation);
                Ok(documents)
            }
            Self::Skip(skip) => Ok(documents.into_iter().skip(*skip).collect()),
            Self::Limit(limit) => Ok(documents.into_iter().take(*limit).collect()),
            Self::Unset(fields) => Ok(documents
                .into_iter()
                .map(|mut document| {
                    for field in fields {
                        remove_path(&mut document, field);
                    }
                    document
                })
                .collect()),
        }
    }
}

/// Runs a whole pipeline over the documents.
pub(crate) fn run(
    stages: &[Document],
    documents: Vec<Document>,
    collation: Option<&Collation>,
) -> Result<Vec<Document>> {
    let stages = stages.iter().map(Stage::parse).collect::<Result<Vec<_>>>()?;
    stages
        .iter()
        .try_fold(documents, |documents, stage| stage.apply(documents, collation))
}

fn expect_document<'a>(name: &str, spec: &'a Value) -> Result<&'a Document> {
    match spec {
        Value::Object(document) => Ok(document),
        _ => Err(Error::invalid_query().with_message(format!("{name} takes a document"))),
    }
}

fn expect_count(name: &str, spec: &Value) -> Result<usize> {
    spec.as_u64()
        .or_else(|| spec.as_f64().filter(|n| n.fract() == 0.0 && *n >= 0.0).map(|n| n as u64))
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            Error::invalid_query().with_message(format!("{name} takes a non-negative integer"))
        })
}

fn parse_sort(spec: &Document) -> Result<Vec<SortKey>> {
    if spec.is_empty() {
        return Err(Error::invalid_query().with_message("$sort needs at least one key"));
    }

    spec.iter()
        .map(|(field, direction)| match SortDirection::from_value(direction) {
            Some(SortDirection::Meta(_)) => Err(Error::invalid_query()
                .with_message("$meta sort is not supported by the in-memory engine")),
            Some(direction) => Ok(SortKey::new(field.clone(), direction)),
            None => Err(Error::invalid_query()
                .with_message(format!("invalid sort direction for '{field}'"))),
        })
        .collect()
}

fn parse_unset(spec: &Value) -> Result<Vec<String>> {
    let invalid = || Error::invalid_query().with_message("$unset takes a field name or an array of them");
    match spec {
        Value::String(field) => Ok(vec![field.clone()]),
        Value::Array(fields) => fields
            .iter()
            .map(|field| field.as_str().map(str::to_owned).ok_or_else(invalid))
            .collect(),
        _ => Err(invalid()),
    }
}

fn truthy(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(n) => Some(n.as_f64() != Some(0.0)),
        _ => None,
    }
}

/// Applies a `$project` specification to one document.
///
/// Inclusion keeps `_id` unless it is excluded explicitly; string values of
/// the form `"$path"` copy the referenced field under a new name.
pub(crate) fn project(document: &Document, spec: &Document) -> Result<Document> {
    let mut includes = Vec::new();
    let mut excludes = Vec::new();
    let mut exclude_id = false;

    for (field, value) in spec {
        match (truthy(value), value) {
            (Some(false), _) if field == "_id" => exclude_id = true,
            (Some(true), _) => includes.push((field.as_str(), None)),
            (Some(false), _) => excludes.push(field.as_str()),
            (None, Value::String(reference)) if reference.starts_with('$') => {
                includes.push((field.as_str(), Some(&reference[1..])))
            }
            _ => {
                return Err(Error::invalid_query()
                    .with_message(format!("invalid projection value for '{field}'")));
            }
        }
    }

    if !includes.is_empty() && !excludes.is_empty() {
        return Err(Error::invalid_query()
            .with_message("cannot mix inclusion and exclusion in a projection"));
    }

    if includes.is_empty() {
        let mut projected = document.clone();
        for field in excludes {
            remove_path(&mut projected, field);
        }
        if exclude_id {
            projected.remove("_id");
        }
        return Ok(projected);
    }

    let mut projected = Document::new();
    if !exclude_id && let Some(id) = document.get("_id") {
        projected.insert("_id".to_owned(), id.clone());
    }
    for (field, source) in includes {
        if let Some(value) = lookup(document, source.unwrap_or(field)) {
            set_path(&mut projected, field, value.clone());
        }
    }

    Ok(projected)
}

fn set_path(document: &mut Document, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            document.insert(path.to_owned(), value);
        }
        Some((head, rest)) => {
            let child = document
                .entry(head.to_owned())
                .or_insert_with(|| Value::Object(Document::new()));
            if !child.is_object() {
                *child = Value::Object(Document::new());
            }
            if let Value::Object(child) = child {
                set_path(child, rest, value);
            }
        }
    }
}

fn remove_path(document: &mut Document, path: &str) {
    match path.split_once('.') {
        None => {
            document.remove(path);
        }
        Some((head, rest)) => {
            if let Some(Value::Object(child)) = document.get_mut(head) {
                remove_path(child, rest);
            }
        }
    }
}
