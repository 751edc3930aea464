//! Construction of the paginating aggregation pipeline.

use bson::{Bson, doc};
use docpage::engine::PageWindow;
use docpage::{Error, Result};

/// Name of the facet holding the match count.
pub(crate) const TOTAL_FACET: &str = "total";
/// Name of the facet holding the page documents.
pub(crate) const DATA_FACET: &str = "data";

/// Appends a `$facet` stage that counts the pipeline output and slices one
/// page out of it, sorted by `sort` when given.
pub(crate) fn paginate(
    mut stages: Vec<bson::Document>,
    sort: Option<bson::Document>,
    window: PageWindow,
) -> Vec<bson::Document> {
    let mut data = Vec::with_capacity(3);
    if let Some(sort) = sort.filter(|sort| !sort.is_empty()) {
        data.push(doc! { "$sort": sort });
    }
    data.push(doc! { "$skip": window.skip() });
    data.push(doc! { "$limit": window.limit });

    stages.push(doc! {
        "$facet": {
            TOTAL_FACET: [{ "$count": "count" }],
            DATA_FACET: data,
        }
    });
    stages
}

/// Splits the single facet result into the total and the page documents.
pub(crate) fn unpack(result: Option<bson::Document>) -> Result<(i64, Vec<bson::Document>)> {
    let Some(mut result) = result else {
        return Ok((0, Vec::new()));
    };

    let total = match result.get_array(TOTAL_FACET) {
        Ok(counts) => match counts.first() {
            Some(Bson::Document(count)) => match count.get("count") {
                Some(Bson::Int32(n)) => i64::from(*n),
                Some(Bson::Int64(n)) => *n,
                _ => return Err(malformed("count")),
            },
            None => 0,
            Some(_) => return Err(malformed("count")),
        },
        Err(_) => return Err(malformed(TOTAL_FACET)),
    };

    let documents = match result.remove(DATA_FACET) {
        Some(Bson::Array(values)) => values
            .into_iter()
            .map(|value| match value {
                Bson::Document(document) => Ok(document),
                _ => Err(malformed(DATA_FACET)),
            })
            .collect::<Result<Vec<_>>>()?,
        _ => return Err(malformed(DATA_FACET)),
    };

    Ok((total, documents))
}

fn malformed(field: &str) -> Error {
    Error::internal().with_message(format!("malformed pagination facet: '{field}'"))
}
