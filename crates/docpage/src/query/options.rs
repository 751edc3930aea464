//! Accumulated query configuration.

use serde_json::Value;

use super::{Collation, Projection, QueryContext, SortKey};
use crate::DecodePolicy;

/// Everything a [`QueryBuilder`] has been configured with so far.
///
/// Setters on the builder overwrite the matching field here, except sort
/// keys, which accumulate in call order. Page and limit are kept exactly as
/// given; the engine applies its own defaults and bounds.
///
/// [`QueryBuilder`]: super::QueryBuilder
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Match predicate for `find`.
    pub filter: Option<Value>,
    /// Field selection for `find`.
    pub projection: Option<Projection>,
    /// Ordered sort keys, primary first.
    pub sort: Vec<SortKey>,
    /// Requested page number (1-based).
    pub page: Option<i64>,
    /// Requested page size.
    pub limit: Option<i64>,
    /// Collation rules for sorting and matching.
    pub collation: Option<Collation>,
    /// Cancellation and deadline scope.
    pub context: QueryContext,
    /// Decode posture overriding the per-operation default.
    pub decode_policy: Option<DecodePolicy>,
}
