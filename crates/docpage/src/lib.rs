#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging.

/// Tracing target for query builder operations.
///
/// Use this target for logging terminal calls, their configuration and outcome.
pub const TRACING_TARGET_QUERY: &str = "docpage::query";

/// Tracing target for document decoding.
///
/// Use this target for logging records that fail to decode into the target type.
pub const TRACING_TARGET_DECODE: &str = "docpage::decode";

/// Tracing target for pagination engine operations.
///
/// Use this target for logging engine execution, counts and store errors.
pub const TRACING_TARGET_ENGINE: &str = "docpage::engine";

mod decode;
mod document;
mod error;
mod pagination;

pub mod engine;
pub mod prelude;
pub mod query;

pub use crate::decode::{DecodePolicy, Decoder};
pub use crate::document::{Document, document_from_value};
pub use crate::engine::{
    AggregateRequest, EnginePage, FindRequest, PageWindow, PaginationEngine, PagingConfig,
};
pub use crate::error::{BoxedError, Error, ErrorKind, Result};
pub use crate::pagination::{PageMetadata, PaginatedResult};
pub use crate::query::{
    Collation, CollationStrength, PaginateExt, Projection, QueryBuilder, QueryContext,
    QueryOptions, SortDirection, SortKey,
};
