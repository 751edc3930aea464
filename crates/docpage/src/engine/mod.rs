//! Pagination engine abstraction.
//!
//! A pagination engine is the collaborator that talks to the store: it turns
//! page and limit into skip/limit, counts matching documents, runs the find
//! or the pipeline and reports [`PageMetadata`]. The query builder only
//! forwards configuration to it and decodes what comes back.
//!
//! Engine implementations live in their own crates; [`PageWindow`] and
//! [`PagingConfig`] are provided here so they all default and clamp the
//! same way.

mod window;

use async_trait::async_trait;

pub use window::{PageWindow, PagingConfig};

use crate::query::{Collation, Projection, QueryContext, SortKey};
use crate::{Document, PageMetadata, Result};

/// A filtered find, as handed to [`PaginationEngine::find`].
#[derive(Debug, Clone, Default)]
pub struct FindRequest {
    /// Match predicate; empty matches everything.
    pub filter: Document,
    /// Fields to retain, or `None` for whole documents.
    pub projection: Option<Projection>,
    /// Ordered sort keys, primary first.
    pub sort: Vec<SortKey>,
    /// Requested page, unvalidated.
    pub page: Option<i64>,
    /// Requested page size, unvalidated.
    pub limit: Option<i64>,
    /// Collation rules for sorting and matching.
    pub collation: Option<Collation>,
    /// Scope of the call; engines may use the deadline as a server-side limit.
    pub context: QueryContext,
}

/// An aggregation, as handed to [`PaginationEngine::aggregate`].
///
/// Paging and sorting are applied after the caller's stages.
#[derive(Debug, Clone, Default)]
pub struct AggregateRequest {
    /// Caller pipeline stages, in execution order.
    pub stages: Vec<Document>,
    /// Ordered sort keys applied to the pipeline output, primary first.
    pub sort: Vec<SortKey>,
    /// Requested page, unvalidated.
    pub page: Option<i64>,
    /// Requested page size, unvalidated.
    pub limit: Option<i64>,
    /// Collation rules for sorting and matching.
    pub collation: Option<Collation>,
    /// Scope of the call; engines may use the deadline as a server-side limit.
    pub context: QueryContext,
}

/// Raw documents of one page together with the page metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct EnginePage {
    /// Documents of the requested page, in store order.
    pub documents: Vec<Document>,
    /// Metadata computed by the engine.
    pub pagination: PageMetadata,
}

impl EnginePage {
    /// Creates a new engine page.
    pub fn new(documents: Vec<Document>, pagination: PageMetadata) -> Self {
        Self {
            documents,
            pagination,
        }
    }
}

/// Executes paginated finds and aggregations against a store collection.
///
/// Implementations are collection handles: cheap to share, used read-only,
/// and safe to call from many builders at once.
#[async_trait]
pub trait PaginationEngine: Send + Sync {
    /// Runs a filtered find and returns one page of raw documents.
    async fn find(&self, request: FindRequest) -> Result<EnginePage>;

    /// Runs an aggregation pipeline and returns one page of raw documents.
    async fn aggregate(&self, request: AggregateRequest) -> Result<EnginePage>;
}
