//! Prelude module for docpage.
//!
//! This module re-exports the most commonly used types and traits from docpage,
//! making it easy to import everything you need with a single `use` statement.
//!
//! # Example
//!
//! ```rust,ignore
//! use docpage::prelude::*;
//!
//! # async fn example(engine: impl PaginationEngine + Clone + 'static) -> Result<()> {
//! let page = engine.paginate::<Product>().limit(10).find().await?;
//! # Ok(())
//! # }
//! ```

// Query types
pub use crate::query::{
    Collation, CollationStrength, PaginateExt, QueryBuilder, QueryContext, SortDirection, SortKey,
};
// Engine types
pub use crate::engine::{AggregateRequest, EnginePage, FindRequest, PaginationEngine};
// Result types
pub use crate::{DecodePolicy, Document, PageMetadata, PaginatedResult};
// Error types
pub use crate::{Error, ErrorKind, Result};
