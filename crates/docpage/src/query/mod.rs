//! Chainable paginated queries with typed results.
//!
//! This module provides the caller-facing side of the crate:
//! - [`QueryBuilder`]: accumulates query options and runs `find` or `aggregate`
//! - [`PaginateExt`]: starts a builder from any engine handle
//! - [`SortKey`], [`Projection`], [`Collation`], [`QueryContext`]: option types
//!
//! # Example
//!
//! ```ignore
//! let page = QueryBuilder::<Product>::new(engine)
//!     .filter(json!({ "quantity": { "$gt": 0 } }))
//!     .sort("price", SortDirection::Desc)
//!     .limit(10)
//!     .page(2)
//!     .find()
//!     .await?;
//! ```

mod builder;
mod collation;
mod context;
mod options;
mod projection;
mod sort;

pub use builder::{PaginateExt, QueryBuilder};
pub use collation::{Collation, CollationStrength};
pub use context::QueryContext;
pub use options::QueryOptions;
pub use projection::Projection;
pub use sort::{SortDirection, SortKey};
