//! Mock pagination engines for testing.
//!
//! These engines do not evaluate anything: [`MockEngine`] replays a canned
//! page and records what it was asked, [`FailingEngine`] fails every call
//! with a fixed error kind. They are useful for exercising the query builder
//! in isolation.

mod canned;
mod failing;

pub use canned::{MockEngine, RecordedCall};
pub use failing::FailingEngine;
