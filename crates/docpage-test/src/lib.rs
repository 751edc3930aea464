#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for the in-memory engine.
///
/// Use this target for logging find and aggregate execution over in-memory
/// collections.
pub const TRACING_TARGET_MEMORY: &str = "docpage_test::memory";

mod fixtures;
mod memory;
mod mock;
mod telemetry;

#[cfg(test)]
mod scenarios;

pub use fixtures::{Product, malformed_product, product_documents, seed_products};
pub use memory::MemoryCollection;
pub use mock::{FailingEngine, MockEngine, RecordedCall};
pub use telemetry::init_tracing;
