#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for connection management.
///
/// Use this target for logging connection setup and health checks.
pub const TRACING_TARGET_CONNECTION: &str = "docpage_mongo::connection";

/// Tracing target for query execution.
///
/// Use this target for logging finds and aggregations sent to the server.
pub const TRACING_TARGET_ENGINE: &str = "docpage_mongo::engine";

mod config;
pub mod convert;
mod engine;
mod error;
mod pipeline;

pub use config::MongoConfig;
pub use engine::MongoEngine;
