//! Always-failing engine.

use async_trait::async_trait;
use docpage::engine::{AggregateRequest, EnginePage, FindRequest};
use docpage::{Error, ErrorKind, PaginationEngine, Result};

/// Mock engine failing every call with the same error kind.
#[derive(Debug, Clone, Copy)]
pub struct FailingEngine {
    kind: ErrorKind,
}

impl FailingEngine {
    /// Creates an engine failing with `kind`.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates an engine that behaves like an unreachable store.
    pub fn unreachable() -> Self {
        Self::new(ErrorKind::Connectivity)
    }

    fn error(&self, operation: &str) -> Error {
        Error::new(self.kind).with_message(format!("mock {operation} failure"))
    }
}

impl Default for FailingEngine {
    fn default() -> Self {
        Self::unreachable()
    }
}

#[async_trait]
impl PaginationEngine for FailingEngine {
    async fn find(&self, _request: FindRequest) -> Result<EnginePage> {
        Err(self.error("find"))
    }

    async fn aggregate(&self, _request: AggregateRequest) -> Result<EnginePage> {
        Err(self.error("aggregate"))
    }
}
