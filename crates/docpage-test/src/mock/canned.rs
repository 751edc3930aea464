//! Canned-response engine.

use std::sync::Arc;

use async_trait::async_trait;
use docpage::engine::{AggregateRequest, EnginePage, FindRequest};
use docpage::{Document, PageMetadata, PaginationEngine, Result};
use tokio::sync::Mutex;

/// A request received by a [`MockEngine`].
#[derive(Debug, Clone)]
pub enum RecordedCall {
    /// A call to [`PaginationEngine::find`].
    Find(FindRequest),
    /// A call to [`PaginationEngine::aggregate`].
    Aggregate(AggregateRequest),
}

/// Mock engine returning the same page for every call.
///
/// Clones share the call log.
#[derive(Debug, Clone)]
pub struct MockEngine {
    page: EnginePage,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockEngine {
    /// Creates a mock engine returning `page`.
    pub fn new(page: EnginePage) -> Self {
        Self {
            page,
            calls: Arc::default(),
        }
    }

    /// Creates a mock engine returning `documents` as the only page.
    pub fn with_documents(documents: Vec<Document>) -> Self {
        let total = i64::try_from(documents.len()).unwrap_or(i64::MAX);
        let per_page = total.max(1);
        Self::new(EnginePage::new(
            documents,
            PageMetadata::new(total, 1, per_page),
        ))
    }

    /// Returns every call received so far, oldest first.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    /// Number of calls received so far.
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Returns the most recent find request, if any.
    pub async fn last_find(&self) -> Option<FindRequest> {
        self.calls.lock().await.iter().rev().find_map(|call| match call {
            RecordedCall::Find(request) => Some(request.clone()),
            RecordedCall::Aggregate(_) => None,
        })
    }

    /// Returns the most recent aggregate request, if any.
    pub async fn last_aggregate(&self) -> Option<AggregateRequest> {
        self.calls.lock().await.iter().rev().find_map(|call| match call {
            RecordedCall::Aggregate(request) => Some(request.clone()),
            RecordedCall::Find(_) => None,
        })
    }
}

#[async_trait]
impl PaginationEngine for MockEngine {
    async fn find(&self, request: FindRequest) -> Result<EnginePage> {
        self.calls.lock().await.push(RecordedCall::Find(request));
        Ok(self.page.clone())
    }

    async fn aggregate(&self, request: AggregateRequest) -> Result<EnginePage> {
        self.calls.lock().await.push(RecordedCall::Aggregate(request));
        Ok(self.page.clone())
    }
}

#[cfg(test)]
mod tests {
    use docpage::{PaginateExt, SortKey, document_from_value};
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[tokio::test]
    async fn records_forwarded_configuration() {
        let document = document_from_value(json!({ "name": "lamp" })).unwrap();
        let engine = MockEngine::with_documents(vec![document]);

        let page = engine
            .paginate::<Named>()
            .filter(json!({ "name": "lamp" }))
            .sort("price", -1)
            .page(2)
            .limit(5)
            .find()
            .await
            .unwrap();

        assert_eq!(page.data[0].name, "lamp");
        assert_eq!(engine.call_count().await, 1);

        let request = engine.last_find().await.unwrap();
        assert_eq!(request.sort, vec![SortKey::desc("price")]);
        assert_eq!((request.page, request.limit), (Some(2), Some(5)));
        assert!(engine.last_aggregate().await.is_none());
    }
}
