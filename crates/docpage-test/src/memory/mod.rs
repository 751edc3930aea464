//! In-memory pagination engine.
//!
//! [`MemoryCollection`] keeps documents in insertion order and evaluates
//! finds and pipelines the way a document store would: filters, sorts with
//! collation, applies the page window and reports the metadata computed from
//! the full match count.

mod compare;
mod filter;
mod pipeline;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use docpage::engine::{AggregateRequest, EnginePage, FindRequest, PageWindow, PagingConfig};
use docpage::{Document, Error, PaginationEngine, Result, SortKey, document_from_value};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::TRACING_TARGET_MEMORY;

/// A shared, in-memory collection of documents.
///
/// Clones share the same underlying documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryCollection {
    documents: Arc<RwLock<Vec<Document>>>,
    next_id: Arc<AtomicU64>,
    config: PagingConfig,
    latency: Option<Duration>,
}

impl MemoryCollection {
    /// Creates an empty collection with default paging.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the paging defaults.
    #[must_use]
    pub fn with_config(mut self, config: PagingConfig) -> Self {
        self.config = config;
        self
    }

    /// Delays every query by `latency` before it touches the documents.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Returns the paging defaults.
    pub fn config(&self) -> &PagingConfig {
        &self.config
    }

    /// Inserts a document and returns its `_id`.
    ///
    /// Documents without an `_id` get a fresh 24-digit hexadecimal one.
    pub async fn insert(&self, document: Value) -> Result<Value> {
        let mut document = document_from_value(document)?;
        let id = match document.get("_id") {
            Some(id) => id.clone(),
            None => {
                let id = Value::String(self.generate_id());
                document.insert("_id".to_owned(), id.clone());
                id
            }
        };

        self.documents.write().await.push(document);
        Ok(id)
    }

    /// Inserts many documents, returning how many were inserted.
    pub async fn insert_many<I>(&self, documents: I) -> Result<usize>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut count = 0;
        for document in documents {
            self.insert(document).await?;
            count += 1;
        }

        tracing::debug!(target: TRACING_TARGET_MEMORY, count, "Inserted documents");
        Ok(count)
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Returns whether the collection holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Removes every document.
    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }

    fn generate_id(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{n:024x}")
    }

    async fn snapshot(&self) -> Vec<Document> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.documents.read().await.clone()
    }
}

fn reject_meta_sort(keys: &[SortKey]) -> Result<()> {
    match keys.iter().find(|key| matches!(key.direction, docpage::SortDirection::Meta(_))) {
        Some(key) => Err(Error::invalid_query().with_message(format!(
            "$meta sort on '{}' is not supported by the in-memory engine",
            key.field
        ))),
        None => Ok(()),
    }
}

fn page_of(documents: Vec<Document>, window: PageWindow) -> Vec<Document> {
    let skip = usize::try_from(window.skip()).unwrap_or(usize::MAX);
    let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
    documents.into_iter().skip(skip).take(limit).collect()
}

#[async_trait]
impl PaginationEngine for MemoryCollection {
    async fn find(&self, request: FindRequest) -> Result<EnginePage> {
        request.context.check()?;
        reject_meta_sort(&request.sort)?;

        let window = PageWindow::resolve(request.page, request.limit, &self.config);
        let collation = request.collation.as_ref();

        let mut matched = Vec::new();
        for document in self.snapshot().await {
            if filter::matches(&document, &request.filter, collation)? {
                matched.push(document);
            }
        }

        let total = i64::try_from(matched.len()).unwrap_or(i64::MAX);
        compare::sort_documents(&mut matched, &request.sort, collation);
        let mut documents = page_of(matched, window);

        if let Some(projection) = request.projection.filter(|p| !p.is_empty()) {
            let spec = projection.to_document();
            documents = documents
                .iter()
                .map(|document| pipeline::project(document, &spec))
                .collect::<Result<_>>()?;
        }

        tracing::debug!(
            target: TRACING_TARGET_MEMORY,
            total,
            page = window.page,
            limit = window.limit,
            returned = documents.len(),
            "Find executed"
        );

        Ok(EnginePage::new(documents, window.metadata(total)))
    }

    async fn aggregate(&self, request: AggregateRequest) -> Result<EnginePage> {
        request.context.check()?;
        reject_meta_sort(&request.sort)?;

        let window = PageWindow::resolve(request.page, request.limit, &self.config);
        let collation = request.collation.as_ref();

        let mut output = pipeline::run(&request.stages, self.snapshot().await, collation)?;
        let total = i64::try_from(output.len()).unwrap_or(i64::MAX);
        compare::sort_documents(&mut output, &request.sort, collation);
        let documents = page_of(output, window);

        tracing::debug!(
            target: TRACING_TARGET_MEMORY,
            stages = request.stages.len(),
            total,
            page = window.page,
            limit = window.limit,
            returned = documents.len(),
            "Aggregate executed"
        );

        Ok(EnginePage::new(documents, window.metadata(total)))
    }
}
