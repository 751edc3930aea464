//! MongoDB-backed pagination engine.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bson::doc;
use docpage::engine::{AggregateRequest, EnginePage, FindRequest, PageWindow, PagingConfig};
use docpage::{Error, PaginationEngine, QueryContext, Result};
use futures::TryStreamExt;
use mongodb::{Client, Collection};

use crate::config::MongoConfig;
use crate::convert::{sort_document, to_bson_document, to_driver_collation, to_json_document};
use crate::error::from_driver;
use crate::pipeline;
use crate::{TRACING_TARGET_CONNECTION, TRACING_TARGET_ENGINE};

/// Pagination engine over one MongoDB collection.
///
/// This handle is cheaply cloneable; clones share the driver's connection
/// pool.
#[derive(Debug, Clone)]
pub struct MongoEngine {
    collection: Collection<bson::Document>,
    paging: PagingConfig,
    max_time: Option<Duration>,
}

impl MongoEngine {
    /// Connects to the configured deployment and opens `collection`.
    #[tracing::instrument(skip(config), target = TRACING_TARGET_CONNECTION)]
    pub async fn connect(config: &MongoConfig, collection: &str) -> Result<Self> {
        config
            .validate()
            .map_err(|message| Error::configuration().with_message(message))?;

        let client = Client::with_uri_str(&config.mongo_url)
            .await
            .map_err(from_driver)?;
        let collection = client
            .database(&config.mongo_database)
            .collection::<bson::Document>(collection);

        tracing::info!(
            target: TRACING_TARGET_CONNECTION,
            database = %config.mongo_database,
            collection = %collection.name(),
            "Opened MongoDB collection"
        );

        Ok(Self::new(collection, config))
    }

    /// Wraps an existing collection handle.
    pub fn new(collection: Collection<bson::Document>, config: &MongoConfig) -> Self {
        Self {
            collection,
            paging: config.paging(),
            max_time: config.max_time(),
        }
    }

    /// Returns the underlying collection handle.
    pub fn collection(&self) -> &Collection<bson::Document> {
        &self.collection
    }

    /// Returns the paging defaults.
    pub fn paging(&self) -> &PagingConfig {
        &self.paging
    }

    /// Round-trips a `ping` command and returns its latency.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CONNECTION)]
    pub async fn ping(&self) -> Result<Duration> {
        let start = Instant::now();
        self.collection
            .client()
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(from_driver)?;
        Ok(start.elapsed())
    }

    /// Server-side time limit: the configured one, shortened to the context deadline.
    fn max_time(&self, context: &QueryContext) -> Option<Duration> {
        match (self.max_time, context.remaining()) {
            (Some(configured), Some(remaining)) => Some(configured.min(remaining)),
            (configured, remaining) => configured.or(remaining),
        }
        .filter(|max_time| !max_time.is_zero())
    }
}

fn skip_of(window: PageWindow) -> u64 {
    u64::try_from(window.skip()).unwrap_or_default()
}

#[async_trait]
impl PaginationEngine for MongoEngine {
    #[tracing::instrument(
        skip_all,
        target = TRACING_TARGET_ENGINE,
        fields(collection = %self.collection.name())
    )]
    async fn find(&self, request: FindRequest) -> Result<EnginePage> {
        let window = PageWindow::resolve(request.page, request.limit, &self.paging);
        let filter = to_bson_document(request.filter)?;
        let collation = request.collation.as_ref().map(to_driver_collation);
        let max_time = self.max_time(&request.context);

        let mut count = self.collection.count_documents(filter.clone());
        if let Some(collation) = collation.clone() {
            count = count.collation(collation);
        }
        if let Some(max_time) = max_time {
            count = count.max_time(max_time);
        }
        let total = count.await.map_err(from_driver)?;
        let total = i64::try_from(total).unwrap_or(i64::MAX);

        let mut find = self
            .collection
            .find(filter)
            .skip(skip_of(window))
            .limit(window.limit);
        if !request.sort.is_empty() {
            find = find.sort(sort_document(&request.sort)?);
        }
        if let Some(projection) = request.projection.filter(|p| !p.is_empty()) {
            find = find.projection(to_bson_document(projection.to_document())?);
        }
        if let Some(collation) = collation {
            find = find.collation(collation);
        }
        if let Some(max_time) = max_time {
            find = find.max_time(max_time);
        }

        let cursor = find.await.map_err(from_driver)?;
        let documents: Vec<bson::Document> = cursor.try_collect().await.map_err(from_driver)?;

        tracing::debug!(
            target: TRACING_TARGET_ENGINE,
            total,
            page = window.page,
            limit = window.limit,
            returned = documents.len(),
            "Find executed"
        );

        let documents = documents.into_iter().map(to_json_document).collect();
        Ok(EnginePage::new(documents, window.metadata(total)))
    }

    #[tracing::instrument(
        skip_all,
        target = TRACING_TARGET_ENGINE,
        fields(collection = %self.collection.name(), stages = request.stages.len())
    )]
    async fn aggregate(&self, request: AggregateRequest) -> Result<EnginePage> {
        let window = PageWindow::resolve(request.page, request.limit, &self.paging);
        let stages = request
            .stages
            .into_iter()
            .map(to_bson_document)
            .collect::<Result<Vec<_>>>()?;
        let sort = if request.sort.is_empty() {
            None
        } else {
            Some(sort_document(&request.sort)?)
        };
        let stages = pipeline::paginate(stages, sort, window);

        let mut aggregate = self.collection.aggregate(stages);
        if let Some(collation) = request.collation.as_ref() {
            aggregate = aggregate.collation(to_driver_collation(collation));
        }
        if let Some(max_time) = self.max_time(&request.context) {
            aggregate = aggregate.max_time(max_time);
        }

        let mut cursor = aggregate.await.map_err(from_driver)?;
        let result = cursor.try_next().await.map_err(from_driver)?;
        let (total, documents) = pipeline::unpack(result)?;

        tracing::debug!(
            target: TRACING_TARGET_ENGINE,
            total,
            page = window.page,
            limit = window.limit,
            returned = documents.len(),
            "Aggregate executed"
        );

        let documents = documents.into_iter().map(to_json_document).collect();
        Ok(EnginePage::new(documents, window.metadata(total)))
    }
}
