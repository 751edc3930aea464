//! The typed query builder and its terminal operations.

use std::any::type_name;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Collation, Projection, QueryContext, QueryOptions, SortDirection, SortKey};
use crate::engine::{AggregateRequest, FindRequest, PaginationEngine};
use crate::{
    DecodePolicy, Decoder, PaginatedResult, Result, TRACING_TARGET_QUERY, document_from_value,
};

/// Chainable configuration of a paginated query returning records of type `T`.
///
/// Setters consume the builder and hand it back, so a query is written as a
/// single chain and owned by one caller. Terminal operations borrow the
/// builder; its options cannot change while a call is in flight.
///
/// The two terminals decode differently by default:
///
/// - [`find`](Self::find) fails the whole call when any document does not
///   decode into `T`.
/// - [`aggregate`](Self::aggregate) drops such documents and succeeds; the
///   page metadata keeps the engine's count.
///
/// [`decode_policy`](Self::decode_policy) applies one posture to both.
pub struct QueryBuilder<T> {
    engine: Arc<dyn PaginationEngine>,
    options: QueryOptions,
    _record: PhantomData<fn() -> T>,
}

impl<T> QueryBuilder<T>
where
    T: DeserializeOwned,
{
    /// Creates a builder bound to the given engine.
    pub fn new<E>(engine: E) -> Self
    where
        E: PaginationEngine + 'static,
    {
        Self::from_shared(Arc::new(engine))
    }

    /// Creates a builder bound to an already shared engine.
    pub fn from_shared(engine: Arc<dyn PaginationEngine>) -> Self {
        Self {
            engine,
            options: QueryOptions::default(),
            _record: PhantomData,
        }
    }

    /// Sets the match predicate used by [`find`](Self::find).
    ///
    /// The predicate must be a document; anything else is reported as an
    /// invalid query when `find` runs. Ignored by `aggregate`.
    #[must_use]
    pub fn filter(mut self, predicate: Value) -> Self {
        self.options.filter = Some(predicate);
        self
    }

    /// Sets the fields retained by [`find`](Self::find). Ignored by `aggregate`.
    #[must_use]
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.projection = Some(Projection::new(fields));
        self
    }

    /// Appends a sort key; the first call sets the primary sort.
    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, direction: impl Into<SortDirection>) -> Self {
        self.options.sort.push(SortKey::new(field, direction));
        self
    }

    /// Sets the page size, forwarded to the engine as given.
    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.options.limit = Some(limit);
        self
    }

    /// Sets the requested page (1-based), forwarded to the engine as given.
    #[must_use]
    pub fn page(mut self, page: i64) -> Self {
        self.options.page = Some(page);
        self
    }

    /// Attaches the cancellation and deadline scope of the terminal call.
    #[must_use]
    pub fn context(mut self, context: QueryContext) -> Self {
        self.options.context = context;
        self
    }

    /// Attaches locale-aware comparison rules.
    #[must_use]
    pub fn collation(mut self, collation: Collation) -> Self {
        self.options.collation = Some(collation);
        self
    }

    /// Applies one decode posture to both terminal operations.
    #[must_use]
    pub fn decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.options.decode_policy = Some(policy);
        self
    }

    /// Returns the options accumulated so far.
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Runs a filtered find and decodes one page of records.
    ///
    /// Engine errors are returned unchanged. Unless overridden, a document
    /// that fails to decode fails the call and no records are returned.
    #[tracing::instrument(
        skip(self),
        target = TRACING_TARGET_QUERY,
        fields(record = type_name::<T>(), page = ?self.options.page, limit = ?self.options.limit)
    )]
    pub async fn find(&self) -> Result<PaginatedResult<T>> {
        let request = self.find_request()?;
        let policy = self.options.decode_policy.unwrap_or(DecodePolicy::FailFast);

        let page = self
            .options
            .context
            .run(self.engine.find(request))
            .await
            .inspect_err(|error| {
                tracing::debug!(target: TRACING_TARGET_QUERY, error = %error, "Find failed");
            })?;

        let records = Decoder::<T>::new().decode_all(page.documents, policy)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            records = records.len(),
            total = page.pagination.total,
            "Find completed"
        );

        Ok(PaginatedResult::new(records, page.pagination))
    }

    /// Runs an aggregation pipeline and decodes one page of records.
    ///
    /// Paging, sort keys, collation and context apply; filter and selection
    /// do not, so matching and projection belong in `stages`. Engine errors
    /// are returned unchanged. Unless overridden, documents that fail to
    /// decode are skipped and the metadata is left as the engine reported it.
    #[tracing::instrument(
        skip(self, stages),
        target = TRACING_TARGET_QUERY,
        fields(record = type_name::<T>(), page = ?self.options.page, limit = ?self.options.limit)
    )]
    pub async fn aggregate<I>(&self, stages: I) -> Result<PaginatedResult<T>>
    where
        I: IntoIterator<Item = Value>,
    {
        let request = self.aggregate_request(stages)?;
        let policy = self
            .options
            .decode_policy
            .unwrap_or(DecodePolicy::SkipInvalid);

        let page = self
            .options
            .context
            .run(self.engine.aggregate(request))
            .await
            .inspect_err(|error| {
                tracing::debug!(target: TRACING_TARGET_QUERY, error = %error, "Aggregate failed");
            })?;

        let documents = page.documents.len();
        let records = Decoder::<T>::new().decode_all(page.documents, policy)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            records = records.len(),
            skipped = documents - records.len(),
            total = page.pagination.total,
            "Aggregate completed"
        );

        Ok(PaginatedResult::new(records, page.pagination))
    }

    fn find_request(&self) -> Result<FindRequest> {
        let filter = match &self.options.filter {
            Some(predicate) => document_from_value(predicate.clone())?,
            None => Default::default(),
        };

        Ok(FindRequest {
            filter,
            projection: self.options.projection.clone(),
            sort: self.options.sort.clone(),
            page: self.options.page,
            limit: self.options.limit,
            collation: self.options.collation.clone(),
            context: self.options.context.clone(),
        })
    }

    fn aggregate_request<I>(&self, stages: I) -> Result<AggregateRequest>
    where
        I: IntoIterator<Item = Value>,
    {
        if self.options.filter.is_some() || self.options.projection.is_some() {
            tracing::debug!(
                target: TRACING_TARGET_QUERY,
                "Filter and selection are not applied to aggregations"
            );
        }

        let stages = stages
            .into_iter()
            .map(document_from_value)
            .collect::<Result<Vec<_>>>()?;

        Ok(AggregateRequest {
            stages,
            sort: self.options.sort.clone(),
            page: self.options.page,
            limit: self.options.limit,
            collation: self.options.collation.clone(),
            context: self.options.context.clone(),
        })
    }
}

impl<T> std::fmt::Debug for QueryBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("record", &type_name::<T>())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Starts a [`QueryBuilder`] from an engine handle.
pub trait PaginateExt {
    /// Creates a builder for records of type `T` over this engine.
    fn paginate<T>(&self) -> QueryBuilder<T>
    where
        T: DeserializeOwned;
}

impl<E> PaginateExt for E
where
    E: PaginationEngine + Clone + 'static,
{
    fn paginate<T>(&self) -> QueryBuilder<T>
    where
        T: DeserializeOwned,
    {
        QueryBuilder::new(self.clone())
    }
}
