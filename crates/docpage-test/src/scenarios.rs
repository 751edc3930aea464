//! End-to-end paging over the in-memory engine.

use std::time::Duration;

use docpage::{
    Collation, CollationStrength, DecodePolicy, ErrorKind, PaginateExt, QueryBuilder,
    QueryContext,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::{
    FailingEngine, MemoryCollection, Product, init_tracing, malformed_product, seed_products,
};

#[tokio::test]
async fn first_page_sorted_by_price() {
    init_tracing();
    let products = seed_products(30).await.unwrap();

    let page = products
        .paginate::<Product>()
        .filter(json!({ "quantity": { "$gte": 0 } }))
        .sort("price", -1)
        .page(1)
        .limit(10)
        .find()
        .await
        .unwrap();

    assert_eq!(page.data.len(), 10);
    assert_eq!(page.data[0].quantity, 29.0);
    assert_eq!(page.data[0].price, 295.0);
    assert!(page.data[0].id.is_some());
    assert_eq!(page.pagination.total, 30);
    assert_eq!(page.pagination.total_page, 3);
    assert_eq!((page.pagination.prev, page.pagination.next), (0, 2));
}

#[tokio::test]
async fn secondary_key_breaks_price_ties() {
    let products = MemoryCollection::new();
    products
        .insert_many([
            json!({ "name": "a", "quantity": 5, "price": 10.0 }),
            json!({ "name": "b", "quantity": 1, "price": 10.0 }),
            json!({ "name": "c", "quantity": 3, "price": 20.0 }),
        ])
        .await
        .unwrap();

    let page = products
        .paginate::<Product>()
        .sort("price", -1)
        .sort("quantity", 1)
        .find()
        .await
        .unwrap();

    let names: Vec<_> = page.data.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["c", "b", "a"]);
}

#[tokio::test]
async fn descending_keys_break_price_ties() {
    let products = MemoryCollection::new();
    products
        .insert_many([
            json!({ "name": "a", "quantity": 1.0, "price": 10.0 }),
            json!({ "name": "b", "quantity": 7.0, "price": 10.0 }),
            json!({ "name": "c", "quantity": 3.0, "price": 20.0 }),
            json!({ "name": "d", "quantity": 4.0, "price": 10.0 }),
        ])
        .await
        .unwrap();

    let (records, pagination) = products
        .paginate::<Product>()
        .sort("price", -1)
        .sort("quantity", -1)
        .find()
        .await
        .unwrap()
        .into_parts();

    let names: Vec<_> = records.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["c", "b", "d", "a"]);
    assert_eq!(pagination.total, 4);
}

#[tokio::test]
async fn select_applies_to_find_only() {
    let products = seed_products(5).await.unwrap();
    let query = products
        .paginate::<Product>()
        .select(["name"])
        .sort("quantity", -1)
        .limit(2);

    let found = query.find().await.unwrap();
    assert_eq!(found.data[0].name, "product-4");
    assert_eq!(found.data[0].quantity, 0.0);
    assert_eq!(found.data[0].price, 0.0);
    assert!(found.data[0].id.is_some());

    let aggregated = query.aggregate([json!({ "$match": {} })]).await.unwrap();
    assert_eq!(aggregated.data[0].quantity, 4.0);
    assert_eq!(aggregated.data[0].price, 45.0);
}

#[tokio::test]
async fn total_pages_round_up() {
    let products = seed_products(25).await.unwrap();
    let query = products.paginate::<Product>().page(3).limit(10);

    let found = query.find().await.unwrap();
    assert_eq!(found.pagination.total_page, 3);
    assert_eq!(found.data.len(), 5);
    assert_eq!(found.pagination.next, 0);

    let aggregated = query
        .aggregate([json!({ "$match": { "quantity": { "$lt": 21 } } })])
        .await
        .unwrap();
    assert_eq!(aggregated.pagination.total, 21);
    assert_eq!(aggregated.pagination.total_page, 3);
    assert_eq!(aggregated.data.len(), 1);
}

#[tokio::test]
async fn maximum_limit_fits_in_one_page() {
    let products = seed_products(30).await.unwrap();
    let query = products.paginate::<Product>().limit(i64::MAX);

    let found = query.find().await.unwrap();
    assert_eq!(found.data.len(), 30);
    assert_eq!(found.pagination.total_page, 1);
    assert_eq!(found.pagination.per_page, i64::MAX);
    assert_eq!(found.pagination.next, 0);

    let aggregated = query.aggregate([json!({ "$match": {} })]).await.unwrap();
    assert_eq!(aggregated.data.len(), 30);
    assert_eq!(aggregated.pagination.total_page, 1);
}

#[tokio::test]
async fn page_beyond_the_last_is_empty() {
    let products = seed_products(4).await.unwrap();

    let page = products
        .paginate::<Product>()
        .page(9)
        .limit(2)
        .find()
        .await
        .unwrap();

    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total, 4);
    assert_eq!(page.pagination.page, 9);
}

#[tokio::test]
async fn find_fails_fast_while_aggregate_skips() {
    init_tracing();
    let products = MemoryCollection::new();
    products
        .insert_many([
            json!({ "name": "lamp", "quantity": 1, "price": 10.0 }),
            malformed_product("broken"),
            json!({ "name": "desk", "quantity": 2, "price": 20.0 }),
        ])
        .await
        .unwrap();
    let query = QueryBuilder::<Product>::new(products.clone()).sort("quantity", 1);

    let error = query.find().await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Decode);

    let page = query.aggregate([json!({ "$match": {} })]).await.unwrap();
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.pagination.total, 3);

    let page = query
        .decode_policy(DecodePolicy::SkipInvalid)
        .find()
        .await
        .unwrap();
    assert_eq!(page.data.len(), 2);
}

#[tokio::test]
async fn collation_orders_case_insensitively() {
    let products = MemoryCollection::new();
    products
        .insert_many([
            json!({ "name": "beta" }),
            json!({ "name": "Gamma" }),
            json!({ "name": "alpha" }),
        ])
        .await
        .unwrap();

    let page = products
        .paginate::<Product>()
        .sort("name", 1)
        .collation(Collation::new("en").with_strength(CollationStrength::Secondary))
        .find()
        .await
        .unwrap();

    let names: Vec<_> = page.data.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["alpha", "beta", "Gamma"]);
}

#[tokio::test(start_paused = true)]
async fn expired_context_fails_both_terminals() {
    let products = seed_products(3).await.unwrap();
    let context = QueryContext::new().with_timeout(Duration::ZERO);
    let query = products.paginate::<Product>().context(context);

    let error = query.find().await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Timeout);
    assert!(error.is_connectivity());

    let error = query.aggregate([json!({ "$match": {} })]).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Timeout);
}

#[tokio::test]
async fn cancelled_context_fails_find() {
    let products = seed_products(3).await.unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let error = products
        .paginate::<Product>()
        .context(QueryContext::new().with_cancellation(token))
        .find()
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn deadline_interrupts_slow_engine() {
    let products = seed_products(3)
        .await
        .unwrap()
        .with_latency(Duration::from_millis(200));

    let error = products
        .paginate::<Product>()
        .context(QueryContext::new().with_timeout(Duration::from_millis(20)))
        .find()
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Timeout);

    let page = products
        .paginate::<Product>()
        .context(QueryContext::new().with_timeout(Duration::from_secs(1)))
        .find()
        .await
        .unwrap();
    assert_eq!(page.data.len(), 3);
}

#[tokio::test]
async fn unsupported_stage_is_an_invalid_query() {
    let products = seed_products(3).await.unwrap();

    let error = products
        .paginate::<Product>()
        .aggregate([json!({ "$lookup": { "from": "orders" } })])
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::InvalidQuery);
    assert!(!error.is_retryable());
}

#[tokio::test]
async fn engine_errors_pass_through_both_terminals() {
    let engine = FailingEngine::unreachable();
    let query = engine.paginate::<Product>().limit(10);

    let error = query.find().await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Connectivity);
    assert!(error.to_string().contains("mock find failure"));

    let error = query.aggregate([json!({ "$match": {} })]).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Connectivity);
    assert!(error.to_string().contains("mock aggregate failure"));

    let error = FailingEngine::new(ErrorKind::Timeout)
        .paginate::<Product>()
        .find()
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Timeout);
}

#[tokio::test]
async fn cleared_collection_yields_empty_pages() {
    let products = seed_products(3).await.unwrap();
    assert!(!products.is_empty().await);

    products.clear().await;
    assert!(products.is_empty().await);

    let page = products.paginate::<Product>().find().await.unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total, 0);
    assert_eq!(page.pagination.total_page, 0);
}
