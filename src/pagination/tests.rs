//! Tests for pagination module

use super::*;
use crate::error::Error;
use crate::testing::FakeFetcher;
use crate::types::{query_params, QueryParams};
use futures::{StreamExt, TryStreamExt};
use serde_json::{json, Value};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use test_case::test_case;

fn ids(items: &[Value]) -> Vec<u64> {
    items
        .iter()
        .filter_map(|item| item["id"].as_u64())
        .collect()
}

fn vehicles(fetcher: &FakeFetcher) -> Paginator<&FakeFetcher> {
    Paginator::new(fetcher, "/v1/vehicles", "vehicles")
}

/// Serves one record per page and always claims another page follows
#[derive(Debug, Default)]
struct EndlessFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl PageFetcher for EndlessFetcher {
    async fn fetch_page(&self, _path: &str, query: &QueryParams) -> crate::Result<RawResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let page: u32 = query["page_no"].parse().unwrap();
        Ok(RawResponse::new(json!({
            "vehicles": [{ "id": page }],
            "pagination": { "total": u64::MAX, "per_page": 1, "current_page": page }
        })))
    }
}

// ============================================================================
// PageMetadata Tests
// ============================================================================

#[test_case(0, 25 => 1 ; "empty collection still has one page")]
#[test_case(1, 100 => 1 ; "single item")]
#[test_case(4, 2 => 2 ; "exact multiple")]
#[test_case(100, 100 => 1 ; "one full page")]
#[test_case(101, 100 => 2 ; "one item spills over")]
#[test_case(125, 50 => 3 ; "short last page")]
#[test_case(1000, 100 => 10 ; "ten full pages")]
fn test_last_page(total: u64, per_page: u32) -> u64 {
    PageMetadata::new(total, per_page, 1).unwrap().last_page()
}

#[test]
fn test_has_more_pages() {
    let first = PageMetadata::new(125, 50, 1).unwrap();
    assert!(first.has_more_pages());

    let last = PageMetadata::new(125, 50, 3).unwrap();
    assert!(!last.has_more_pages());

    let past_end = PageMetadata::new(125, 50, 7).unwrap();
    assert!(!past_end.has_more_pages());

    let empty = PageMetadata::new(0, 25, 1).unwrap();
    assert!(!empty.has_more_pages());
}

#[test]
fn test_metadata_rejects_zero_values() {
    assert!(matches!(
        PageMetadata::new(10, 0, 1),
        Err(Error::Decode { .. })
    ));
    assert!(matches!(
        PageMetadata::new(10, 10, 0),
        Err(Error::Decode { .. })
    ));
}

#[test]
fn test_metadata_deserialize() {
    let metadata: PageMetadata =
        serde_json::from_value(json!({ "total": 42, "per_page": 10, "current_page": 3 }))
            .unwrap();
    assert_eq!(metadata.total(), 42);
    assert_eq!(metadata.per_page(), 10);
    assert_eq!(metadata.current_page(), 3);
    assert_eq!(metadata.last_page(), 5);
}

#[test]
fn test_metadata_deserialize_page_no_alias() {
    let metadata: PageMetadata =
        serde_json::from_value(json!({ "total": 42, "per_page": 10, "page_no": 2 })).unwrap();
    assert_eq!(metadata.current_page(), 2);
}

#[test]
fn test_metadata_deserialize_rejects_zero_per_page() {
    let result: std::result::Result<PageMetadata, _> =
        serde_json::from_value(json!({ "total": 42, "per_page": 0, "current_page": 1 }));
    assert!(result.is_err());
}

// ============================================================================
// RawResponse Tests
// ============================================================================

#[test]
fn test_into_page() {
    let response = RawResponse::new(json!({
        "vehicles": [{ "id": 1 }, { "id": 2 }],
        "pagination": { "total": 4, "per_page": 2, "current_page": 1 }
    }));

    let page = response.into_page("vehicles", "pagination").unwrap();
    assert_eq!(ids(page.items()), vec![1, 2]);
    assert_eq!(page.total(), 4);
    assert_eq!(page.last_page(), 2);
    assert!(page.has_more_pages());
}

#[test]
fn test_into_page_nested_keys() {
    let response = RawResponse::new(json!({
        "data": { "users": [{ "id": 7 }] },
        "meta": { "pagination": { "total": 1, "per_page": 25, "page_no": 1 } }
    }));

    let page = response.into_page("data.users", "meta.pagination").unwrap();
    assert_eq!(ids(page.items()), vec![7]);
    assert!(!page.has_more_pages());
}

#[test]
fn test_into_page_metadata_at_root() {
    let response = RawResponse::new(json!({
        "assets": [],
        "total": 0,
        "per_page": 25,
        "current_page": 1
    }));

    let page = response.into_page("assets", "").unwrap();
    assert!(page.is_empty());
    assert_eq!(page.last_page(), 1);
}

#[test]
fn test_missing_metadata_is_decode_error() {
    let response = RawResponse::new(json!({ "vehicles": [] }));
    let err = response.into_page("vehicles", "pagination").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("pagination"));
}

#[test]
fn test_incomplete_metadata_is_decode_error() {
    let response = RawResponse::new(json!({
        "vehicles": [],
        "pagination": { "per_page": 25, "current_page": 1 }
    }));
    let err = response.into_page("vehicles", "pagination").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_missing_items_is_decode_error() {
    let response = RawResponse::new(json!({
        "pagination": { "total": 0, "per_page": 25, "current_page": 1 }
    }));
    let err = response.into_page("vehicles", "pagination").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("vehicles"));
}

#[test]
fn test_items_not_an_array_is_decode_error() {
    let response = RawResponse::new(json!({
        "vehicles": { "id": 1 },
        "pagination": { "total": 1, "per_page": 25, "current_page": 1 }
    }));
    let err = response.into_page("vehicles", "pagination").unwrap_err();
    assert!(err.to_string().contains("an object"));
}

#[test]
fn test_items() {
    let response = RawResponse::new(json!({
        "data": { "vehicles": [{ "id": 1 }, { "id": 2 }] },
        "count": 2
    }));

    assert_eq!(ids(&response.items("data.vehicles").unwrap()), vec![1, 2]);

    let err = response.items("vehicles").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("no 'vehicles' field"));

    let err = response.items("count").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("a number"));
}

#[test]
fn test_page_result_into_iter() {
    let metadata = PageMetadata::new(2, 2, 1).unwrap();
    let page = PageResult::new(vec![json!({ "id": 1 }), json!({ "id": 2 })], metadata);

    assert_eq!((&page).into_iter().count(), 2);
    let collected: Vec<Value> = page.into_iter().collect();
    assert_eq!(ids(&collected), vec![1, 2]);
}

// ============================================================================
// Paginator Tests
// ============================================================================

#[test]
fn test_build_query_page_keys_win() {
    let fetcher = FakeFetcher::numbered(0, "vehicles");
    let paginator = vehicles(&fetcher);
    let params = query_params([("status", "active"), ("page_no", "9"), ("per_page", "1")]);

    let query = paginator.build_query(3, 50, &params);
    assert_eq!(query.get("status"), Some(&"active".to_string()));
    assert_eq!(query.get("page_no"), Some(&"3".to_string()));
    assert_eq!(query.get("per_page"), Some(&"50".to_string()));
    assert_eq!(query.len(), 3);
}

#[tokio::test]
async fn test_paginate_empty_collection() {
    let fetcher = FakeFetcher::numbered(0, "vehicles");
    let page = vehicles(&fetcher)
        .paginate(1, 25, &QueryParams::new())
        .await
        .unwrap();

    assert!(page.is_empty());
    assert_eq!(page.total(), 0);
    assert_eq!(page.last_page(), 1);
    assert!(!page.has_more_pages());
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test]
async fn test_paginate_single_page() {
    let fetcher = FakeFetcher::numbered(125, "vehicles");
    let page = vehicles(&fetcher)
        .paginate(2, 50, &QueryParams::new())
        .await
        .unwrap();

    assert_eq!(page.len(), 50);
    assert_eq!(page.items()[0]["id"], 51);
    assert_eq!(page.current_page(), 2);
    assert_eq!(page.last_page(), 3);
    assert!(page.has_more_pages());
    assert_eq!(fetcher.requested_pages(), vec![2]);
}

#[tokio::test]
async fn test_paginate_sends_caller_params() {
    let fetcher = FakeFetcher::numbered(3, "vehicles");
    let params = query_params([("vehicle_ids", "1,2")]);
    vehicles(&fetcher).paginate(1, 25, &params).await.unwrap();

    let calls = fetcher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "/v1/vehicles");
    assert_eq!(calls[0].query.get("vehicle_ids"), Some(&"1,2".to_string()));
    assert_eq!(calls[0].query.get("page_no"), Some(&"1".to_string()));
    assert_eq!(calls[0].query.get("per_page"), Some(&"25".to_string()));
}

#[tokio::test]
async fn test_paginate_rejects_invalid_request() {
    let fetcher = FakeFetcher::numbered(10, "vehicles");
    let paginator = vehicles(&fetcher);

    let err = paginator.paginate(0, 25, &QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, Error::InvalidPageRequest { .. }));

    let err = paginator.paginate(1, 0, &QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, Error::InvalidPageRequest { .. }));

    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn test_paginate_past_last_page() {
    let fetcher = FakeFetcher::numbered(4, "vehicles");
    let page = vehicles(&fetcher)
        .paginate(5, 2, &QueryParams::new())
        .await
        .unwrap();

    assert!(page.is_empty());
    assert!(!page.has_more_pages());
}

#[tokio::test]
async fn test_paginate_propagates_fetch_error() {
    let fetcher = FakeFetcher::numbered(4, "vehicles").fail_on_page(1, 1);
    let err = vehicles(&fetcher)
        .paginate(1, 2, &QueryParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_paginate_custom_keys() {
    let keys = PaginationKeys {
        page_param: "page".to_string(),
        per_page_param: "limit".to_string(),
        metadata_key: String::new(),
    };
    let fetcher = FakeFetcher::numbered(3, "users").with_keys(keys.clone());
    let paginator = Paginator::new(&fetcher, "/v1/users", "users").with_keys(keys);

    let page = paginator.paginate(1, 2, &QueryParams::new()).await.unwrap();
    assert_eq!(ids(page.items()), vec![1, 2]);
    assert!(page.has_more_pages());
    assert_eq!(fetcher.calls()[0].query.get("limit"), Some(&"2".to_string()));
}

// ============================================================================
// Cursor Tests
// ============================================================================

#[tokio::test]
async fn test_cursor_is_lazy() {
    let fetcher = FakeFetcher::numbered(10, "vehicles");
    let cursor = vehicles(&fetcher).into_cursor(5, QueryParams::new());

    assert!(!cursor.is_started());
    assert!(!cursor.is_exhausted());
    assert_eq!(cursor.pages_fetched(), 0);
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn test_cursor_two_pages_in_order() {
    let fetcher = FakeFetcher::with_pages(
        vec![
            vec![json!({ "id": 1 }), json!({ "id": 2 })],
            vec![json!({ "id": 3 }), json!({ "id": 4 })],
        ],
        4,
        "vehicles",
    );

    let items = vehicles(&fetcher)
        .into_cursor(2, QueryParams::new())
        .try_collect()
        .await
        .unwrap();

    assert_eq!(ids(&items), vec![1, 2, 3, 4]);
    assert_eq!(fetcher.call_count(), 2);
}

#[tokio::test]
async fn test_cursor_drains_ten_pages() {
    let fetcher = FakeFetcher::numbered(1000, "vehicles");
    let items = vehicles(&fetcher)
        .into_cursor(100, QueryParams::new())
        .try_collect()
        .await
        .unwrap();

    assert_eq!(items.len(), 1000);
    assert_eq!(items.first().unwrap()["id"], 1);
    assert_eq!(items.last().unwrap()["id"], 1000);
    assert_eq!(fetcher.call_count(), 10);
    assert_eq!(fetcher.requested_pages(), (1..=10).collect::<Vec<u32>>());
}

#[tokio::test]
async fn test_cursor_early_stop_fetches_one_page() {
    let fetcher = FakeFetcher::numbered(1000, "vehicles");
    let mut cursor = vehicles(&fetcher).into_cursor(100, QueryParams::new());

    let mut taken = Vec::new();
    while let Some(item) = cursor.try_next().await.unwrap() {
        taken.push(item);
        if taken.len() == 50 {
            break;
        }
    }

    assert_eq!(taken.len(), 50);
    assert_eq!(fetcher.call_count(), 1);
    assert_eq!(cursor.buffered(), 50);
    assert!(!cursor.is_exhausted());
}

#[tokio::test]
async fn test_cursor_short_last_page() {
    let fetcher = FakeFetcher::numbered(125, "vehicles");
    let paginator = vehicles(&fetcher);

    let mut cursor = paginator.cursor(50, QueryParams::new());
    let mut sizes = Vec::new();
    let mut seen = 0;
    while cursor.try_next().await.unwrap().is_some() {
        seen += 1;
        if cursor.buffered() == 0 {
            sizes.push(seen);
            seen = 0;
        }
    }

    assert_eq!(sizes, vec![50, 50, 25]);
    assert_eq!(cursor.pages_fetched(), 3);
    assert!(cursor.is_exhausted());

    let page = paginator.paginate(1, 50, &QueryParams::new()).await.unwrap();
    assert_eq!(page.last_page(), 3);
}

#[tokio::test]
async fn test_cursor_exactly_one_full_page() {
    let fetcher = FakeFetcher::numbered(100, "vehicles");
    let page = vehicles(&fetcher)
        .paginate(1, 100, &QueryParams::new())
        .await
        .unwrap();
    assert_eq!(page.len(), 100);
    assert!(!page.has_more_pages());

    let fetcher = FakeFetcher::numbered(100, "vehicles");
    let items = vehicles(&fetcher)
        .into_cursor(100, QueryParams::new())
        .try_collect()
        .await
        .unwrap();
    assert_eq!(items.len(), 100);
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test]
async fn test_cursor_one_item_spills_to_second_page() {
    let fetcher = FakeFetcher::numbered(101, "vehicles");
    let mut cursor = vehicles(&fetcher).into_cursor(100, QueryParams::new());

    for _ in 0..100 {
        cursor.try_next().await.unwrap().unwrap();
    }
    assert_eq!(fetcher.call_count(), 1);
    assert_eq!(cursor.buffered(), 0);

    let last = cursor.try_next().await.unwrap().unwrap();
    assert_eq!(last["id"], 101);
    assert_eq!(fetcher.call_count(), 2);
    assert_eq!(cursor.buffered(), 0);
    assert!(cursor.try_next().await.unwrap().is_none());
    assert_eq!(fetcher.call_count(), 2);

    let second = vehicles(&fetcher)
        .paginate(2, 100, &QueryParams::new())
        .await
        .unwrap();
    assert_eq!(second.len(), 1);
    assert!(!second.has_more_pages());
}

#[tokio::test]
async fn test_cursor_starting_at() {
    let fetcher = FakeFetcher::numbered(6, "vehicles");
    let items = vehicles(&fetcher)
        .into_cursor(2, QueryParams::new())
        .starting_at(2)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(ids(&items), vec![3, 4, 5, 6]);
    assert_eq!(fetcher.requested_pages(), vec![2, 3]);
}

#[tokio::test]
async fn test_cursor_page_overflow_keeps_last_page() {
    let fetcher = EndlessFetcher::default();
    let mut cursor = Paginator::new(&fetcher, "/v1/vehicles", "vehicles")
        .into_cursor(1, QueryParams::new())
        .starting_at(u32::MAX);

    let item = cursor.try_next().await.unwrap().unwrap();
    assert_eq!(item["id"], u32::MAX);
    assert_eq!(cursor.pages_fetched(), 1);

    for _ in 0..2 {
        let err = cursor.try_next().await.unwrap_err();
        assert!(matches!(err, Error::Pagination { .. }));
    }
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(cursor.pages_fetched(), 1);
}

#[tokio::test]
async fn test_cursor_empty_collection() {
    let fetcher = FakeFetcher::numbered(0, "vehicles");
    let mut cursor = vehicles(&fetcher).into_cursor(25, QueryParams::new());

    assert!(cursor.try_next().await.unwrap().is_none());
    assert!(cursor.try_next().await.unwrap().is_none());
    assert!(cursor.is_exhausted());
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test]
async fn test_cursor_error_after_first_page_items() {
    let fetcher = FakeFetcher::numbered(4, "vehicles").fail_on_page(2, 1);
    let mut cursor = vehicles(&fetcher).into_cursor(2, QueryParams::new());

    assert_eq!(cursor.try_next().await.unwrap().unwrap()["id"], 1);
    assert_eq!(cursor.try_next().await.unwrap().unwrap()["id"], 2);
    assert_eq!(fetcher.call_count(), 1);

    let err = cursor.try_next().await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
    assert_eq!(fetcher.call_count(), 2);
    assert_eq!(cursor.pages_fetched(), 1);
}

#[tokio::test]
async fn test_cursor_retry_after_error_refetches_same_page() {
    let fetcher = FakeFetcher::numbered(4, "vehicles").fail_on_page(2, 1);
    let mut cursor = vehicles(&fetcher).into_cursor(2, QueryParams::new());

    let mut items = Vec::new();
    let mut errors = 0;
    loop {
        match cursor.try_next().await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => break,
            Err(_) => errors += 1,
        }
    }

    assert_eq!(errors, 1);
    assert_eq!(ids(&items), vec![1, 2, 3, 4]);
    assert_eq!(fetcher.requested_pages(), vec![1, 2, 2]);
}

#[tokio::test]
async fn test_cursor_stops_on_empty_page() {
    // Server claims 10 records but the second page comes back empty
    let fetcher = FakeFetcher::with_pages(
        vec![vec![json!({ "id": 1 }), json!({ "id": 2 })], vec![]],
        10,
        "vehicles",
    );

    let items = vehicles(&fetcher)
        .into_cursor(2, QueryParams::new())
        .try_collect()
        .await
        .unwrap();

    assert_eq!(ids(&items), vec![1, 2]);
    assert_eq!(fetcher.call_count(), 2);
}

#[tokio::test]
async fn test_cursor_rejects_zero_per_page_on_first_pull() {
    let fetcher = FakeFetcher::numbered(4, "vehicles");
    let mut cursor = vehicles(&fetcher).into_cursor(0, QueryParams::new());

    let err = cursor.try_next().await.unwrap_err();
    assert!(matches!(err, Error::InvalidPageRequest { .. }));
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn test_cursor_carries_params_on_every_page() {
    let fetcher = FakeFetcher::numbered(6, "vehicles");
    let params = query_params([("status", "active")]);
    vehicles(&fetcher)
        .into_cursor(2, params)
        .try_collect()
        .await
        .unwrap();

    let calls = fetcher.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls
        .iter()
        .all(|call| call.query.get("status") == Some(&"active".to_string())));
}

#[tokio::test]
async fn test_cursors_are_independent() {
    let fetcher = Arc::new(FakeFetcher::numbered(6, "vehicles"));
    let paginator = Paginator::new(Arc::clone(&fetcher), "/v1/vehicles", "vehicles");

    let mut first = paginator.cursor(2, QueryParams::new());
    first.try_next().await.unwrap();
    first.try_next().await.unwrap();
    first.try_next().await.unwrap();

    let second = paginator.cursor(2, QueryParams::new());
    assert!(!second.is_started());

    let all = second.try_collect().await.unwrap();
    assert_eq!(ids(&all), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(first.try_next().await.unwrap().unwrap()["id"], 4);
}

#[tokio::test]
async fn test_cursor_stream_take() {
    let fetcher = FakeFetcher::numbered(1000, "vehicles");
    let items: Vec<Value> = vehicles(&fetcher)
        .into_cursor(100, QueryParams::new())
        .into_stream()
        .take(150)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(items.len(), 150);
    assert_eq!(items[149]["id"], 150);
    assert_eq!(fetcher.call_count(), 2);
}

#[tokio::test]
async fn test_cursor_stream_ends_after_error() {
    let fetcher = FakeFetcher::numbered(4, "vehicles").fail_on_page(2, 1);
    let results: Vec<_> = vehicles(&fetcher)
        .into_cursor(2, QueryParams::new())
        .into_stream()
        .collect()
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(results[2].is_err());
    assert_eq!(fetcher.call_count(), 2);
}
