use fleet_sdk::pagination::{PageMetadata, Paginator};
use fleet_sdk::testing::FakeFetcher;
use fleet_sdk::QueryParams;
use proptest::prelude::*;
use serde_json::Value;
use tokio_test::block_on;

fn expected_pages(total: u64, per_page: u32) -> u64 {
    if total == 0 {
        1
    } else {
        (total + u64::from(per_page) - 1) / u64::from(per_page)
    }
}

fn ids(items: &[Value]) -> Vec<u64> {
    items.iter().filter_map(|v| v["id"].as_u64()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn last_page_is_ceiling(total in 0u64..1_000_000, per_page in 1u32..1000) {
        let metadata = PageMetadata::new(total, per_page, 1).expect("valid metadata");
        prop_assert_eq!(metadata.last_page(), expected_pages(total, per_page));
    }

    #[test]
    fn has_more_pages_matches_last_page(
        total in 0u64..10_000,
        per_page in 1u32..200,
        current_page in 1u32..200,
    ) {
        let metadata = PageMetadata::new(total, per_page, current_page).expect("valid metadata");
        prop_assert_eq!(
            metadata.has_more_pages(),
            u64::from(current_page) < metadata.last_page()
        );
    }

    #[test]
    fn draining_fetches_every_page_once(total in 0u64..400, per_page in 1u32..60) {
        let fetcher = FakeFetcher::numbered(total, "vehicles");
        let items = block_on(
            Paginator::new(&fetcher, "/v1/vehicles", "vehicles")
                .into_cursor(per_page, QueryParams::new())
                .try_collect(),
        ).expect("cursor drains");

        prop_assert_eq!(ids(&items), (1..=total).collect::<Vec<_>>());
        prop_assert_eq!(fetcher.call_count() as u64, expected_pages(total, per_page));
    }

    #[test]
    fn partial_read_within_first_page_costs_one_fetch(
        total in 1u64..400,
        per_page in 1u32..60,
        wanted in 1usize..60,
    ) {
        let wanted = wanted.min(per_page as usize).min(total as usize);
        let fetcher = FakeFetcher::numbered(total, "vehicles");

        let taken = block_on(async {
            let mut cursor = Paginator::new(&fetcher, "/v1/vehicles", "vehicles")
                .into_cursor(per_page, QueryParams::new());
            let mut taken = Vec::new();
            while taken.len() < wanted {
                match cursor.try_next().await.expect("page fetch succeeds") {
                    Some(item) => taken.push(item),
                    None => break,
                }
            }
            taken
        });

        prop_assert_eq!(taken.len(), wanted);
        prop_assert_eq!(fetcher.call_count(), 1);
    }

    #[test]
    fn cursor_matches_sequential_pages(total in 0u64..300, per_page in 1u32..50) {
        let fetcher = FakeFetcher::numbered(total, "vehicles");
        let paginator = Paginator::new(&fetcher, "/v1/vehicles", "vehicles");

        let (from_cursor, from_pages) = block_on(async {
            let from_cursor = paginator
                .cursor(per_page, QueryParams::new())
                .try_collect()
                .await
                .expect("cursor drains");

            let mut from_pages = Vec::new();
            let mut page = 1;
            loop {
                let result = paginator
                    .paginate(page, per_page, &QueryParams::new())
                    .await
                    .expect("page fetch succeeds");
                let more = result.has_more_pages();
                from_pages.extend(result.into_items());
                if !more {
                    break;
                }
                page += 1;
            }
            (from_cursor, from_pages)
        });

        prop_assert_eq!(from_cursor, from_pages);
    }
}
