//! Property-based tests using proptest
//!
//! These tests drive the issue/apply cycle of the browsing state with
//! synthesized responses, so no server is involved.

use cloudres::api::{ResourceClient, TransportError, DEFAULT_TIMEOUT};
use cloudres::resource::{Category, Page, PaginationState};
use cloudres::{BrowsingState, Outcome, Response};
use proptest::prelude::*;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn new_state() -> BrowsingState {
    let client =
        ResourceClient::new("http://localhost:8080", DEFAULT_TIMEOUT).expect("client should build");
    BrowsingState::new(client)
}

fn arb_category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

/// Generate arbitrary resource records
fn arb_record() -> impl Strategy<Value = Value> {
    (
        "i-[a-z0-9]{8}",
        "[a-z][a-z0-9-]{0,20}",
        prop_oneof!["Running", "Stopped", "Starting"],
        "cn-[a-z]+",
    )
        .prop_map(|(id, name, status, region)| {
            json!({
                "InstanceID": id,
                "InstanceName": name,
                "Status": status,
                "RegionID": region
            })
        })
}

fn arb_page() -> impl Strategy<Value = Page<Value>> {
    (
        prop::collection::vec(arb_record(), 0..20),
        0u64..500,
        1u32..50,
        1u32..50,
    )
        .prop_map(|(data, total, page, page_size)| Page {
            data,
            total,
            page,
            page_size,
        })
}

fn arb_status() -> impl Strategy<Value = StatusCode> {
    prop_oneof![
        Just(StatusCode::BAD_REQUEST),
        Just(StatusCode::NOT_FOUND),
        Just(StatusCode::TOO_MANY_REQUESTS),
        Just(StatusCode::INTERNAL_SERVER_ERROR),
        Just(StatusCode::SERVICE_UNAVAILABLE),
    ]
}

/// Apply a successful page for each category so every slice has data
fn prefill(state: &mut BrowsingState, pages: Vec<(Category, Page<Value>)>) {
    for (category, page) in pages {
        state.set_category(category);
        let request = state.begin_fetch();
        state.complete(Response {
            request,
            result: Ok(page),
        });
    }
}

fn arb_prefill() -> impl Strategy<Value = Vec<(Category, Page<Value>)>> {
    prop::collection::vec((arb_category(), arb_page()), 0..5)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A successful response replaces exactly the requested slice and the pagination record
    #[test]
    fn success_replaces_only_requested_category(
        history in arb_prefill(),
        category in arb_category(),
        page in arb_page(),
    ) {
        let mut state = new_state();
        prefill(&mut state, history);
        let before = state.result_mapping().clone();

        state.set_category(category);
        let request = state.begin_fetch();
        let outcome = state.complete(Response { request, result: Ok(page.clone()) });

        prop_assert_eq!(outcome, Outcome::Applied);
        prop_assert_eq!(state.results(category), page.data.as_slice());
        prop_assert_eq!(state.pagination(), PaginationState {
            current_page: page.page,
            page_size: page.page_size,
            total_items: page.total,
        });
        for other in Category::ALL.into_iter().filter(|c| *c != category) {
            prop_assert_eq!(state.results(other), before[&other].as_slice());
        }
        prop_assert!(!state.is_loading());
    }

    /// A failed response leaves results and pagination untouched
    #[test]
    fn failure_preserves_state(
        history in arb_prefill(),
        category in arb_category(),
        status in arb_status(),
    ) {
        let mut state = new_state();
        prefill(&mut state, history);
        state.set_category(category);
        let results_before = state.result_mapping().clone();
        let pagination_before = state.pagination();

        let request = state.begin_fetch();
        let outcome = state.complete(Response {
            request,
            result: Err(TransportError::Status { status }),
        });

        prop_assert_eq!(outcome, Outcome::Failed);
        prop_assert_eq!(state.result_mapping(), &results_before);
        prop_assert_eq!(state.pagination(), pagination_before);
        prop_assert!(!state.is_loading());
        prop_assert!(state.error_message().is_some());
    }

    /// A response to a superseded request never changes state
    #[test]
    fn stale_response_is_ignored(
        history in arb_prefill(),
        first in arb_category(),
        second in arb_category(),
        stale_page in arb_page(),
        newer_requests in 1usize..4,
    ) {
        let mut state = new_state();
        prefill(&mut state, history);

        state.set_category(first);
        let stale = state.begin_fetch();
        state.set_category(second);
        for _ in 0..newer_requests {
            let _ = state.begin_fetch();
        }

        let results_before = state.result_mapping().clone();
        let pagination_before = state.pagination();

        let outcome = state.complete(Response { request: stale, result: Ok(stale_page) });

        prop_assert_eq!(outcome, Outcome::Stale);
        prop_assert_eq!(state.result_mapping(), &results_before);
        prop_assert_eq!(state.pagination(), pagination_before);
        prop_assert!(state.is_loading());
    }

    /// Sequence numbers strictly increase across issued requests
    #[test]
    fn sequence_numbers_increase(
        ops in prop::collection::vec(any::<bool>(), 1..20),
        keyword in "[a-z]{0,6}",
    ) {
        let mut state = new_state();
        state.set_search_keyword(keyword);
        let mut last = 0;
        for search in ops {
            let request = if search { state.begin_search() } else { state.begin_fetch() };
            prop_assert!(request.seq > last);
            last = request.seq;
        }
    }
}
