//! Browsing State
//!
//! Central state for browsing resource categories: which category is shown,
//! which page, the active search keyword, and the last page fetched for every
//! category.
//!
//! Every operation runs `Idle -> Loading -> Idle`. A failed request is logged,
//! leaves a notice in [`BrowsingState::error_message`] and keeps the data that
//! was there before. Requests carry a sequence number so a response that
//! resolves after a newer request was issued is dropped instead of
//! overwriting fresher state.
//!
//! The `fetch`/`search` operations issue, await and apply in one call. Front
//! ends that keep several requests in flight use the split form instead:
//!
//! ```ignore
//! let request = state.begin_fetch();
//! let response = request.send::<Value>(state.client()).await;
//! state.complete(response);
//! ```

use crate::api::{format_api_error, ResourceClient, TransportError};
use crate::resource::{Category, Page, PaginationState, SearchScope};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// What an issued request asks the server for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    List,
    Search { keyword: String },
}

/// A request issued by the browsing state but not yet applied to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub seq: u64,
    pub category: Category,
    pub page: u32,
    pub page_size: u32,
    pub kind: RequestKind,
}

impl PendingRequest {
    /// Run the request; never touches the browsing state
    pub async fn send<T: DeserializeOwned>(self, client: &ResourceClient) -> Response<T> {
        let result = match &self.kind {
            RequestKind::List => client.list(self.category, self.page, self.page_size).await,
            RequestKind::Search { keyword } => {
                client
                    .search(
                        keyword,
                        SearchScope::Only(self.category),
                        self.page,
                        self.page_size,
                    )
                    .await
            },
        };

        Response {
            request: self,
            result,
        }
    }
}

/// A resolved request, ready for [`BrowsingState::complete`]
#[derive(Debug)]
pub struct Response<T> {
    pub request: PendingRequest,
    pub result: Result<Page<T>, TransportError>,
}

/// What [`BrowsingState::complete`] did with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Results and pagination were replaced
    Applied,
    /// The request failed; state kept its previous data
    Failed,
    /// A newer request was issued meanwhile; response discarded
    Stale,
}

/// Browsing state shared by every front-end consumer
pub struct BrowsingState<T = Value> {
    client: ResourceClient,

    category: Category,
    pagination: PaginationState,
    search_keyword: String,

    // Last page fetched per category
    results: HashMap<Category, Vec<T>>,

    loading: bool,
    error_message: Option<String>,

    // Sequence number of the most recently issued request
    latest_seq: u64,
}

impl<T> BrowsingState<T> {
    /// Fresh state on the default category, page 1, default page size
    pub fn new(client: ResourceClient) -> Self {
        Self {
            client,
            category: Category::default(),
            pagination: PaginationState::default(),
            search_keyword: String::new(),
            results: Category::ALL.into_iter().map(|c| (c, Vec::new())).collect(),
            loading: false,
            error_message: None,
            latest_seq: 0,
        }
    }

    /// Start on `category` instead of the default
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Start with `page_size` records per page instead of the default
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.pagination.page_size = page_size;
        self
    }

    /// Start on `page` instead of page 1
    pub fn with_page(mut self, page: u32) -> Self {
        self.pagination.current_page = page;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn client(&self) -> &ResourceClient {
        &self.client
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    pub fn search_keyword(&self) -> &str {
        &self.search_keyword
    }

    /// Search mode is defined only by a non-empty keyword
    pub fn is_searching(&self) -> bool {
        !self.search_keyword.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Notice left by the last failed request, cleared when a new one is issued
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Last page fetched for `category` (empty if never fetched)
    pub fn results(&self, category: Category) -> &[T] {
        self.results.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Last page fetched for the current category
    pub fn current_results(&self) -> &[T] {
        self.results(self.category)
    }

    pub fn result_mapping(&self) -> &HashMap<Category, Vec<T>> {
        &self.results
    }

    // =========================================================================
    // Side-effect-free setters
    // =========================================================================

    /// Switch category; issues no request
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    /// Set the search keyword; issues no request
    pub fn set_search_keyword(&mut self, keyword: impl Into<String>) {
        self.search_keyword = keyword.into();
    }

    // =========================================================================
    // Issue / apply
    // =========================================================================

    /// Issue a listing request for the current category and page
    pub fn begin_fetch(&mut self) -> PendingRequest {
        self.issue(RequestKind::List)
    }

    /// Issue a search request, or a listing request when no keyword is set
    ///
    /// A keyword search always starts from page 1 and keeps the page size.
    pub fn begin_search(&mut self) -> PendingRequest {
        if self.search_keyword.is_empty() {
            return self.begin_fetch();
        }
        self.pagination.current_page = 1;
        let keyword = self.search_keyword.clone();
        self.issue(RequestKind::Search { keyword })
    }

    fn issue(&mut self, kind: RequestKind) -> PendingRequest {
        self.latest_seq += 1;
        self.loading = true;
        self.error_message = None;

        PendingRequest {
            seq: self.latest_seq,
            category: self.category,
            page: self.pagination.current_page,
            page_size: self.pagination.page_size,
            kind,
        }
    }

    /// Merge a resolved request into the state
    ///
    /// On success the requested category's slice and the pagination record
    /// are replaced with what the server reported. On failure neither is
    /// touched. Responses older than the latest issued request are ignored.
    pub fn complete(&mut self, response: Response<T>) -> Outcome {
        let Response { request, result } = response;

        if request.seq < self.latest_seq {
            tracing::debug!(
                seq = request.seq,
                latest = self.latest_seq,
                category = %request.category,
                "discarding stale response"
            );
            return Outcome::Stale;
        }

        self.loading = false;

        match result {
            Ok(page) => {
                tracing::debug!(
                    category = %request.category,
                    page = page.page,
                    total = page.total,
                    count = page.data.len(),
                    "applying page"
                );
                self.pagination = PaginationState::from(&page);
                self.results.insert(request.category, page.data);
                Outcome::Applied
            },
            Err(e) => {
                match &request.kind {
                    RequestKind::List => {
                        tracing::error!(category = %request.category, "Failed to fetch resources: {}", e)
                    },
                    RequestKind::Search { .. } => {
                        tracing::error!(category = %request.category, "Search failed: {}", e)
                    },
                }
                self.error_message = Some(format_api_error(&e));
                Outcome::Failed
            },
        }
    }
}

impl<T: DeserializeOwned> BrowsingState<T> {
    /// First fetch after construction
    pub async fn initialize(&mut self) -> Outcome {
        self.fetch().await
    }

    /// List the current category at the current page
    pub async fn fetch(&mut self) -> Outcome {
        let request = self.begin_fetch();
        let response = request.send(&self.client).await;
        self.complete(response)
    }

    /// Search the current category; falls back to [`fetch`](Self::fetch)
    /// when the keyword is empty
    pub async fn search(&mut self) -> Outcome {
        let request = self.begin_search();
        let response = request.send(&self.client).await;
        self.complete(response)
    }

    /// Jump to `page` and refetch
    ///
    /// No bounds check against the last total. Always refetches in listing
    /// mode, even while a search keyword is set.
    pub async fn set_page(&mut self, page: u32) -> Outcome {
        self.pagination.current_page = page;
        self.fetch().await
    }

    /// Change the page size, go back to page 1 and refetch
    pub async fn set_page_size(&mut self, page_size: u32) -> Outcome {
        self.pagination.page_size = page_size;
        self.pagination.current_page = 1;
        self.fetch().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DEFAULT_TIMEOUT;
    use reqwest::StatusCode;
    use serde_json::json;

    fn state() -> BrowsingState {
        let client = ResourceClient::new("http://localhost:8080", DEFAULT_TIMEOUT).unwrap();
        BrowsingState::new(client)
    }

    fn page(data: Vec<Value>, total: u64, page: u32, page_size: u32) -> Page<Value> {
        Page {
            data,
            total,
            page,
            page_size,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = state();
        assert_eq!(state.category(), Category::Ecs);
        assert_eq!(state.pagination(), PaginationState::default());
        assert!(!state.is_loading());
        assert!(!state.is_searching());
        for category in Category::ALL {
            assert!(state.results(category).is_empty());
        }
    }

    #[test]
    fn test_begin_fetch_snapshots_current_parameters() {
        let mut state = state().with_category(Category::Rds).with_page_size(25);
        let request = state.begin_fetch();

        assert_eq!(request.seq, 1);
        assert_eq!(request.category, Category::Rds);
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 25);
        assert_eq!(request.kind, RequestKind::List);
        assert!(state.is_loading());
    }

    #[test]
    fn test_begin_search_without_keyword_lists() {
        let mut state = state();
        assert_eq!(state.begin_search().kind, RequestKind::List);

        state.set_search_keyword("prod");
        assert_eq!(
            state.begin_search().kind,
            RequestKind::Search {
                keyword: "prod".to_string()
            }
        );
    }

    #[test]
    fn test_begin_search_starts_at_first_page() {
        let mut state = state().with_page_size(25).with_page(5);
        state.set_search_keyword("prod");

        let request = state.begin_search();
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 25);
        assert_eq!(state.pagination().current_page, 1);
    }

    #[test]
    fn test_begin_search_without_keyword_keeps_page() {
        let mut state = state().with_page(3);
        assert_eq!(state.begin_search().page, 3);
    }

    #[test]
    fn test_complete_writes_requested_category() {
        let mut state = state();
        let request = state.begin_fetch();
        // Switching category while in flight does not redirect the response
        state.set_category(Category::Slb);

        let outcome = state.complete(Response {
            request,
            result: Ok(page(vec![json!({"InstanceID": "i-1"})], 1, 1, 10)),
        });

        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(state.results(Category::Ecs).len(), 1);
        assert!(state.results(Category::Slb).is_empty());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_failure_sets_notice_and_clears_loading() {
        let mut state = state();
        let request = state.begin_fetch();

        let outcome = state.complete(Response {
            request,
            result: Err(TransportError::Status {
                status: StatusCode::BAD_GATEWAY,
            }),
        });

        assert_eq!(outcome, Outcome::Failed);
        assert!(!state.is_loading());
        assert_eq!(
            state.error_message(),
            Some("Resource API temporarily unavailable. Please try again.")
        );

        // Next request clears the notice
        let _ = state.begin_fetch();
        assert!(state.error_message().is_none());
    }

    #[test]
    fn test_stale_response_keeps_loading_until_latest_resolves() {
        let mut state = state();
        let first = state.begin_fetch();
        let second = state.begin_fetch();

        let outcome = state.complete(Response {
            request: first,
            result: Ok(page(vec![json!({"old": true})], 1, 1, 10)),
        });
        assert_eq!(outcome, Outcome::Stale);
        assert!(state.is_loading());
        assert!(state.current_results().is_empty());

        let outcome = state.complete(Response {
            request: second,
            result: Ok(page(vec![], 0, 1, 10)),
        });
        assert_eq!(outcome, Outcome::Applied);
        assert!(!state.is_loading());
    }
}
