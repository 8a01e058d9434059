//! Resource API client
//!
//! Translates typed listing and search requests into HTTP calls against the
//! resource API. No retries and no caching: every failure is logged and
//! handed back to the caller unchanged.

use super::error::TransportError;
use super::http::ApiHttpClient;
use crate::resource::{Category, Page, SearchScope};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Per-request timeout used by the reference deployment
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    page: u32,
    page_size: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery<'a> {
    q: &'a str,
    #[serde(rename = "type")]
    scope: &'static str,
    page: u32,
    page_size: u32,
}

/// Client for the listing and search endpoints
#[derive(Clone)]
pub struct ResourceClient {
    http: ApiHttpClient,
    base_url: Url,
}

impl ResourceClient {
    /// Create a new client bounded by `timeout` per request
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http = ApiHttpClient::new(timeout)?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Create a client on top of an existing reqwest client
    pub fn from_reqwest(base_url: &str, client: reqwest::Client) -> Result<Self, TransportError> {
        Ok(Self {
            http: ApiHttpClient::from_reqwest(client),
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segment: &str) -> Result<Url, TransportError> {
        Ok(self.base_url.join(segment)?)
    }

    /// List one page of a category: `GET /<category>?page=&pageSize=`
    ///
    /// `page` and `page_size` are sent as given; the server validates them.
    pub async fn list<T: DeserializeOwned>(
        &self,
        category: Category,
        page: u32,
        page_size: u32,
    ) -> Result<Page<T>, TransportError> {
        let url = self.endpoint(category.as_str())?;
        tracing::debug!(%category, page, page_size, "listing resources");

        self.http
            .get_json(url, &ListQuery { page, page_size })
            .await
    }

    /// Search by keyword: `GET /search?q=&type=&page=&pageSize=`
    ///
    /// Callers must not pass an empty keyword; the server rejects it.
    pub async fn search<T: DeserializeOwned>(
        &self,
        keyword: &str,
        scope: SearchScope,
        page: u32,
        page_size: u32,
    ) -> Result<Page<T>, TransportError> {
        let url = self.endpoint("search")?;
        tracing::debug!(%scope, page, page_size, "searching resources");

        let query = SearchQuery {
            q: keyword,
            scope: scope.as_str(),
            page,
            page_size,
        };
        self.http.get_json(url, &query).await
    }
}

/// Parse the base URL and make sure relative joins append to its path
fn normalize_base_url(base_url: &str) -> Result<Url, TransportError> {
    let mut url = Url::parse(base_url.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
