//! cloudres
//!
//! Browse, paginate and keyword-search cloud resource inventories (compute
//! instances, databases, load balancers, caches) served by a resource API.
//!
//! - [`api`] - HTTP client for the listing and search endpoints
//! - [`browse`] - The browsing state: category, pagination, keyword and cached pages
//! - [`resource`] - Categories, the page envelope and table column definitions
//! - [`config`] - Persistent user configuration

pub mod api;
pub mod browse;
pub mod config;
pub mod resource;

pub use api::{ResourceClient, TransportError};
pub use browse::{BrowsingState, Outcome, PendingRequest, RequestKind, Response};
pub use resource::{Category, Page, PaginationState, SearchScope};
