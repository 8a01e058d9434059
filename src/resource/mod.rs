//! Resource abstraction layer
//!
//! # Architecture
//!
//! - [`category`] - The closed set of resource categories and search scopes
//! - [`page`] - The paginated response envelope and pagination bookkeeping
//! - [`registry`] - Display names and table columns loaded from embedded JSON
//!
//! Records themselves are opaque to this crate. They default to
//! [`serde_json::Value`] but any `DeserializeOwned` type can be used.

pub mod category;
pub mod page;
pub mod registry;

pub use category::{Category, SearchScope, UnknownCategory};
pub use page::{Page, PaginationState, DEFAULT_PAGE_SIZE};
pub use registry::{
    columns_for, display_name, extract_json_value, get_category_def, id_field,
    ColumnDef,
};
