//! Paginated response envelope and pagination bookkeeping

use serde::{Deserialize, Deserializer, Serialize};

/// Page size used before the server has reported one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page of records as returned by the listing and search endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(
        default = "Vec::new",
        deserialize_with = "null_as_empty",
        bound(deserialize = "T: Deserialize<'de>")
    )]
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// Treat `"data": null` like an empty page
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Pagination record of the browsing state
///
/// `total_items` is always the count the server last reported, never a
/// client-side computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub current_page: u32,
    pub page_size: u32,
    pub total_items: u64,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_items: 0,
        }
    }
}

impl PaginationState {
    /// Number of pages implied by the last reported total (at least 1)
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 || self.total_items == 0 {
            return 1;
        }
        self.total_items.div_ceil(u64::from(self.page_size))
    }
}

impl<T> From<&Page<T>> for PaginationState {
    fn from(page: &Page<T>) -> Self {
        Self {
            current_page: page.page,
            page_size: page.page_size,
            total_items: page.total,
        }
    }
}
