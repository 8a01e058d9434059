//! Resource API interaction module
//!
//! # Module Structure
//!
//! - [`client`] - Listing and search operations against the resource API
//! - [`http`] - HTTP utilities (timeouts, status handling, log sanitizing)
//! - [`error`] - The transport error type and its user-facing formatting
//!
//! # Example
//!
//! ```ignore
//! use cloudres::api::{ResourceClient, DEFAULT_TIMEOUT};
//! use cloudres::resource::Category;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = ResourceClient::new("http://localhost:8080", DEFAULT_TIMEOUT)?;
//!     let page = client.list::<serde_json::Value>(Category::Ecs, 1, 10).await?;
//!     println!("{} of {}", page.data.len(), page.total);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod http;

pub use client::{ResourceClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{format_api_error, TransportError};
