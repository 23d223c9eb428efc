//! Remote recipe catalog client for ladle.
//!
//! Wraps the catalog's two remote operations (complex search and per-recipe
//! detail) behind a retrying, caching client. The retry policies differ by
//! endpoint on purpose: detail fetches back off exponentially, searches
//! back off linearly. Exhaustion degrades (sentinel candidate / empty list)
//! rather than erroring: the pipeline must keep running on a dead catalog.

pub mod api;
pub mod client;
pub mod types;

// Re-export main types
pub use api::{ApiError, CatalogApi, HttpCatalogApi};
pub use client::{CatalogClient, DetailCache};
pub use types::{DetailResponse, SearchParams};
