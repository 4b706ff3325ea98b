mod client;
pub mod dto;

pub use client::OpenFoodFactsClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::product::model::{ProductDetail, SearchPage};

/// Failures of a catalog request. Controllers show these through `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Valid request, no matching product.
    #[error("Not found")]
    NotFound,
    /// The call could not complete (transport, timeout, non-success status).
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid request: {0}")]
    Validation(String),
    /// The remote answered with a body we could not read.
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Remote product lookup backing every controller.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product_by_code(&self, code: &str) -> Result<ProductDetail, CatalogError>;

    /// `page` is 1-based.
    async fn search_products(&self, query: &str, page: u32) -> Result<SearchPage, CatalogError>;
}
