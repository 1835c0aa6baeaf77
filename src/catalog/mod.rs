// Private module declaration
mod http;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order::ProductId;

// Re-export for public API
pub use http::HttpProductCatalog;

// ============================================================================
// Product Catalog - validation of product ids against the products service
// ============================================================================
//
// One request/response round trip per call. No caching and no retry: the
// products service is the source of truth for names and prices at call time.
//
// ============================================================================

/// Product record returned by the products service
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ValidatedProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The call could not complete: connection failure, timeout or a reply
    /// that is not a product list
    #[error("Products service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The products service answered with a domain rejection; the raw value
    /// is kept for the boundary fault mapping
    #[error("Products service rejected validation: {0}")]
    ValidationRejected(serde_json::Value),
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Validate product ids. Duplicates are sent as given.
    async fn validate(&self, ids: &[ProductId]) -> Result<Vec<ValidatedProduct>, CatalogError>;
}
