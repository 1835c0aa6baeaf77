use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use super::{CatalogError, ProductCatalog, ValidatedProduct};
use crate::domain::order::ProductId;

#[derive(Serialize)]
struct ValidateProductsRequest<'a> {
    ids: &'a [ProductId],
}

/// Product catalog reached over HTTP: `POST {base_url}/products/validate`
pub struct HttpProductCatalog {
    client: reqwest::Client,
    validate_url: String,
}

impl HttpProductCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::UpstreamUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            validate_url: format!("{}/products/validate", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl ProductCatalog for HttpProductCatalog {
    async fn validate(&self, ids: &[ProductId]) -> Result<Vec<ValidatedProduct>, CatalogError> {
        tracing::debug!(
            url = %self.validate_url,
            product_count = ids.len(),
            "Validating products"
        );

        let response = self
            .client
            .post(&self.validate_url)
            .json(&ValidateProductsRequest { ids })
            .send()
            .await
            .map_err(|e| CatalogError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogError::UpstreamUnavailable(e.to_string()))?;

        let products = decode_reply(status, &body)?;

        tracing::debug!(
            requested = ids.len(),
            returned = products.len(),
            "Products validated"
        );

        Ok(products)
    }
}

/// Interpret a products service reply.
///
/// A success status must carry a product list. Any other status is a
/// rejection when its body is JSON carrying a `message`, or when it is a
/// client error; server errors without such a body count as unavailability.
fn decode_reply(status: u16, body: &[u8]) -> Result<Vec<ValidatedProduct>, CatalogError> {
    if (200..300).contains(&status) {
        return serde_json::from_slice(body).map_err(|e| {
            CatalogError::UpstreamUnavailable(format!("malformed products reply: {}", e))
        });
    }

    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) if value.get("message").is_some() => Err(CatalogError::ValidationRejected(value)),
        _ if status >= 500 => Err(CatalogError::UpstreamUnavailable(format!(
            "products service responded with status {}",
            status
        ))),
        _ => Err(CatalogError::ValidationRejected(serde_json::json!({
            "status": status,
            "message": String::from_utf8_lossy(body),
        }))),
    }
}
