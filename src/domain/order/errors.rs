use super::value_objects::ProductId;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Product with id: {0} not found")]
    ProductNotFound(ProductId),

    #[error("Order items cannot be empty")]
    EmptyItems,

    #[error("Invalid item quantity for product {product_id}: {quantity}")]
    InvalidQuantity { product_id: ProductId, quantity: i32 },

    #[error("Invalid product id: {0}")]
    InvalidProductId(ProductId),

    #[error("Order totals overflow")]
    TotalsOverflow,

    #[error("Valid status are {valid}, got {status}")]
    UnknownStatus { status: String, valid: String },

    #[error("Invalid status name: {0:?}")]
    InvalidStatusName(String),

    #[error("Duplicate status name: {0}")]
    DuplicateStatus(String),

    #[error("Order status set cannot be empty")]
    EmptyStatusSet,

    #[error("page must be a positive integer")]
    InvalidPage,

    #[error("limit must be a positive integer")]
    InvalidLimit,
}
