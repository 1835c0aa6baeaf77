// Private module declarations
mod memory;
mod postgres;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::order::{OrderStatus, Pagination, PricedLine};
use crate::models::{Order, OrderWithItems};

// Re-export for public API
pub use memory::InMemoryOrderStore;
pub use postgres::PgOrderStore;

// ============================================================================
// Order Store - transactional persistence for the Order aggregate
// ============================================================================
//
// Contract shared by every backend:
// 1. create_with_items writes the header and all lines in ONE transaction;
//    concurrent readers never observe a partial order
// 2. find_page filters by status (optional) and pages by offset
// 3. find_by_id returns the header with its lines, or NotFound
// 4. update_status touches a single row; last write wins
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Order with id: {0} not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Everything needed to persist a new order; totals are already derived
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub total_amount: Decimal,
    pub total_items: i32,
    pub status: OrderStatus,
    pub items: Vec<PricedLine>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub page: u32,
    pub last_page: i64,
}

impl PageMeta {
    /// `last_page = ceil(total / limit)`; zero when there are no rows
    pub fn new(total: i64, page: u32, limit: u32) -> Self {
        let limit = i64::from(limit.max(1));
        Self {
            total,
            page,
            last_page: (total + limit - 1) / limit,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create_with_items(&self, order: NewOrder) -> Result<OrderWithItems, StoreError>;

    async fn find_page(&self, pagination: &Pagination) -> Result<Page<Order>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<OrderWithItems, StoreError>;

    async fn update_status(&self, id: Uuid, status: &OrderStatus) -> Result<Order, StoreError>;
}
