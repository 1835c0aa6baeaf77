//! In-memory order store.
//!
//! Keeps orders in insertion order behind a single `RwLock`, so a create is
//! visible to readers only once header and lines are both in place. Every
//! write is counted so tests can assert that no-op paths skip the store.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NewOrder, OrderStore, Page, PageMeta, StoreError};
use crate::domain::order::{OrderStatus, Pagination};
use crate::models::{Order, OrderItem, OrderWithItems};

pub struct InMemoryOrderStore {
    orders: Arc<RwLock<Vec<OrderWithItems>>>,
    writes: AtomicUsize,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: Arc::new(RwLock::new(Vec::new())),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of write operations (creates and status updates) performed
    #[cfg(test)]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create_with_items(&self, new_order: NewOrder) -> Result<OrderWithItems, StoreError> {
        let now = Utc::now();
        let order_id = Uuid::new_v4();

        let items = new_order
            .items
            .into_iter()
            .map(|line| OrderItem {
                id: Uuid::now_v7(),
                order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                price: line.price,
            })
            .collect();

        let record = OrderWithItems {
            order: Order {
                id: order_id,
                total_amount: new_order.total_amount,
                total_items: new_order.total_items,
                status: new_order.status,
                paid: false,
                paid_at: None,
                created_at: now,
                updated_at: now,
            },
            items,
        };

        self.orders.write().await.push(record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(record)
    }

    async fn find_page(&self, pagination: &Pagination) -> Result<Page<Order>, StoreError> {
        let orders = self.orders.read().await;

        let matching: Vec<&Order> = orders
            .iter()
            .map(|o| &o.order)
            .filter(|o| pagination.status.as_ref().map_or(true, |s| &o.status == s))
            .collect();

        let total = matching.len() as i64;
        let data = matching
            .into_iter()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(pagination.limit as usize)
            .cloned()
            .collect();

        Ok(Page {
            data,
            meta: PageMeta::new(total, pagination.page, pagination.limit),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<OrderWithItems, StoreError> {
        self.orders
            .read()
            .await
            .iter()
            .find(|o| o.order.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update_status(&self, id: Uuid, status: &OrderStatus) -> Result<Order, StoreError> {
        let mut orders = self.orders.write().await;

        let record = orders
            .iter_mut()
            .find(|o| o.order.id == id)
            .ok_or(StoreError::NotFound(id))?;

        record.order.status = status.clone();
        record.order.updated_at = Utc::now();
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(record.order.clone())
    }
}
