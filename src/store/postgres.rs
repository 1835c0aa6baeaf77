use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{NewOrder, OrderStore, Page, PageMeta, StoreError};
use crate::domain::order::{OrderStatus, OrderStatusSet, Pagination, ProductId};
use crate::models::{Order, OrderItem, OrderWithItems};

// ============================================================================
// Postgres Order Store
// ============================================================================
//
// Tables:
// - orders       header row, status constrained to the configured set
// - order_items  one row per line, ON DELETE CASCADE from orders
//
// Writes of a new order go through a single transaction; dropping the
// transaction before commit rolls everything back.
//
// ============================================================================

const ORDER_COLUMNS: &str =
    "id, total_amount, total_items, status, paid, paid_at, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, price";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    total_amount: Decimal,
    total_items: i32,
    status: String,
    paid: bool,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            total_amount: row.total_amount,
            total_items: row.total_items,
            status: OrderStatus::from_stored(row.status),
            paid: row.paid,
            paid_at: row.paid_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: Uuid,
    order_id: Uuid,
    product_id: ProductId,
    quantity: i32,
    price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if they do not exist yet.
    ///
    /// The status CHECK constraint is only written on first creation; a
    /// changed status set needs a manual migration of the constraint.
    pub async fn ensure_schema(&self, statuses: &OrderStatusSet) -> Result<(), StoreError> {
        for statement in schema_statements(statuses) {
            sqlx::query(&statement).execute(&self.pool).await?;
        }

        tracing::info!(statuses = %statuses.describe(), "Order schema ready");
        Ok(())
    }
}

/// DDL for the order tables. Status names are restricted to `[A-Z_]+` by
/// `OrderStatusSet`, so quoting them inline is safe.
fn schema_statements(statuses: &OrderStatusSet) -> Vec<String> {
    let allowed = statuses
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS orders (
                id UUID PRIMARY KEY,
                total_amount NUMERIC NOT NULL CHECK (total_amount >= 0),
                total_items INTEGER NOT NULL CHECK (total_items >= 0),
                status TEXT NOT NULL CHECK (status IN ({})),
                paid BOOLEAN NOT NULL DEFAULT FALSE,
                paid_at TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
            allowed
        ),
        "CREATE INDEX IF NOT EXISTS orders_status_idx ON orders (status)".to_string(),
        "CREATE TABLE IF NOT EXISTS order_items (
            id UUID PRIMARY KEY,
            order_id UUID NOT NULL REFERENCES orders (id) ON DELETE CASCADE,
            product_id BIGINT NOT NULL,
            quantity INTEGER NOT NULL CHECK (quantity > 0),
            price NUMERIC NOT NULL CHECK (price >= 0)
        )"
        .to_string(),
        "CREATE INDEX IF NOT EXISTS order_items_order_id_idx ON order_items (order_id)".to_string(),
    ]
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn create_with_items(&self, new_order: NewOrder) -> Result<OrderWithItems, StoreError> {
        let order_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        let order: Order = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders (id, total_amount, total_items, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .bind(new_order.total_amount)
        .bind(new_order.total_items)
        .bind(new_order.status.as_str())
        .fetch_one(&mut *tx)
        .await?
        .into();

        let insert_item = format!(
            "INSERT INTO order_items (id, order_id, product_id, quantity, price)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            ITEM_COLUMNS
        );

        let mut items = Vec::with_capacity(new_order.items.len());
        for line in &new_order.items {
            let item: OrderItem = sqlx::query_as::<_, OrderItemRow>(&insert_item)
                .bind(Uuid::now_v7())
                .bind(order_id)
                .bind(line.product_id)
                .bind(line.quantity)
                .bind(line.price)
                .fetch_one(&mut *tx)
                .await?
                .into();
            items.push(item);
        }

        tx.commit().await?;

        tracing::info!(
            order_id = %order_id,
            item_count = items.len(),
            total_amount = %order.total_amount,
            "Persisted order with items"
        );

        Ok(OrderWithItems { order, items })
    }

    async fn find_page(&self, pagination: &Pagination) -> Result<Page<Order>, StoreError> {
        let status = pagination.status.as_ref().map(OrderStatus::as_str);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders
             WHERE ($1::text IS NULL OR status = $1)
             ORDER BY created_at, id
             LIMIT $2 OFFSET $3",
            ORDER_COLUMNS
        ))
        .bind(status)
        .bind(i64::from(pagination.limit))
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            data: rows.into_iter().map(Order::from).collect(),
            meta: PageMeta::new(total, pagination.page, pagination.limit),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<OrderWithItems, StoreError> {
        let order: Order = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))?
        .into();

        let items = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {} FROM order_items WHERE order_id = $1 ORDER BY id",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();

        Ok(OrderWithItems { order, items })
    }

    async fn update_status(&self, id: Uuid, status: &OrderStatus) -> Result<Order, StoreError> {
        let order: Order = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET status = $2, updated_at = now()
             WHERE id = $1
             RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))?
        .into();

        tracing::info!(order_id = %id, status = %order.status, "Updated order status");

        Ok(order)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
//
// The query tests run against the Postgres in DATABASE_URL and return early
// when it is unset. Each one works in its own schema, dropped at the end.
//
// ============================================================================
