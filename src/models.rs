use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::order::{OrderStatus, ProductId};

// ============================================================================
// Persisted Models
// ============================================================================

/// Order header as stored
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub total_amount: Decimal,
    pub total_items: i32,
    pub status: OrderStatus,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of an order, with the price snapshot taken at creation
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

// ============================================================================
// Response Views
// ============================================================================
//
// Product names are never persisted; they are attached from the catalog for
// display only.
//
// ============================================================================

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
    pub name: Option<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemView>,
}

impl OrderDetail {
    /// Attach names by product id; items without a match get `None`
    pub fn with_names<'a, F>(order: OrderWithItems, name_of: F) -> Self
    where
        F: Fn(ProductId) -> Option<&'a str>,
    {
        let items = order
            .items
            .into_iter()
            .map(|item| OrderItemView {
                name: name_of(item.product_id).map(str::to_string),
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
            })
            .collect();

        Self {
            order: order.order,
            items,
        }
    }
}
