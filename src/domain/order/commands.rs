use serde::Deserialize;

use super::errors::OrderError;
use super::value_objects::{OrderLine, OrderStatus, OrderStatusSet, ProductId};

// ============================================================================
// Order Commands - inbound requests and their validation
// ============================================================================

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateOrder {
    pub items: Vec<OrderLine>,
}

impl CreateOrder {
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::EmptyItems);
        }

        for item in &self.items {
            if item.product_id <= 0 {
                return Err(OrderError::InvalidProductId(item.product_id));
            }
            if item.quantity <= 0 {
                return Err(OrderError::InvalidQuantity {
                    product_id: item.product_id,
                    quantity: item.quantity,
                });
            }
        }

        Ok(())
    }

    /// Product ids in first-seen order, without repeats
    pub fn distinct_product_ids(&self) -> Vec<ProductId> {
        distinct(self.items.iter().map(|i| i.product_id))
    }
}

pub(crate) fn distinct(ids: impl IntoIterator<Item = ProductId>) -> Vec<ProductId> {
    let mut seen = Vec::new();
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

/// Raw `find_all_orders` query parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderPaginationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub status: Option<OrderStatus>,
}

impl Pagination {
    /// Rows to skip, saturated to `i64::MAX` so it always binds as a
    /// non-negative SQL OFFSET
    pub fn offset(&self) -> i64 {
        let skip = u64::from(self.page.saturating_sub(1)) * u64::from(self.limit);
        i64::try_from(skip).unwrap_or(i64::MAX)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            status: None,
        }
    }
}

impl OrderPaginationQuery {
    pub fn validate(self, statuses: &OrderStatusSet) -> Result<Pagination, OrderError> {
        let page = match self.page {
            None => DEFAULT_PAGE,
            Some(p) => u32::try_from(p)
                .ok()
                .filter(|p| *p > 0)
                .ok_or(OrderError::InvalidPage)?,
        };
        let limit = match self.limit {
            None => DEFAULT_LIMIT,
            Some(l) => u32::try_from(l)
                .ok()
                .filter(|l| *l > 0)
                .ok_or(OrderError::InvalidLimit)?,
        };
        let status = self
            .status
            .as_deref()
            .map(|s| statuses.parse(s))
            .transpose()?;

        Ok(Pagination { page, limit, status })
    }
}

/// Body of a `change_order_status` request; the id comes from the route
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangeOrderStatus {
    pub status: String,
}

impl ChangeOrderStatus {
    pub fn validate(&self, statuses: &OrderStatusSet) -> Result<OrderStatus, OrderError> {
        statuses.parse(&self.status)
    }
}
