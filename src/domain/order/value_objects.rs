use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::OrderError;

// ============================================================================
// Order Value Objects
// ============================================================================

/// Identifier of a product in the external catalog
pub type ProductId = i64;

/// A requested order line, before any price is known
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// An order line carrying the price snapshot taken at creation time
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

/// A status name that belongs to the configured [`OrderStatusSet`].
///
/// Values are only built through [`OrderStatusSet::parse`] or read back
/// from storage, so an arbitrary string never reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderStatus(String);

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rebuild a status from a persisted column
    pub(crate) fn from_stored(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const DEFAULT_ORDER_STATUSES: &[&str] = &["PENDING", "CONFIRMED", "DELIVERED", "CANCELLED"];

// ============================================================================
// Order Status Set - closed, deployment-defined enumeration
// ============================================================================
//
// The first member is the status every new order starts in. Names are
// upper-case identifiers so they can be embedded in a CHECK constraint.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct OrderStatusSet {
    statuses: Vec<OrderStatus>,
}

impl OrderStatusSet {
    pub fn new<I, S>(names: I) -> Result<Self, OrderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut statuses: Vec<OrderStatus> = Vec::new();

        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
                return Err(OrderError::InvalidStatusName(name.to_string()));
            }
            if statuses.iter().any(|s| s.as_str() == name) {
                return Err(OrderError::DuplicateStatus(name.to_string()));
            }
            statuses.push(OrderStatus(name.to_string()));
        }

        if statuses.is_empty() {
            return Err(OrderError::EmptyStatusSet);
        }

        Ok(Self { statuses })
    }

    /// Parse a comma-separated list such as `PENDING,DELIVERED,CANCELLED`
    pub fn from_csv(list: &str) -> Result<Self, OrderError> {
        Self::new(list.split(',').filter(|s| !s.trim().is_empty()))
    }

    /// Status assigned to freshly created orders
    pub fn initial(&self) -> &OrderStatus {
        &self.statuses[0]
    }

    /// Resolve a raw status name against the set
    pub fn parse(&self, raw: &str) -> Result<OrderStatus, OrderError> {
        self.statuses
            .iter()
            .find(|s| s.as_str() == raw)
            .cloned()
            .ok_or_else(|| OrderError::UnknownStatus {
                status: raw.to_string(),
                valid: self.describe(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderStatus> {
        self.statuses.iter()
    }

    pub fn describe(&self) -> String {
        self.statuses
            .iter()
            .map(OrderStatus::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for OrderStatusSet {
    fn default() -> Self {
        Self {
            statuses: DEFAULT_ORDER_STATUSES
                .iter()
                .map(|s| OrderStatus((*s).to_string()))
                .collect(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
