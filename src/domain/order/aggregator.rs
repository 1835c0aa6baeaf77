use rust_decimal::Decimal;

use crate::catalog::ValidatedProduct;
use super::errors::OrderError;
use super::value_objects::{OrderLine, PricedLine};

// ============================================================================
// Order Aggregator - derives totals from requested lines and catalog prices
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals {
    pub total_amount: Decimal,
    pub total_items: i32,
    pub items: Vec<PricedLine>,
}

/// Price every requested line with the first matching validated product.
///
/// Fails on the first line whose product is missing; nothing is returned
/// for a partially priced order.
pub fn aggregate(
    lines: &[OrderLine],
    products: &[ValidatedProduct],
) -> Result<OrderTotals, OrderError> {
    let mut total_amount = Decimal::ZERO;
    let mut total_items: i32 = 0;
    let mut items = Vec::with_capacity(lines.len());

    for line in lines {
        let product = products
            .iter()
            .find(|p| p.id == line.product_id)
            .ok_or(OrderError::ProductNotFound(line.product_id))?;

        let subtotal = product
            .price
            .checked_mul(Decimal::from(line.quantity))
            .ok_or(OrderError::TotalsOverflow)?;

        total_amount = total_amount
            .checked_add(subtotal)
            .ok_or(OrderError::TotalsOverflow)?;
        total_items = total_items
            .checked_add(line.quantity)
            .ok_or(OrderError::TotalsOverflow)?;

        items.push(PricedLine {
            product_id: line.product_id,
            quantity: line.quantity,
            price: product.price,
        });
    }

    Ok(OrderTotals {
        total_amount,
        total_items,
        items,
    })
}
