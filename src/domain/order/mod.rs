// ============================================================================
// Order Domain - Business Logic for Orders
// ============================================================================
//
// This module contains the pure, I/O-free Order code:
// - Value objects (OrderLine, PricedLine, OrderStatus, OrderStatusSet)
// - Commands (CreateOrder, OrderPaginationQuery, ChangeOrderStatus)
// - Errors (OrderError enum)
// - Aggregator (totals from requested lines and catalog prices)
// - Status machine (idempotent, unrestricted transitions)
//
// Persistence lives in crate::store, orchestration in crate::service.
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod aggregator;
pub mod status_machine;

// Re-export for convenience
pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use aggregator::*;
pub use status_machine::*;
