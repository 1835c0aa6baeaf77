// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Domain-specific types and rules, free of I/O. Each aggregate has its own
// subdirectory with:
// - Value objects
// - Commands
// - Errors
// - Pure domain services (aggregation, status transitions)
//
// ============================================================================

pub mod order;
