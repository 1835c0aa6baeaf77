use super::value_objects::OrderStatus;

// ============================================================================
// Order Status Machine
// ============================================================================
//
// Any status of the configured set is reachable from any other. The only rule
// is idempotence: asking for the current status is a no-op and must not reach
// the store.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub status: OrderStatus,
    pub changed: bool,
}

pub fn transition(current: &OrderStatus, requested: &OrderStatus) -> Transition {
    if current == requested {
        return Transition {
            status: current.clone(),
            changed: false,
        };
    }

    Transition {
        status: requested.clone(),
        changed: true,
    }
}
