//! Order lifecycle rules
//!
//! Pure functions over `OrderStatus`; persistence and event emission
//! live in the manager.

use crate::db::models::OrderStatus;

/// States an order may move to from the given state via the generic
/// status update.
///
/// The admin status endpoint is deliberately permissive: support staff
/// correct mis-set states through it, so every state except the
/// terminal ones can reach every other. Cancel and return go through
/// their own guarded operations instead.
pub fn allowed_next_statuses(from: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;
    if is_terminal(from) {
        &[]
    } else {
        &[Processing, Accepted, Shipped, Delivered, Cancelled, Returned]
    }
}

/// Terminal states accept no further transitions
pub fn is_terminal(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Cancelled | OrderStatus::Returned)
}

/// A customer may cancel until the order leaves the warehouse
pub fn can_cancel(status: OrderStatus) -> bool {
    !matches!(
        status,
        OrderStatus::Shipped
            | OrderStatus::Delivered
            | OrderStatus::Cancelled
            | OrderStatus::Returned
    )
}

/// A customer may return only what has actually arrived
pub fn can_return(status: OrderStatus) -> bool {
    status == OrderStatus::Delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn cancel_allowed_before_shipment_only() {
        assert!(can_cancel(Processing));
        assert!(can_cancel(Accepted));
        assert!(!can_cancel(Shipped));
        assert!(!can_cancel(Delivered));
        assert!(!can_cancel(Cancelled));
        assert!(!can_cancel(Returned));
    }

    #[test]
    fn return_requires_delivery() {
        assert!(can_return(Delivered));
        for s in [Processing, Accepted, Shipped, Cancelled, Returned] {
            assert!(!can_return(s));
        }
    }

    #[test]
    fn terminal_states_allow_no_transitions() {
        assert!(allowed_next_statuses(Cancelled).is_empty());
        assert!(allowed_next_statuses(Returned).is_empty());
        assert!(is_terminal(Cancelled));
        assert!(is_terminal(Returned));
        assert!(!is_terminal(Processing));
    }

    #[test]
    fn active_states_reach_all_statuses() {
        for s in [Processing, Accepted, Shipped, Delivered] {
            let next = allowed_next_statuses(s);
            assert_eq!(next.len(), 6);
            assert!(next.contains(&Cancelled));
        }
    }
}
