//! The one implicit fulfilment-status transition in the system.
//!
//! Payment events may move an order's *fulfilment* status in exactly one case, summarised here:
//!
//! | Payment \ Order | Pending    | Processing | Shipped | Delivered | Cancelled |
//! |-----------------|------------|------------|---------|-----------|-----------|
//! | Completed       | Processing | —          | —       | —         | —         |
//! | Pending         | —          | —          | —       | —         | —         |
//! | Failed          | —          | —          | —       | —         | —         |
//! | Refunded        | —          | —          | —       | —         | —         |
//!
//! A completed payment on a still-pending order advances it to `Processing`; nothing else moves, and the
//! transition never runs in reverse. Admin overrides go through `update_order_status`, which is unconditional by
//! design and does not consult this table.

use crate::db_types::{OrderStatus, PaymentStatus};

/// The fulfilment status an order should have after its payment status changes to `payment`.
pub fn order_status_after_payment(payment: PaymentStatus, current: OrderStatus) -> OrderStatus {
    match (payment, current) {
        (PaymentStatus::Completed, OrderStatus::Pending) => OrderStatus::Processing,
        (_, current) => current,
    }
}
