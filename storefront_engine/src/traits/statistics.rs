use chrono::{DateTime, Utc};
use spg_common::Vnd;

use crate::{
    db_types::{Order, OrderStatus},
    traits::StorefrontApiError,
};

/// The handful of read-only queries the revenue reports are built from. Aggregation itself happens in
/// [`crate::StatisticsApi`]; backends only filter and count.
#[allow(async_fn_in_trait)]
pub trait StatisticsQueries {
    /// All orders with a completed payment created at or after `since`, oldest first.
    async fn fetch_completed_orders_since(&self, since: DateTime<Utc>) -> Result<Vec<Order>, StorefrontApiError>;

    /// The all-time sum of completed-payment order totals.
    async fn total_completed_revenue(&self) -> Result<Vnd, StorefrontApiError>;

    async fn count_orders(&self) -> Result<i64, StorefrontApiError>;

    async fn count_orders_with_status(&self, status: OrderStatus) -> Result<i64, StorefrontApiError>;

    /// The `limit` most recently created orders, newest first.
    async fn fetch_recent_orders(&self, limit: i64) -> Result<Vec<Order>, StorefrontApiError>;
}
