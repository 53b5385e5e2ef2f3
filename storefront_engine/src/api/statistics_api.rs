use std::{collections::BTreeMap, fmt::Debug};

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use log::*;
use spg_common::Vnd;

use crate::{
    api::objects::{DashboardSummary, MethodTotal, RevenueReport, TimeRange, TimelineBucket},
    db_types::{Order, OrderStatus, ALL_PAYMENT_METHODS},
    traits::{StatisticsQueries, StorefrontApiError},
};

const RECENT_ORDER_COUNT: i64 = 5;

/// Revenue reporting over the order ledger.
///
/// Revenue is always *derived* from completed orders, never accumulated as a running counter, so a replayed
/// payment callback cannot double-count anything.
pub struct StatisticsApi<B> {
    db: B,
}

impl<B> Debug for StatisticsApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StatisticsApi")
    }
}

impl<B> StatisticsApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> StatisticsApi<B>
where B: StatisticsQueries
{
    /// Revenue over the window ending now. See [`Self::revenue_for_at`].
    pub async fn revenue_for(&self, range: TimeRange) -> Result<RevenueReport, StorefrontApiError> {
        self.revenue_for_at(range, Utc::now()).await
    }

    /// Revenue over the window ending at `now`, over orders whose payment completed. Split out from
    /// [`Self::revenue_for`] so tests can pin the clock.
    pub async fn revenue_for_at(
        &self,
        range: TimeRange,
        now: DateTime<Utc>,
    ) -> Result<RevenueReport, StorefrontApiError> {
        let since = range.start_from(now);
        let orders = self.db.fetch_completed_orders_since(since).await?;
        let total_revenue = orders.iter().map(|o| o.total).sum();
        let payment_methods = ALL_PAYMENT_METHODS
            .iter()
            .map(|&method| MethodTotal {
                method,
                total: orders.iter().filter(|o| o.payment_method == method).map(|o| o.total).sum(),
            })
            .collect();
        let timeline = bucket_timeline(&orders, range);
        debug!("📊️ Revenue report for the last {range}: {} orders totalling {total_revenue}", orders.len());
        Ok(RevenueReport { total_revenue, payment_methods, timeline, order_count: orders.len() })
    }

    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, StorefrontApiError> {
        let total_revenue = self.db.total_completed_revenue().await?;
        let order_count = self.db.count_orders().await?;
        let pending_order_count = self.db.count_orders_with_status(OrderStatus::Pending).await?;
        let recent_orders = self.db.fetch_recent_orders(RECENT_ORDER_COUNT).await?;
        Ok(DashboardSummary { total_revenue, order_count, pending_order_count, recent_orders })
    }
}

/// Group orders into date buckets: calendar days for the short ranges, calendar months for the year range.
///
/// Buckets are keyed by the bucket's start date, so ordering is chronological by construction and two buckets
/// that happen to share a display label (the same day-and-month in different years) can never merge.
fn bucket_timeline(orders: &[Order], range: TimeRange) -> Vec<TimelineBucket> {
    let mut buckets: BTreeMap<NaiveDate, Vnd> = BTreeMap::new();
    for order in orders {
        let date = order.created_at.date_naive();
        let key = match range {
            TimeRange::Year => date.with_day(1).unwrap_or(date),
            _ => date,
        };
        *buckets.entry(key).or_default() += order.total;
    }
    buckets
        .into_iter()
        .map(|(date, amount)| {
            let label = match range {
                TimeRange::Year => date.format("%b %Y").to_string(),
                _ => date.format("%-d %b").to_string(),
            };
            TimelineBucket { label, amount, timestamp: date.and_time(NaiveTime::MIN).and_utc() }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;
    use crate::db_types::{CustomerInfo, OrderReference, PaymentMethod, PaymentStatus};

    fn order_on(date: DateTime<Utc>, total: i64) -> Order {
        Order {
            id: 0,
            reference: OrderReference("0011223344AA".into()),
            user_id: "u1".into(),
            items: vec![],
            total: Vnd::from(total),
            customer_info: CustomerInfo {
                name: "An".into(),
                email: "an@example.com".into(),
                phone: "0900000000".into(),
                address: "1 Lê Lợi".into(),
            },
            payment_method: PaymentMethod::VnPay,
            payment_status: PaymentStatus::Completed,
            order_status: OrderStatus::Processing,
            transaction_id: None,
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn day_buckets_merge_same_day_orders() {
        let d = Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 6, 15, 17, 30, 0).unwrap();
        let next_day = Utc.with_ymd_and_hms(2024, 6, 16, 8, 0, 0).unwrap();
        let orders = [order_on(d, 100), order_on(later, 50), order_on(next_day, 25)];
        let timeline = bucket_timeline(&orders, TimeRange::Week);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].label, "15 Jun");
        assert_eq!(timeline[0].amount, Vnd::from(150));
        assert_eq!(timeline[1].amount, Vnd::from(25));
    }

    #[test]
    fn year_range_uses_month_buckets() {
        let jan = Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap();
        let jan_later = Utc.with_ymd_and_hms(2024, 1, 28, 9, 0, 0).unwrap();
        let mar = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let timeline = bucket_timeline(&[order_on(jan, 10), order_on(jan_later, 20), order_on(mar, 5)], TimeRange::Year);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].label, "Jan 2024");
        assert_eq!(timeline[0].amount, Vnd::from(30));
        assert_eq!(timeline[1].label, "Mar 2024");
    }

    #[test]
    fn same_label_in_different_years_stays_distinct_and_chronological() {
        let last_year = Utc.with_ymd_and_hms(2023, 1, 15, 12, 0, 0).unwrap();
        let this_year = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        // Both orders would display as "15 Jan"; the buckets must not merge, and must sort by time.
        let timeline = bucket_timeline(&[order_on(this_year, 40), order_on(last_year, 10)], TimeRange::Month);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].amount, Vnd::from(10));
        assert_eq!(timeline[1].amount, Vnd::from(40));
        assert!(timeline[0].timestamp < timeline[1].timestamp);
        assert_eq!(timeline[0].label, timeline[1].label);
    }
}
