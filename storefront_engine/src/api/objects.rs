use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use spg_common::Vnd;

use crate::db_types::{ConversionError, Order, PaymentMethod};

//--------------------------------------      TimeRange       ---------------------------------------------------------
/// The reporting windows the revenue endpoint understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Year,
}

impl TimeRange {
    /// The inclusive lower bound of the window ending at `now`. Day and week are fixed-length windows; month and
    /// year step back by calendar units, so "month" from March 31st starts at the end of February.
    pub fn start_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeRange::Day => now - Duration::hours(24),
            TimeRange::Week => now - Duration::days(7),
            TimeRange::Month => now.checked_sub_months(Months::new(1)).unwrap_or_else(|| now - Duration::days(31)),
            TimeRange::Year => now.checked_sub_months(Months::new(12)).unwrap_or_else(|| now - Duration::days(365)),
        }
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeRange::Day => write!(f, "day"),
            TimeRange::Week => write!(f, "week"),
            TimeRange::Month => write!(f, "month"),
            TimeRange::Year => write!(f, "year"),
        }
    }
}

impl FromStr for TimeRange {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            s => Err(ConversionError::new("time range", s)),
        }
    }
}

//--------------------------------------    Revenue report    ---------------------------------------------------------
/// Revenue attributed to one payment method. Reports always carry one entry per known method, zero-filled, so a
/// method with no sales in the window is still visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodTotal {
    pub method: PaymentMethod,
    pub total: Vnd,
}

/// One point on the revenue timeline. `timestamp` (the bucket's start) is the sort key and the thing clients
/// should order by; `label` is display-only and is not unique across year boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineBucket {
    pub label: String,
    pub amount: Vnd,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueReport {
    pub total_revenue: Vnd,
    pub payment_methods: Vec<MethodTotal>,
    pub timeline: Vec<TimelineBucket>,
    pub order_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_revenue: Vnd,
    pub order_count: i64,
    pub pending_order_count: i64,
    pub recent_orders: Vec<Order>,
}

//--------------------------------------    UpdateProduct     ---------------------------------------------------------
/// A partial product update; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub price: Option<Vnd>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category_id: Option<i64>,
    pub count_in_stock: Option<i64>,
}

impl UpdateProduct {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.category_id.is_none()
            && self.count_in_stock.is_none()
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn fixed_windows() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(TimeRange::Day.start_from(now), Utc.with_ymd_and_hms(2024, 6, 14, 12, 0, 0).unwrap());
        assert_eq!(TimeRange::Week.start_from(now), Utc.with_ymd_and_hms(2024, 6, 8, 12, 0, 0).unwrap());
    }

    #[test]
    fn calendar_windows() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        // One calendar month back from March 31st lands on the end of February (leap year).
        assert_eq!(TimeRange::Month.start_from(now), Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap());
        assert_eq!(TimeRange::Year.start_from(now), Utc.with_ymd_and_hms(2023, 3, 31, 12, 0, 0).unwrap());
    }

    #[test]
    fn parsing() {
        assert_eq!("week".parse::<TimeRange>().unwrap(), TimeRange::Week);
        assert!("fortnight".parse::<TimeRange>().is_err());
    }
}
