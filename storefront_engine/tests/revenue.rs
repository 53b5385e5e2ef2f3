//! Revenue aggregation over the order ledger, with pinned clocks and backdated orders.
mod support;

use chrono::{DateTime, Duration, Utc};
use spg_common::Vnd;
use storefront_engine::{
    db_types::{CustomerInfo, NewCategory, NewProduct, OrderReference, PaymentMethod, PaymentStatus},
    CartApi,
    CatalogManagement,
    OrderFlowApi,
    SqliteDatabase,
    StatisticsApi,
    TimeRange,
};
use support::prepare_env::{prepare_test_env, random_db_path};
use tokio::runtime::Runtime;

fn customer() -> CustomerInfo {
    CustomerInfo {
        name: "Trần Thị Bình".to_string(),
        email: "binh@example.com".to_string(),
        phone: "0907654321".to_string(),
        address: "2 Hai Bà Trưng".to_string(),
    }
}

/// Create a completed order for `total` đồng, backdated to `created_at`.
async fn completed_order_at(
    db: &SqliteDatabase,
    product_id: i64,
    quantity: i64,
    method: PaymentMethod,
    created_at: DateTime<Utc>,
) -> OrderReference {
    let user_id = format!("shopper-{}", rand::random::<u32>());
    let carts = CartApi::new(db.clone());
    carts.add_item(&user_id, product_id, Some(quantity)).await.expect("Error adding to cart");
    let api = OrderFlowApi::new(db.clone());
    let order = api.checkout(&user_id, customer(), method, None).await.expect("Checkout failed");
    api.set_payment_status(&order.reference, PaymentStatus::Completed, None).await.expect("Completion failed");
    sqlx::query("UPDATE orders SET created_at = $1 WHERE reference = $2")
        .bind(created_at)
        .bind(order.reference.as_str())
        .execute(db.pool())
        .await
        .expect("Backdating failed");
    order.reference
}

async fn seed_product(db: &SqliteDatabase, price: i64) -> i64 {
    let category = db
        .insert_category(NewCategory { name: format!("Category {}", rand::random::<u32>()), description: String::new() })
        .await
        .expect("Error inserting category");
    db.insert_product(NewProduct {
        name: "Teacup".to_string(),
        price: Vnd::from(price),
        description: "A teacup".to_string(),
        image: "teacup.jpg".to_string(),
        category_id: category.id,
        count_in_stock: 100,
    })
    .await
    .expect("Error inserting product")
    .id
}

#[test]
fn weekly_revenue_includes_only_the_last_seven_days() {
    let sys = Runtime::new().unwrap();
    sys.block_on(async move {
        let db = prepare_test_env(&random_db_path()).await;
        let product = seed_product(&db, 10_000).await;
        let now = Utc::now();

        completed_order_at(&db, product, 1, PaymentMethod::VnPay, now - Duration::hours(1)).await;
        completed_order_at(&db, product, 2, PaymentMethod::Cod, now - Duration::days(3)).await;
        completed_order_at(&db, product, 5, PaymentMethod::VnPay, now - Duration::days(10)).await;

        let stats = StatisticsApi::new(db.clone());
        let report = stats.revenue_for_at(TimeRange::Week, now).await.expect("Report failed");

        // Today's 10,000 and the 20,000 from three days ago; the 50,000 from ten days ago is outside the window.
        assert_eq!(report.order_count, 2);
        assert_eq!(report.total_revenue, Vnd::from(30_000));

        let vnpay = report.payment_methods.iter().find(|m| m.method == PaymentMethod::VnPay).unwrap();
        let cod = report.payment_methods.iter().find(|m| m.method == PaymentMethod::Cod).unwrap();
        assert_eq!(vnpay.total, Vnd::from(10_000));
        assert_eq!(cod.total, Vnd::from(20_000));

        // Two distinct days, oldest bucket first.
        assert_eq!(report.timeline.len(), 2);
        assert!(report.timeline[0].timestamp < report.timeline[1].timestamp);
        assert_eq!(report.timeline[0].amount, Vnd::from(20_000));
        assert_eq!(report.timeline[1].amount, Vnd::from(10_000));
    });
}

#[test]
fn pending_and_failed_payments_earn_nothing() {
    let sys = Runtime::new().unwrap();
    sys.block_on(async move {
        let db = prepare_test_env(&random_db_path()).await;
        let product = seed_product(&db, 5_000).await;
        let api = OrderFlowApi::new(db.clone());
        let carts = CartApi::new(db.clone());

        carts.add_item("ivan", product, Some(1)).await.unwrap();
        api.checkout("ivan", customer(), PaymentMethod::Cod, None).await.expect("Checkout failed");

        carts.add_item("judy", product, Some(1)).await.unwrap();
        let declined = api.checkout("judy", customer(), PaymentMethod::VnPay, None).await.expect("Checkout failed");
        api.fail_gateway_payment(&declined.reference, None).await.expect("Fail transition failed");

        let stats = StatisticsApi::new(db.clone());
        let report = stats.revenue_for(TimeRange::Day).await.expect("Report failed");
        assert_eq!(report.order_count, 0);
        assert_eq!(report.total_revenue, Vnd::from(0));
        // Every known payment method still shows up, zero-filled.
        assert_eq!(report.payment_methods.len(), 2);
        assert!(report.payment_methods.iter().all(|m| m.total == Vnd::from(0)));
    });
}

#[test]
fn known_methods_always_appear_in_the_method_breakdown() {
    let sys = Runtime::new().unwrap();
    sys.block_on(async move {
        let db = prepare_test_env(&random_db_path()).await;
        let product = seed_product(&db, 7_000).await;
        let now = Utc::now();
        completed_order_at(&db, product, 1, PaymentMethod::Cod, now - Duration::hours(2)).await;

        let stats = StatisticsApi::new(db.clone());
        let report = stats.revenue_for_at(TimeRange::Day, now).await.expect("Report failed");
        let vnpay = report.payment_methods.iter().find(|m| m.method == PaymentMethod::VnPay).unwrap();
        assert_eq!(vnpay.total, Vnd::from(0), "a method with no sales must still be present");
    });
}

#[test]
fn dashboard_summary_counts_and_recency() {
    let sys = Runtime::new().unwrap();
    sys.block_on(async move {
        let db = prepare_test_env(&random_db_path()).await;
        let product = seed_product(&db, 2_000).await;
        let now = Utc::now();

        for day in 1..=7 {
            completed_order_at(&db, product, 1, PaymentMethod::VnPay, now - Duration::days(day)).await;
        }
        // One order that never got paid.
        let carts = CartApi::new(db.clone());
        carts.add_item("kim", product, Some(1)).await.unwrap();
        let api = OrderFlowApi::new(db.clone());
        api.checkout("kim", customer(), PaymentMethod::Cod, None).await.expect("Checkout failed");

        let stats = StatisticsApi::new(db.clone());
        let summary = stats.dashboard_summary().await.expect("Summary failed");
        assert_eq!(summary.order_count, 8);
        assert_eq!(summary.pending_order_count, 1, "completed payments moved the other orders to PROCESSING");
        assert_eq!(summary.total_revenue, Vnd::from(14_000));
        assert_eq!(summary.recent_orders.len(), 5);
        let timestamps: Vec<_> = summary.recent_orders.iter().map(|o| o.created_at).collect();
        let mut sorted = timestamps.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(timestamps, sorted, "recent orders must be newest first");
    });
}
