use chrono::{DateTime, Utc};
use spg_common::Vnd;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Order, OrderStatus},
    sqlite::db::orders,
};

/// Completed-payment orders created at or after `since`, oldest first (the aggregator walks them forward when
/// building timelines).
pub async fn fetch_completed_orders_since(
    since: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    let result: Vec<Order> = sqlx::query_as(
        "SELECT * FROM orders WHERE payment_status = 'COMPLETED' AND created_at >= $1 ORDER BY created_at ASC",
    )
    .bind(since)
    .fetch_all(&mut *conn)
    .await?;
    let mut orders_with_items = Vec::with_capacity(result.len());
    for mut order in result {
        order.items = orders::load_items(order.id, conn).await?;
        orders_with_items.push(order);
    }
    Ok(orders_with_items)
}

pub async fn total_completed_revenue(conn: &mut SqliteConnection) -> Result<Vnd, sqlx::Error> {
    let total: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(total), 0) FROM orders WHERE payment_status = 'COMPLETED'")
            .fetch_one(conn)
            .await?;
    Ok(Vnd::from(total))
}

pub async fn count_orders(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders").fetch_one(conn).await
}

pub async fn count_orders_with_status(
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE order_status = $1").bind(status).fetch_one(conn).await
}

pub async fn fetch_recent_orders(limit: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let result: Vec<Order> = sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC LIMIT $1")
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;
    let mut orders_with_items = Vec::with_capacity(result.len());
    for mut order in result {
        order.items = orders::load_items(order.id, conn).await?;
        orders_with_items.push(order);
    }
    Ok(orders_with_items)
}
