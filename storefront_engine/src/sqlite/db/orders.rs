use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::{LineItem, NewOrder, Order, OrderReference, OrderStatus, PaymentStatus};

/// Inserts a new order and its line items using the given connection. This is not atomic on its own; callers
/// embed it in a transaction and pass `&mut tx` as the connection argument.
///
/// A violation of the reference uniqueness constraint comes back as the raw database error so the caller can
/// distinguish it and retry with a fresh reference.
pub async fn insert_order(
    order: &NewOrder,
    reference: &OrderReference,
    conn: &mut SqliteConnection,
) -> Result<Order, sqlx::Error> {
    let mut stored: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                reference,
                user_id,
                total,
                customer_name,
                customer_email,
                customer_phone,
                customer_address,
                payment_method,
                payment_status,
                order_status,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'PENDING', 'PENDING', $9)
            RETURNING *;
        "#,
    )
    .bind(reference)
    .bind(&order.user_id)
    .bind(order.total)
    .bind(&order.customer_info.name)
    .bind(&order.customer_info.email)
    .bind(&order.customer_info.phone)
    .bind(&order.customer_info.address)
    .bind(order.payment_method)
    .bind(order.created_at)
    .fetch_one(&mut *conn)
    .await?;
    for item in &order.items {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, name, price, quantity, image) VALUES ($1, $2, $3, $4, \
             $5, $6)",
        )
        .bind(stored.id)
        .bind(item.product_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.quantity)
        .bind(&item.image)
        .execute(&mut *conn)
        .await?;
    }
    stored.items = order.items.clone();
    Ok(stored)
}

pub async fn fetch_order_by_reference(
    reference: &OrderReference,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order: Option<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE reference = $1").bind(reference).fetch_optional(&mut *conn).await?;
    attach_items_opt(order, conn).await
}

pub async fn fetch_order_by_id(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order: Option<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id).fetch_optional(&mut *conn).await?;
    attach_items_opt(order, conn).await
}

/// All orders for a user, newest first.
pub async fn fetch_orders_for_user(user_id: &str, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders: Vec<Order> = sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC")
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;
    attach_items(orders, conn).await
}

/// Every order in the ledger, newest first.
pub async fn fetch_all_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC").fetch_all(&mut *conn).await?;
    attach_items(orders, conn).await
}

/// Mechanical write of the two status columns and (if supplied) the transaction id. The decision about which
/// fulfilment status goes with which payment status is the caller's; see
/// [`crate::helpers::order_status_after_payment`].
pub async fn update_status_columns(
    reference: &OrderReference,
    payment_status: PaymentStatus,
    order_status: OrderStatus,
    transaction_id: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders
            SET payment_status = $1,
                order_status = $2,
                transaction_id = COALESCE($3, transaction_id),
                updated_at = CURRENT_TIMESTAMP
            WHERE reference = $4
            RETURNING *;
        "#,
    )
    .bind(payment_status)
    .bind(order_status)
    .bind(transaction_id)
    .bind(reference)
    .fetch_optional(&mut *conn)
    .await?;
    attach_items_opt(order, conn).await
}

pub async fn update_order_status(
    order_id: i64,
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order: Option<Order> = sqlx::query_as(
        "UPDATE orders SET order_status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await?;
    attach_items_opt(order, conn).await
}

pub async fn load_items(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<LineItem>, sqlx::Error> {
    sqlx::query_as("SELECT product_id, name, price, quantity, image FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await
}

async fn attach_items(mut orders: Vec<Order>, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    for order in &mut orders {
        order.items = load_items(order.id, conn).await?;
    }
    trace!("📝️ Loaded line items for {} orders", orders.len());
    Ok(orders)
}

async fn attach_items_opt(order: Option<Order>, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    match order {
        Some(mut order) => {
            order.items = load_items(order.id, conn).await?;
            Ok(Some(order))
        },
        None => Ok(None),
    }
}
