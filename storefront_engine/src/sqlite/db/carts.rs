use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{Cart, LineItem, Product};

/// Returns the user's cart, creating an empty one on first access.
pub async fn fetch_or_create_cart(user_id: &str, conn: &mut SqliteConnection) -> Result<Cart, sqlx::Error> {
    let existing: Option<Cart> =
        sqlx::query_as("SELECT * FROM carts WHERE user_id = $1").bind(user_id).fetch_optional(&mut *conn).await?;
    let mut cart = match existing {
        Some(cart) => cart,
        None => {
            let cart = sqlx::query_as("INSERT INTO carts (user_id) VALUES ($1) RETURNING *")
                .bind(user_id)
                .fetch_one(&mut *conn)
                .await?;
            debug!("🛒️ Created a new cart for user {user_id}");
            cart
        },
    };
    cart.items = load_items(cart.id, conn).await?;
    Ok(cart)
}

pub async fn load_items(cart_id: i64, conn: &mut SqliteConnection) -> Result<Vec<LineItem>, sqlx::Error> {
    sqlx::query_as("SELECT product_id, name, price, quantity, image FROM cart_items WHERE cart_id = $1 ORDER BY id")
        .bind(cart_id)
        .fetch_all(&mut *conn)
        .await
}

/// Add a quantity of a product to a cart line, appending a new line with the product's current name, price and
/// image if the product is not in the cart yet. Existing lines keep their original snapshot and only the
/// quantity moves.
pub async fn upsert_item(
    cart_id: i64,
    product: &Product,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO cart_items (cart_id, product_id, name, price, quantity, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + excluded.quantity
        "#,
    )
    .bind(cart_id)
    .bind(product.id)
    .bind(&product.name)
    .bind(product.price)
    .bind(quantity)
    .bind(&product.image)
    .execute(&mut *conn)
    .await?;
    touch(cart_id, conn).await
}

/// Overwrite a line's quantity. Returns the number of rows affected; zero means the product was not in the cart.
pub async fn set_quantity(
    cart_id: i64,
    product_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    let affected = sqlx::query("UPDATE cart_items SET quantity = $1 WHERE cart_id = $2 AND product_id = $3")
        .bind(quantity)
        .bind(cart_id)
        .bind(product_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    touch(cart_id, conn).await?;
    Ok(affected)
}

pub async fn delete_item(cart_id: i64, product_id: i64, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
        .bind(cart_id)
        .bind(product_id)
        .execute(&mut *conn)
        .await?;
    touch(cart_id, conn).await
}

pub async fn clear_items(cart_id: i64, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1").bind(cart_id).execute(&mut *conn).await?;
    touch(cart_id, conn).await
}

async fn touch(cart_id: i64, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE carts SET updated_at = CURRENT_TIMESTAMP WHERE id = $1")
        .bind(cart_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
