use log::trace;
use sqlx::{sqlite::SqliteRow, FromRow, QueryBuilder, SqliteConnection};

use crate::{
    api::objects::UpdateProduct,
    db_types::{NewProduct, Product},
};

pub async fn fetch_products(conn: &mut SqliteConnection) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products ORDER BY created_at DESC").fetch_all(conn).await
}

pub async fn fetch_product(product_id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(product_id).fetch_optional(conn).await
}

pub async fn fetch_products_in_category(
    category_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE category_id = $1 ORDER BY created_at DESC")
        .bind(category_id)
        .fetch_all(conn)
        .await
}

pub async fn insert_product(product: &NewProduct, conn: &mut SqliteConnection) -> Result<Product, sqlx::Error> {
    sqlx::query_as(
        r#"
            INSERT INTO products (name, price, description, image, category_id, count_in_stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(&product.name)
    .bind(product.price)
    .bind(&product.description)
    .bind(&product.image)
    .bind(product.category_id)
    .bind(product.count_in_stock)
    .fetch_one(conn)
    .await
}

/// Applies the populated fields of `update` to the product row. Callers guarantee the update is non-empty.
pub async fn update_product(
    product_id: i64,
    update: UpdateProduct,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, sqlx::Error> {
    let mut builder = QueryBuilder::new("UPDATE products SET updated_at = CURRENT_TIMESTAMP, ");
    let mut set_clause = builder.separated(", ");
    if let Some(name) = update.name {
        set_clause.push("name = ");
        set_clause.push_bind_unseparated(name);
    }
    if let Some(price) = update.price {
        set_clause.push("price = ");
        set_clause.push_bind_unseparated(price);
    }
    if let Some(description) = update.description {
        set_clause.push("description = ");
        set_clause.push_bind_unseparated(description);
    }
    if let Some(image) = update.image {
        set_clause.push("image = ");
        set_clause.push_bind_unseparated(image);
    }
    if let Some(category_id) = update.category_id {
        set_clause.push("category_id = ");
        set_clause.push_bind_unseparated(category_id);
    }
    if let Some(count_in_stock) = update.count_in_stock {
        set_clause.push("count_in_stock = ");
        set_clause.push_bind_unseparated(count_in_stock);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(product_id);
    builder.push(" RETURNING *");
    trace!("🗂️ Executing query: {}", builder.sql());
    builder.build().fetch_optional(conn).await?.map(|row: SqliteRow| Product::from_row(&row)).transpose()
}

/// Returns the number of rows deleted (zero or one).
pub async fn delete_product(product_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1").bind(product_id).execute(conn).await?;
    Ok(result.rows_affected())
}
