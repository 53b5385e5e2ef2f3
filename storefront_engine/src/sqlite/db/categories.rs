use sqlx::SqliteConnection;

use crate::db_types::{Category, NewCategory};

pub async fn fetch_categories(conn: &mut SqliteConnection) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM categories ORDER BY name").fetch_all(conn).await
}

pub async fn insert_category(category: &NewCategory, conn: &mut SqliteConnection) -> Result<Category, sqlx::Error> {
    sqlx::query_as("INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING *")
        .bind(&category.name)
        .bind(&category.description)
        .fetch_one(conn)
        .await
}
