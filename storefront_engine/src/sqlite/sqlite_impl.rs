//! `SqliteDatabase` is the concrete SQLite implementation of the storefront backend traits.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use spg_common::Vnd;
use sqlx::SqlitePool;

use super::db::{carts, categories, new_pool, orders, products, statistics};
use crate::{
    api::objects::UpdateProduct,
    db_types::{
        Cart,
        Category,
        NewCategory,
        NewOrder,
        NewProduct,
        Order,
        OrderReference,
        OrderStatus,
        PaymentStatus,
        Product,
    },
    helpers::{new_order_reference, order_status_after_payment, MAX_REFERENCE_ATTEMPTS},
    traits::{CartManagement, CatalogManagement, StatisticsQueries, StorefrontApiError, StorefrontDatabase},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, StorefrontApiError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), StorefrontApiError> {
        sqlx::migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorefrontApiError::DatabaseError(e.to_string()))?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }
}

impl StorefrontDatabase for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, StorefrontApiError> {
        for attempt in 1..=MAX_REFERENCE_ATTEMPTS {
            let reference = new_order_reference();
            let mut tx = self.pool.begin().await?;
            match orders::insert_order(&order, &reference, &mut tx).await {
                Ok(stored) => {
                    tx.commit().await?;
                    debug!("🗃️ Order {} saved with id {}", stored.reference, stored.id);
                    return Ok(stored);
                },
                Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                    // Dropping the transaction rolls back the partial insert.
                    warn!("🗃️ Order reference {reference} collided on attempt {attempt}. Regenerating.");
                },
                Err(e) => return Err(e.into()),
            }
        }
        Err(StorefrontApiError::ReferenceCollision(MAX_REFERENCE_ATTEMPTS))
    }

    async fn fetch_order_by_reference(
        &self,
        reference: &OrderReference,
    ) -> Result<Option<Order>, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_by_reference(reference, &mut conn).await?)
    }

    async fn fetch_order_by_id(&self, order_id: i64) -> Result<Option<Order>, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_by_id(order_id, &mut conn).await?)
    }

    async fn fetch_orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_orders_for_user(user_id, &mut conn).await?)
    }

    async fn fetch_all_orders(&self) -> Result<Vec<Order>, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_all_orders(&mut conn).await?)
    }

    async fn update_payment_status(
        &self,
        reference: &OrderReference,
        status: PaymentStatus,
        transaction_id: Option<&str>,
    ) -> Result<Order, StorefrontApiError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::fetch_order_by_reference(reference, &mut tx)
            .await?
            .ok_or_else(|| StorefrontApiError::OrderNotFound(reference.clone()))?;
        let next_order_status = order_status_after_payment(status, order.order_status);
        let updated = orders::update_status_columns(reference, status, next_order_status, transaction_id, &mut tx)
            .await?
            .ok_or_else(|| StorefrontApiError::OrderNotFound(reference.clone()))?;
        tx.commit().await?;
        debug!(
            "🗃️ Order {reference} payment status set to {status}; fulfilment is {}",
            updated.order_status
        );
        Ok(updated)
    }

    async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<Order, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_order_status(order_id, status, &mut conn)
            .await?
            .ok_or(StorefrontApiError::OrderIdNotFound(order_id))
    }
}

impl CartManagement for SqliteDatabase {
    async fn fetch_or_create_cart(&self, user_id: &str) -> Result<Cart, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(carts::fetch_or_create_cart(user_id, &mut conn).await?)
    }

    async fn add_cart_item(&self, user_id: &str, product_id: i64, quantity: i64) -> Result<Cart, StorefrontApiError> {
        let mut tx = self.pool.begin().await?;
        let product = products::fetch_product(product_id, &mut tx)
            .await?
            .ok_or(StorefrontApiError::ProductNotFound(product_id))?;
        let cart = carts::fetch_or_create_cart(user_id, &mut tx).await?;
        carts::upsert_item(cart.id, &product, quantity, &mut tx).await?;
        let cart = carts::fetch_or_create_cart(user_id, &mut tx).await?;
        tx.commit().await?;
        Ok(cart)
    }

    async fn update_cart_quantity(
        &self,
        user_id: &str,
        product_id: i64,
        quantity: i64,
    ) -> Result<Cart, StorefrontApiError> {
        let mut tx = self.pool.begin().await?;
        let cart = carts::fetch_or_create_cart(user_id, &mut tx).await?;
        let affected = carts::set_quantity(cart.id, product_id, quantity, &mut tx).await?;
        if affected == 0 {
            return Err(StorefrontApiError::ItemNotFound(product_id));
        }
        let cart = carts::fetch_or_create_cart(user_id, &mut tx).await?;
        tx.commit().await?;
        Ok(cart)
    }

    async fn remove_cart_item(&self, user_id: &str, product_id: i64) -> Result<Cart, StorefrontApiError> {
        let mut tx = self.pool.begin().await?;
        let cart = carts::fetch_or_create_cart(user_id, &mut tx).await?;
        carts::delete_item(cart.id, product_id, &mut tx).await?;
        let cart = carts::fetch_or_create_cart(user_id, &mut tx).await?;
        tx.commit().await?;
        Ok(cart)
    }

    async fn clear_cart(&self, user_id: &str) -> Result<Cart, StorefrontApiError> {
        let mut tx = self.pool.begin().await?;
        let cart = carts::fetch_or_create_cart(user_id, &mut tx).await?;
        carts::clear_items(cart.id, &mut tx).await?;
        let cart = carts::fetch_or_create_cart(user_id, &mut tx).await?;
        tx.commit().await?;
        Ok(cart)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_products(&self) -> Result<Vec<Product>, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(products::fetch_products(&mut conn).await?)
    }

    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(products::fetch_product(product_id, &mut conn).await?)
    }

    async fn fetch_products_in_category(&self, category_id: i64) -> Result<Vec<Product>, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(products::fetch_products_in_category(category_id, &mut conn).await?)
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(products::insert_product(&product, &mut conn).await?)
    }

    async fn update_product(&self, product_id: i64, update: UpdateProduct) -> Result<Product, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        products::update_product(product_id, update, &mut conn)
            .await?
            .ok_or(StorefrontApiError::ProductNotFound(product_id))
    }

    async fn delete_product(&self, product_id: i64) -> Result<(), StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        let deleted = products::delete_product(product_id, &mut conn).await?;
        if deleted == 0 {
            return Err(StorefrontApiError::ProductNotFound(product_id));
        }
        Ok(())
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(categories::fetch_categories(&mut conn).await?)
    }

    async fn insert_category(&self, category: NewCategory) -> Result<Category, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(categories::insert_category(&category, &mut conn).await?)
    }
}

impl StatisticsQueries for SqliteDatabase {
    async fn fetch_completed_orders_since(&self, since: DateTime<Utc>) -> Result<Vec<Order>, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(statistics::fetch_completed_orders_since(since, &mut conn).await?)
    }

    async fn total_completed_revenue(&self) -> Result<Vnd, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(statistics::total_completed_revenue(&mut conn).await?)
    }

    async fn count_orders(&self) -> Result<i64, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(statistics::count_orders(&mut conn).await?)
    }

    async fn count_orders_with_status(&self, status: OrderStatus) -> Result<i64, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(statistics::count_orders_with_status(status, &mut conn).await?)
    }

    async fn fetch_recent_orders(&self, limit: i64) -> Result<Vec<Order>, StorefrontApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(statistics::fetch_recent_orders(limit, &mut conn).await?)
    }
}
