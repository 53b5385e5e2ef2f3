use std::fmt::Debug;

use log::*;

use crate::{
    db_types::Cart,
    traits::{CartManagement, StorefrontApiError},
};

/// Thin API over the per-user cart operations.
pub struct CartApi<B> {
    db: B,
}

impl<B> Debug for CartApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartApi")
    }
}

impl<B> CartApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CartApi<B>
where B: CartManagement
{
    pub async fn cart(&self, user_id: &str) -> Result<Cart, StorefrontApiError> {
        self.db.fetch_or_create_cart(user_id).await
    }

    /// Add a product to the cart. A missing quantity means one.
    pub async fn add_item(
        &self,
        user_id: &str,
        product_id: i64,
        quantity: Option<i64>,
    ) -> Result<Cart, StorefrontApiError> {
        let quantity = quantity.unwrap_or(1);
        if quantity < 1 {
            return Err(StorefrontApiError::ValidationError(format!(
                "Cannot add {quantity} of a product to the cart"
            )));
        }
        let cart = self.db.add_cart_item(user_id, product_id, quantity).await?;
        trace!("🛒️ Added {quantity} × product {product_id} to the cart of user {user_id}");
        Ok(cart)
    }

    /// Set a line's quantity. Zero or negative means "remove the line", by definition.
    pub async fn set_quantity(
        &self,
        user_id: &str,
        product_id: i64,
        quantity: i64,
    ) -> Result<Cart, StorefrontApiError> {
        if quantity <= 0 {
            return self.remove_item(user_id, product_id).await;
        }
        self.db.update_cart_quantity(user_id, product_id, quantity).await
    }

    pub async fn remove_item(&self, user_id: &str, product_id: i64) -> Result<Cart, StorefrontApiError> {
        self.db.remove_cart_item(user_id, product_id).await
    }

    pub async fn clear(&self, user_id: &str) -> Result<Cart, StorefrontApiError> {
        self.db.clear_cart(user_id).await
    }
}
