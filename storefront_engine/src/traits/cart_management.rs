use crate::{db_types::Cart, traits::StorefrontApiError};

/// Per-user cart maintenance. Carts are created lazily, mutated in place and emptied (never deleted) after a
/// successful checkout.
#[allow(async_fn_in_trait)]
pub trait CartManagement {
    /// Return the user's cart, creating an empty one if this is the user's first visit. Never fails with a
    /// not-found condition.
    async fn fetch_or_create_cart(&self, user_id: &str) -> Result<Cart, StorefrontApiError>;

    /// Add `quantity` of a product to the cart. If the product is already in the cart its quantity is bumped;
    /// otherwise a new line is appended with the product's current name, price and image frozen in. Later price
    /// edits on the product do not touch existing cart lines.
    ///
    /// Fails with `ProductNotFound` if the product does not exist.
    async fn add_cart_item(&self, user_id: &str, product_id: i64, quantity: i64) -> Result<Cart, StorefrontApiError>;

    /// Set the quantity on an existing cart line. A quantity of zero or less is defined as removal.
    ///
    /// Fails with `ItemNotFound` if the product is not in the cart.
    async fn update_cart_quantity(
        &self,
        user_id: &str,
        product_id: i64,
        quantity: i64,
    ) -> Result<Cart, StorefrontApiError>;

    /// Remove a line from the cart. Removing a line that is not there is a no-op success.
    async fn remove_cart_item(&self, user_id: &str, product_id: i64) -> Result<Cart, StorefrontApiError>;

    /// Empty the cart. Clearing an already-empty cart is a no-op success.
    async fn clear_cart(&self, user_id: &str) -> Result<Cart, StorefrontApiError>;
}
