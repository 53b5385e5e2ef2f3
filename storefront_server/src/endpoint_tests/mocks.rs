use mockall::mock;
use storefront_engine::{
    db_types::{Cart, NewOrder, Order, OrderReference, OrderStatus, PaymentStatus},
    CartManagement,
    StorefrontApiError,
    StorefrontDatabase,
};

mock! {
    pub Backend {}

    impl CartManagement for Backend {
        async fn fetch_or_create_cart(&self, user_id: &str) -> Result<Cart, StorefrontApiError>;
        async fn add_cart_item(&self, user_id: &str, product_id: i64, quantity: i64) -> Result<Cart, StorefrontApiError>;
        async fn update_cart_quantity(&self, user_id: &str, product_id: i64, quantity: i64) -> Result<Cart, StorefrontApiError>;
        async fn remove_cart_item(&self, user_id: &str, product_id: i64) -> Result<Cart, StorefrontApiError>;
        async fn clear_cart(&self, user_id: &str) -> Result<Cart, StorefrontApiError>;
    }

    impl StorefrontDatabase for Backend {
        async fn insert_order(&self, order: NewOrder) -> Result<Order, StorefrontApiError>;
        async fn fetch_order_by_reference(&self, reference: &OrderReference) -> Result<Option<Order>, StorefrontApiError>;
        async fn fetch_order_by_id(&self, order_id: i64) -> Result<Option<Order>, StorefrontApiError>;
        async fn fetch_orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, StorefrontApiError>;
        async fn fetch_all_orders(&self) -> Result<Vec<Order>, StorefrontApiError>;
        async fn update_payment_status<'a>(&self, reference: &OrderReference, status: PaymentStatus, transaction_id: Option<&'a str>) -> Result<Order, StorefrontApiError>;
        async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<Order, StorefrontApiError>;
    }
}
