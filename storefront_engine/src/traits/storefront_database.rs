use crate::{
    db_types::{NewOrder, Order, OrderReference, OrderStatus, PaymentStatus},
    traits::{CartManagement, StorefrontApiError},
};

/// The highest-level behaviour contract for storefront backends: the order ledger, plus the cart operations the
/// checkout and payment-reconciliation flows lean on.
///
/// Implementations must provide per-call atomicity — each method is a single atomic read-modify-write from the
/// caller's point of view — but nothing here requires cross-order transactions.
#[allow(async_fn_in_trait)]
pub trait StorefrontDatabase: CartManagement {
    /// Persist a brand-new order in `PENDING`/`PENDING` status and return the stored record.
    ///
    /// The public reference is generated in here, and regenerated (a bounded number of times) if it collides
    /// with an existing order, so callers never see a transient uniqueness failure. The caller's cart is not
    /// touched; clearing it is the flow layer's decision.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, StorefrontApiError>;

    async fn fetch_order_by_reference(
        &self,
        reference: &OrderReference,
    ) -> Result<Option<Order>, StorefrontApiError>;

    async fn fetch_order_by_id(&self, order_id: i64) -> Result<Option<Order>, StorefrontApiError>;

    /// All orders belonging to `user_id`, newest first.
    async fn fetch_orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, StorefrontApiError>;

    /// Every order in the ledger, newest first.
    async fn fetch_all_orders(&self) -> Result<Vec<Order>, StorefrontApiError>;

    /// Set the payment status of the order with the given reference, recording the gateway's transaction id if
    /// one is supplied (repeating the same id is harmless). A `Completed` payment advances a `Pending` order to
    /// `Processing` via [`crate::helpers::order_status_after_payment`]; no other fulfilment change happens here.
    ///
    /// Fails with `OrderNotFound` if no order carries the reference.
    async fn update_payment_status(
        &self,
        reference: &OrderReference,
        status: PaymentStatus,
        transaction_id: Option<&str>,
    ) -> Result<Order, StorefrontApiError>;

    /// Unconditionally overwrite the fulfilment status of an order. This is the admin override: backward moves
    /// (say, `DELIVERED` back to `PENDING`) are deliberately allowed.
    ///
    /// Fails with `OrderIdNotFound` if the order does not exist.
    async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<Order, StorefrontApiError>;
}
