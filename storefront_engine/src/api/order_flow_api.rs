use std::fmt::Debug;

use log::*;
use spg_common::Vnd;

use crate::{
    db_types::{CustomerInfo, NewOrder, Order, OrderReference, OrderStatus, PaymentMethod, PaymentStatus},
    traits::{StorefrontApiError, StorefrontDatabase},
};

/// `OrderFlowApi` is the primary API for the checkout and payment-reconciliation flows: freezing a cart into an
/// order, reacting to gateway callbacks, and the order-ledger queries and admin status updates.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderFlowApi<B>
where B: StorefrontDatabase
{
    /// Freeze the user's cart into a new order.
    ///
    /// The line items are copied out of the cart by value and the total is computed from them; if the caller
    /// supplies its own `claimed_total` (the gateway flow does, since the amount was already shown to the
    /// customer) it must match the computed sum exactly or the whole checkout is rejected.
    ///
    /// Cash orders clear the cart as soon as the order is durably created. Gateway orders leave the cart intact
    /// until the payment callback confirms — if the customer abandons the payment their cart is still there.
    /// Either way, a failure to create the order leaves the cart untouched.
    pub async fn checkout(
        &self,
        user_id: &str,
        customer_info: CustomerInfo,
        payment_method: PaymentMethod,
        claimed_total: Option<Vnd>,
    ) -> Result<Order, StorefrontApiError> {
        if let Some(field) = customer_info.first_blank_field() {
            return Err(StorefrontApiError::ValidationError(format!("Customer {field} must not be blank")));
        }
        let cart = self.db.fetch_or_create_cart(user_id).await?;
        if cart.is_empty() {
            return Err(StorefrontApiError::ValidationError("Cart is empty".to_string()));
        }
        let total = cart.subtotal();
        if !total.is_positive() {
            return Err(StorefrontApiError::ValidationError(format!("Order total must be positive, not {total}")));
        }
        if let Some(claimed) = claimed_total {
            if claimed != total {
                return Err(StorefrontApiError::ValidationError(format!(
                    "Claimed total {claimed} does not match the cart total {total}"
                )));
            }
        }
        let order =
            NewOrder::new(user_id.to_string(), cart.items.clone(), total, customer_info, payment_method);
        let order = self.db.insert_order(order).await?;
        debug!("🛒️ Order {} created for user {user_id} ({} items, {total})", order.reference, order.items.len());
        if payment_method == PaymentMethod::Cod {
            self.db.clear_cart(user_id).await?;
            debug!("🛒️ Cart for user {user_id} cleared after cash-on-delivery checkout");
        }
        Ok(order)
    }

    /// An authentic "payment approved" callback arrived for this order.
    ///
    /// The payment is marked `COMPLETED` (advancing a `PENDING` order to `PROCESSING`), the gateway's
    /// transaction id is recorded, and the customer's cart is cleared. Reconciliation is "set to completed", not
    /// "increment", and clearing an empty cart is a no-op, so a replayed callback changes nothing.
    pub async fn confirm_gateway_payment(
        &self,
        reference: &OrderReference,
        transaction_id: Option<&str>,
    ) -> Result<Order, StorefrontApiError> {
        let order = self.db.update_payment_status(reference, PaymentStatus::Completed, transaction_id).await?;
        self.db.clear_cart(&order.user_id).await?;
        info!("💰️ Payment for order {reference} confirmed. Order is now {}", order.order_status);
        Ok(order)
    }

    /// An authentic callback arrived with a non-success response code. The payment is marked `FAILED`; the
    /// fulfilment status and the customer's cart are left exactly as they were.
    pub async fn fail_gateway_payment(
        &self,
        reference: &OrderReference,
        transaction_id: Option<&str>,
    ) -> Result<Order, StorefrontApiError> {
        let order = self.db.update_payment_status(reference, PaymentStatus::Failed, transaction_id).await?;
        info!("💰️ Payment for order {reference} failed at the gateway");
        Ok(order)
    }

    /// Admin override of the payment status, used from the back office rather than the gateway flow. Completion
    /// through this path triggers the same single implicit fulfilment transition as the gateway path, and
    /// nothing else.
    pub async fn set_payment_status(
        &self,
        reference: &OrderReference,
        status: PaymentStatus,
        transaction_id: Option<&str>,
    ) -> Result<Order, StorefrontApiError> {
        self.db.update_payment_status(reference, status, transaction_id).await
    }

    /// Admin override of the fulfilment status. Unconditional by design; see
    /// [`StorefrontDatabase::update_order_status`].
    pub async fn set_order_status(&self, order_id: i64, status: OrderStatus) -> Result<Order, StorefrontApiError> {
        self.db.update_order_status(order_id, status).await
    }

    pub async fn order_by_reference(&self, reference: &OrderReference) -> Result<Order, StorefrontApiError> {
        self.db
            .fetch_order_by_reference(reference)
            .await?
            .ok_or_else(|| StorefrontApiError::OrderNotFound(reference.clone()))
    }

    pub async fn order_by_id(&self, order_id: i64) -> Result<Order, StorefrontApiError> {
        self.db.fetch_order_by_id(order_id).await?.ok_or(StorefrontApiError::OrderIdNotFound(order_id))
    }

    pub async fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, StorefrontApiError> {
        self.db.fetch_orders_for_user(user_id).await
    }

    pub async fn all_orders(&self) -> Result<Vec<Order>, StorefrontApiError> {
        self.db.fetch_all_orders().await
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
