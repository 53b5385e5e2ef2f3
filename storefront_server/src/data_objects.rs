use std::fmt::Display;

use serde::{Deserialize, Serialize};
use spg_common::Vnd;
use storefront_engine::db_types::{CustomerInfo, OrderReference, OrderStatus, PaymentStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// The body of a gateway-checkout request. `amount` is the total the customer saw on the checkout page; the
/// engine re-derives the true total from the cart and rejects the checkout if the two disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub amount: Option<Vnd>,
    pub customer_info: CustomerInfo,
    pub order_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodCheckoutRequest {
    pub customer_info: CustomerInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentUrlResponse {
    pub payment_url: String,
}

/// The abridged order record returned from checkout endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreatedResponse {
    pub id: i64,
    pub reference: OrderReference,
    pub total: Vnd,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCartItemRequest {
    pub product_id: i64,
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueQuery {
    pub range: Option<String>,
}
