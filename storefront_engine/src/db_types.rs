use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spg_common::Vnd;
use sqlx::{FromRow, Type};
use thiserror::Error;

/// The original store enforces a floor price on products; anything cheaper is a data-entry mistake.
pub const MIN_PRODUCT_PRICE: Vnd = Vnd::new(1000);

#[derive(Debug, Clone, Error)]
#[error("Invalid {0}: {1}")]
pub struct ConversionError(&'static str, String);

impl ConversionError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self(kind, value.to_string())
    }
}

//--------------------------------------    OrderReference    ---------------------------------------------------------
/// The short public identifier for an order: 12 uppercase hex characters from 6 random bytes. Distinct from the
/// internal row id, immutable, and globally unique (enforced by the database).
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderReference(pub String);

impl FromStr for OrderReference {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderReference {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------    PaymentStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    /// No confirmation from the gateway (or courier, for cash orders) yet.
    Pending,
    /// Payment received in full.
    Completed,
    /// The gateway declined or the customer abandoned the payment.
    Failed,
    /// A completed payment that was later returned to the customer.
    Refunded,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "PENDING"),
            PaymentStatus::Completed => write!(f, "COMPLETED"),
            PaymentStatus::Failed => write!(f, "FAILED"),
            PaymentStatus::Refunded => write!(f, "REFUNDED"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            "REFUNDED" => Ok(Self::Refunded),
            s => Err(ConversionError("payment status", s.to_string())),
        }
    }
}

//--------------------------------------     OrderStatus      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Newly created, nothing has happened to it yet.
    Pending,
    /// Payment confirmed; the order is being picked and packed.
    Processing,
    /// Handed to the courier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Cancelled by the customer or an admin.
    Cancelled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::Processing => write!(f, "PROCESSING"),
            OrderStatus::Shipped => write!(f, "SHIPPED"),
            OrderStatus::Delivered => write!(f, "DELIVERED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PROCESSING" => Ok(Self::Processing),
            "SHIPPED" => Ok(Self::Shipped),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            s => Err(ConversionError("order status", s.to_string())),
        }
    }
}

//--------------------------------------    PaymentMethod     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Paid up-front through the VNPay redirect flow.
    VnPay,
    /// Cash on delivery.
    Cod,
}

/// Every payment method the system knows about. Revenue reports bucket by this list so that methods with no
/// sales still appear with a zero total.
pub const ALL_PAYMENT_METHODS: [PaymentMethod; 2] = [PaymentMethod::VnPay, PaymentMethod::Cod];

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::VnPay => write!(f, "vnpay"),
            PaymentMethod::Cod => write!(f, "cod"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vnpay" => Ok(Self::VnPay),
            "cod" => Ok(Self::Cod),
            s => Err(ConversionError("payment method", s.to_string())),
        }
    }
}

//--------------------------------------    CustomerInfo      ---------------------------------------------------------
/// The contact details captured at checkout. All four fields are required and must be non-blank.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[sqlx(rename = "customer_name")]
    pub name: String,
    #[sqlx(rename = "customer_email")]
    pub email: String,
    #[sqlx(rename = "customer_phone")]
    pub phone: String,
    #[sqlx(rename = "customer_address")]
    pub address: String,
}

impl CustomerInfo {
    /// The name of the first blank required field, if any.
    pub fn first_blank_field(&self) -> Option<&'static str> {
        [
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("address", self.address.as_str()),
        ]
        .into_iter()
        .find(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
    }
}

//--------------------------------------       LineItem       ---------------------------------------------------------
/// One line of a cart or an order: the product's name, unit price and image are snapshots taken when the line was
/// created and do not track later edits to the product.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: i64,
    pub name: String,
    pub price: Vnd,
    pub quantity: i64,
    pub image: String,
}

impl LineItem {
    pub fn line_total(&self) -> Vnd {
        self.price * self.quantity
    }
}

//--------------------------------------        Order         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub reference: OrderReference,
    pub user_id: String,
    /// Loaded from the order_items table separately; see the sqlite orders module.
    #[sqlx(skip)]
    pub items: Vec<LineItem>,
    /// The snapshot total taken at creation. Immutable; never recomputed from items after the fact.
    pub total: Vnd,
    #[sqlx(flatten)]
    pub customer_info: CustomerInfo,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: String,
    /// The frozen cart lines this order was created from.
    pub items: Vec<LineItem>,
    pub total: Vnd,
    pub customer_info: CustomerInfo,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(
        user_id: String,
        items: Vec<LineItem>,
        total: Vnd,
        customer_info: CustomerInfo,
        payment_method: PaymentMethod,
    ) -> Self {
        Self { user_id, items, total, customer_info, payment_method, created_at: Utc::now() }
    }
}

//--------------------------------------         Cart         ---------------------------------------------------------
/// A user's mutable cart. One per user, created lazily on first access, emptied (never deleted) after checkout.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Cart {
    pub id: i64,
    pub user_id: String,
    #[sqlx(skip)]
    pub items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The sum of line totals. This is the only place an order total may legitimately come from.
    pub fn subtotal(&self) -> Vnd {
        self.items.iter().map(LineItem::line_total).sum()
    }
}

//--------------------------------------       Product        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Vnd,
    pub description: String,
    pub image: String,
    pub category_id: i64,
    pub count_in_stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Vnd,
    pub description: String,
    pub image: String,
    pub category_id: i64,
    #[serde(default)]
    pub count_in_stock: i64,
}

//--------------------------------------       Category       ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
}
