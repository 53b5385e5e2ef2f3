use std::{collections::HashMap, net::IpAddr};

use chrono::{DateTime, Utc};
use log::*;
use serde::{Deserialize, Serialize};
use spg_common::{Vnd, VND_CURRENCY_CODE};

use crate::{
    signature::{canonicalize, sign, SECURE_HASH_FIELD},
    VnPayConfig,
    VnPayError,
};

/// The gateway protocol version we speak.
pub const VNPAY_VERSION: &str = "2.1.0";

/// The gateway expresses amounts in hundredths of a đồng, so every amount is multiplied by this factor exactly
/// once, here. Getting this wrong is not a crash, it is a silently mispriced order, hence the single named
/// constant and the dedicated test.
pub const VND_AMOUNT_SCALE: i64 = 100;

/// The `vnp_CreateDate` timestamp format.
const CREATE_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

/// Everything order-specific that goes into an outbound payment URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// The order's public reference. Becomes `vnp_TxnRef` and comes back in the return callback.
    pub reference: String,
    /// The order total, in whole đồng. Scaling to the gateway's convention happens in here.
    pub amount: Vnd,
    /// Free-text description shown on the gateway's payment page.
    pub order_info: String,
    /// The customer's IP address, as seen by us.
    pub client_ip: IpAddr,
    /// When the payment request was created.
    pub created_at: DateTime<Utc>,
}

/// Assemble and sign the redirect URL that sends the customer's browser to the gateway.
///
/// The query string is the canonical (sorted, encoded) parameter string with the signature appended, which is
/// exactly the byte sequence that was signed.
pub fn build_payment_url(request: &PaymentRequest, config: &VnPayConfig) -> Result<String, VnPayError> {
    if !request.amount.is_positive() {
        return Err(VnPayError::InvalidCurrencyAmount(format!(
            "Payment amounts must be positive, not {}",
            request.amount
        )));
    }
    let params: HashMap<String, String> = [
        ("vnp_Version", VNPAY_VERSION.to_string()),
        ("vnp_Command", "pay".to_string()),
        ("vnp_TmnCode", config.tmn_code.clone()),
        ("vnp_Locale", "vn".to_string()),
        ("vnp_CurrCode", VND_CURRENCY_CODE.to_string()),
        ("vnp_TxnRef", request.reference.clone()),
        ("vnp_OrderInfo", request.order_info.clone()),
        ("vnp_OrderType", "other".to_string()),
        ("vnp_Amount", (request.amount.value() * VND_AMOUNT_SCALE).to_string()),
        ("vnp_ReturnUrl", config.return_url.clone()),
        ("vnp_IpAddr", request.client_ip.to_string()),
        ("vnp_CreateDate", request.created_at.format(CREATE_DATE_FORMAT).to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    let canonical = canonicalize(&params, &[]);
    let signature = sign(&canonical, config.hash_secret.reveal().as_bytes());
    debug!("💳️ Built payment URL for order {} ({})", request.reference, request.amount);
    Ok(format!("{}?{canonical}&{SECURE_HASH_FIELD}={signature}", config.base_url))
}
