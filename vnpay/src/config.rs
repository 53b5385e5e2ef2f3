use log::*;
use spg_common::Secret;

const DEFAULT_BASE_URL: &str = "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html";

#[derive(Debug, Clone, Default)]
pub struct VnPayConfig {
    /// The merchant code issued by the gateway (`vnp_TmnCode`).
    pub tmn_code: String,
    /// The shared HMAC-SHA512 secret. Never logged; see [`spg_common::Secret`].
    pub hash_secret: Secret<String>,
    /// The gateway's payment page. Defaults to the sandbox.
    pub base_url: String,
    /// Where the gateway redirects the customer's browser after payment (`vnp_ReturnUrl`).
    pub return_url: String,
}

impl VnPayConfig {
    pub fn new_from_env_or_default() -> Self {
        let tmn_code = std::env::var("SPG_VNPAY_TMN_CODE").unwrap_or_else(|_| {
            warn!("SPG_VNPAY_TMN_CODE is not set. The gateway will reject payment requests without it.");
            String::default()
        });
        let hash_secret = Secret::new(std::env::var("SPG_VNPAY_HASH_SECRET").unwrap_or_else(|_| {
            warn!("SPG_VNPAY_HASH_SECRET is not set. Signature generation and verification will not work.");
            String::default()
        }));
        let base_url = std::env::var("SPG_VNPAY_BASE_URL").unwrap_or_else(|_| {
            info!("SPG_VNPAY_BASE_URL is not set. Using the sandbox gateway at {DEFAULT_BASE_URL}.");
            DEFAULT_BASE_URL.to_string()
        });
        let return_url = std::env::var("SPG_VNPAY_RETURN_URL").unwrap_or_else(|_| {
            warn!("SPG_VNPAY_RETURN_URL is not set. Using a localhost return URL, which only works in development.");
            "http://localhost:8360/payments/vnpay/return".to_string()
        });
        Self { tmn_code, hash_secret, base_url, return_url }
    }
}
