//! # VNPay integration
//!
//! Everything the external payment gateway dictates lives in this crate: the parameter canonicalization and
//! HMAC-SHA512 signature scheme, the outbound redirect-URL format, and the shape of the inbound return callback.
//! The crate is deliberately free of any storage or HTTP-framework concerns; the server wires it up.
//!
//! The protocol is a signed-redirect flow. We send the customer's browser to the gateway with a signed query
//! string; the gateway sends the browser back to our return URL with a signed query string of its own. Both legs
//! use the same canonicalization ([`signature::canonicalize`]) — a mismatch in encoding between the two legs does
//! not produce an error anywhere, just a hash that never matches, so there is exactly one implementation.

mod callback;
mod config;
mod error;
mod payment_url;
pub mod signature;

pub use callback::{CallbackParams, RESPONSE_CODE_SUCCESS};
pub use config::VnPayConfig;
pub use error::VnPayError;
pub use payment_url::{build_payment_url, PaymentRequest, VNPAY_VERSION, VND_AMOUNT_SCALE};
