use std::collections::HashMap;

use crate::{signature::verify, VnPayError};

/// The gateway's "payment approved" response code. Every other code is a gateway-defined failure and is treated
/// as opaque.
pub const RESPONSE_CODE_SUCCESS: &str = "00";

/// A typed view over the raw return-callback query parameters.
///
/// Only the handful of fields with business meaning get accessors; everything else in the map still participates
/// in signature verification.
#[derive(Debug, Clone)]
pub struct CallbackParams {
    raw: HashMap<String, String>,
}

impl From<HashMap<String, String>> for CallbackParams {
    fn from(raw: HashMap<String, String>) -> Self {
        Self { raw }
    }
}

impl CallbackParams {
    /// The order reference the gateway is reporting on (`vnp_TxnRef`).
    pub fn txn_ref(&self) -> Result<&str, VnPayError> {
        self.raw.get("vnp_TxnRef").map(String::as_str).ok_or(VnPayError::MissingCallbackField("vnp_TxnRef"))
    }

    /// The gateway's response code, `"00"` meaning the payment went through.
    pub fn response_code(&self) -> &str {
        self.raw.get("vnp_ResponseCode").map(String::as_str).unwrap_or("")
    }

    /// The gateway's own transaction id, if it sent one.
    pub fn transaction_no(&self) -> Option<&str> {
        self.raw.get("vnp_TransactionNo").map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        self.response_code() == RESPONSE_CODE_SUCCESS
    }

    /// Signature check over the full parameter set. See [`crate::signature::verify`] for the semantics; this is a
    /// data condition, not an error.
    pub fn is_authentic(&self, secret: &[u8]) -> bool {
        verify(&self.raw, secret)
    }
}
