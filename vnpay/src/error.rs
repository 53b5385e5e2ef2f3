use thiserror::Error;

#[derive(Debug, Error)]
pub enum VnPayError {
    #[error("Invalid currency amount: {0}")]
    InvalidCurrencyAmount(String),
    #[error("The callback is missing the required field {0}")]
    MissingCallbackField(&'static str),
}
