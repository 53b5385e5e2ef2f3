mod cart_management;
mod catalog_management;
mod statistics;
mod storefront_database;

use thiserror::Error;

pub use cart_management::CartManagement;
pub use catalog_management::CatalogManagement;
pub use statistics::StatisticsQueries;
pub use storefront_database::StorefrontDatabase;

use crate::db_types::OrderReference;

/// The error taxonomy shared by every backend trait. All variants are local, synchronous and non-fatal; nothing
/// in the engine can take the process down.
#[derive(Debug, Clone, Error)]
pub enum StorefrontApiError {
    /// The caller supplied malformed or missing input. Retrying the identical call cannot succeed.
    #[error("Invalid input. {0}")]
    ValidationError(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderReference),
    #[error("The requested order (internal id {0}) does not exist")]
    OrderIdNotFound(i64),
    #[error("The requested product (id {0}) does not exist")]
    ProductNotFound(i64),
    #[error("The requested category (id {0}) does not exist")]
    CategoryNotFound(i64),
    #[error("Product {0} is not in the cart")]
    ItemNotFound(i64),
    /// Reference generation kept colliding with existing orders. Internally retried before surfacing; seeing
    /// this in the wild means the RNG is broken or the order table is implausibly full.
    #[error("Could not allocate a unique order reference after {0} attempts")]
    ReferenceCollision(u32),
    #[error("We have an internal database engine error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for StorefrontApiError {
    fn from(e: sqlx::Error) -> Self {
        StorefrontApiError::DatabaseError(e.to_string())
    }
}
