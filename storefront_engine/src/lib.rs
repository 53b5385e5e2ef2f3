//! Storefront Payment Engine
//!
//! The core business logic for the storefront: carts, the order ledger, catalog management and revenue
//! reporting. It is HTTP-framework agnostic; the server crate wires these APIs to routes.
//!
//! The library is divided into two main sections:
//! 1. Database management ([`mod@sqlite`]). SQLite is the only supported backend at present. You should never
//!    need to access the database directly. Instead, use the public APIs. The exception is the data types used
//!    in the database. These are defined in the `db_types` module and are public.
//! 2. The public API ([`mod@api`]). `OrderFlowApi` owns checkout and payment reconciliation, `CartApi` the
//!    per-user carts, `CatalogApi` products and categories, and `StatisticsApi` revenue reporting. Backends
//!    implement the traits in [`mod@traits`] to plug in underneath them.

pub mod api;
pub mod db_types;
pub mod helpers;
#[cfg(feature = "sqlite")]
mod sqlite;
pub mod traits;

pub use api::{
    objects::{DashboardSummary, MethodTotal, RevenueReport, TimeRange, TimelineBucket, UpdateProduct},
    CartApi,
    CatalogApi,
    OrderFlowApi,
    StatisticsApi,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{CartManagement, CatalogManagement, StatisticsQueries, StorefrontApiError, StorefrontDatabase};
