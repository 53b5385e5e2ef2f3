pub mod cart_api;
pub mod catalog_api;
pub mod objects;
pub mod order_flow_api;
pub mod statistics_api;

pub use cart_api::CartApi;
pub use catalog_api::CatalogApi;
pub use order_flow_api::OrderFlowApi;
pub use statistics_api::StatisticsApi;
