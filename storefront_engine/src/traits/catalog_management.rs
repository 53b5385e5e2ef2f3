use crate::{
    api::objects::UpdateProduct,
    db_types::{Category, NewCategory, NewProduct, Product},
    traits::StorefrontApiError,
};

/// Product and category maintenance for the storefront catalog.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    async fn fetch_products(&self) -> Result<Vec<Product>, StorefrontApiError>;

    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, StorefrontApiError>;

    async fn fetch_products_in_category(&self, category_id: i64) -> Result<Vec<Product>, StorefrontApiError>;

    async fn insert_product(&self, product: NewProduct) -> Result<Product, StorefrontApiError>;

    /// Partial update; only the populated fields of `update` are written.
    async fn update_product(&self, product_id: i64, update: UpdateProduct) -> Result<Product, StorefrontApiError>;

    async fn delete_product(&self, product_id: i64) -> Result<(), StorefrontApiError>;

    async fn fetch_categories(&self) -> Result<Vec<Category>, StorefrontApiError>;

    async fn insert_category(&self, category: NewCategory) -> Result<Category, StorefrontApiError>;
}
