use std::fmt::Debug;

use log::*;

use crate::{
    api::objects::UpdateProduct,
    db_types::{Category, NewCategory, NewProduct, Product, MIN_PRODUCT_PRICE},
    traits::{CatalogManagement, StorefrontApiError},
};

/// Product and category management, with boundary validation so that nothing malformed reaches the database.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub async fn products(&self) -> Result<Vec<Product>, StorefrontApiError> {
        self.db.fetch_products().await
    }

    pub async fn product(&self, product_id: i64) -> Result<Product, StorefrontApiError> {
        self.db.fetch_product(product_id).await?.ok_or(StorefrontApiError::ProductNotFound(product_id))
    }

    pub async fn products_in_category(&self, category_id: i64) -> Result<Vec<Product>, StorefrontApiError> {
        self.db.fetch_products_in_category(category_id).await
    }

    pub async fn create_product(&self, product: NewProduct) -> Result<Product, StorefrontApiError> {
        if product.name.trim().is_empty() {
            return Err(StorefrontApiError::ValidationError("Product name must not be blank".to_string()));
        }
        if product.price < MIN_PRODUCT_PRICE {
            return Err(StorefrontApiError::ValidationError(format!(
                "Product price must be at least {MIN_PRODUCT_PRICE}, not {}",
                product.price
            )));
        }
        let product = self.db.insert_product(product).await?;
        debug!("🗂️ Product {} created with id {}", product.name, product.id);
        Ok(product)
    }

    pub async fn update_product(
        &self,
        product_id: i64,
        update: UpdateProduct,
    ) -> Result<Product, StorefrontApiError> {
        if update.is_empty() {
            return Err(StorefrontApiError::ValidationError("No product fields to update".to_string()));
        }
        if matches!(update.price, Some(p) if p < MIN_PRODUCT_PRICE) {
            return Err(StorefrontApiError::ValidationError(format!(
                "Product price must be at least {MIN_PRODUCT_PRICE}"
            )));
        }
        self.db.update_product(product_id, update).await
    }

    pub async fn delete_product(&self, product_id: i64) -> Result<(), StorefrontApiError> {
        self.db.delete_product(product_id).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, StorefrontApiError> {
        self.db.fetch_categories().await
    }

    pub async fn create_category(&self, category: NewCategory) -> Result<Category, StorefrontApiError> {
        if category.name.trim().is_empty() {
            return Err(StorefrontApiError::ValidationError("Category name must not be blank".to_string()));
        }
        self.db.insert_category(category).await
    }
}
