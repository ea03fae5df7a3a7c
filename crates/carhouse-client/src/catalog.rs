//! Product and category CRUD, plus product image records.

use reqwest::Method;
use serde_json::json;

use carhouse_core::ServiceError;

use crate::backend::{Backend, FailureKind};
use crate::model::{Category, CategoryInput, Product, ProductImage, ProductInput};

impl Backend {
    /// All products, with their category joined in.
    pub async fn get_products(&self) -> Result<Vec<Product>, ServiceError> {
        let value = self.get_json("/rest/products?include=category").await?;
        Self::items(value, "product")
    }

    /// All categories.
    pub async fn get_categories(&self) -> Result<Vec<Category>, ServiceError> {
        let value = self.get_json("/rest/categories").await?;
        Self::items(value, "category")
    }

    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ServiceError> {
        let value = self
            .execute(
                self.request(Method::POST, "/rest/products").json(input),
                FailureKind::Write,
            )
            .await?;
        Self::record(value, "product")
    }

    pub async fn update_product(
        &self,
        id: &str,
        input: &ProductInput,
    ) -> Result<Product, ServiceError> {
        let value = self
            .execute(
                self.request(Method::PATCH, &format!("/rest/products/{}", id))
                    .json(input),
                FailureKind::Write,
            )
            .await?;
        Self::record(value, "product")
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), ServiceError> {
        self.execute(
            self.request(Method::DELETE, &format!("/rest/products/{}", id)),
            FailureKind::Write,
        )
        .await?;
        Ok(())
    }

    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, ServiceError> {
        let value = self
            .execute(
                self.request(Method::POST, "/rest/categories").json(input),
                FailureKind::Write,
            )
            .await?;
        Self::record(value, "category")
    }

    pub async fn update_category(
        &self,
        id: &str,
        input: &CategoryInput,
    ) -> Result<Category, ServiceError> {
        let value = self
            .execute(
                self.request(Method::PATCH, &format!("/rest/categories/{}", id))
                    .json(input),
                FailureKind::Write,
            )
            .await?;
        Self::record(value, "category")
    }

    pub async fn delete_category(&self, id: &str) -> Result<(), ServiceError> {
        self.execute(
            self.request(Method::DELETE, &format!("/rest/categories/{}", id)),
            FailureKind::Write,
        )
        .await?;
        Ok(())
    }

    /// Attach an uploaded image URL to a product as a secondary record.
    pub async fn add_product_image(
        &self,
        product_id: &str,
        url: &str,
        alt: &str,
        position: i64,
    ) -> Result<ProductImage, ServiceError> {
        let body = json!({
            "product_id": product_id,
            "url": url,
            "alt": alt,
            "position": position,
        });
        let value = self
            .execute(
                self.request(Method::POST, "/rest/product-images").json(&body),
                FailureKind::Upload,
            )
            .await?;
        Self::record(value, "product image")
    }
}
