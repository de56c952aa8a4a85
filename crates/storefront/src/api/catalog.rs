//! Catalog service calls: products and the wishlist.

use multivendor_core::ProductId;
use reqwest::Method;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use super::{ApiClient, ApiError, AuthPolicy, Service};
use crate::models::{Product, ProductDraft, ProductRef};

/// `GET /` wraps the list; every other listing is a bare array.
#[derive(Deserialize)]
struct ProductPage {
    #[serde(default)]
    products: Vec<Product>,
}

impl ApiClient {
    /// All products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn fetch_products(
        &self,
        token: Option<&SecretString>,
    ) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint(Service::Catalog, &[])?;
        let request = self.request(Method::GET, url, AuthPolicy::Optional, token)?;
        let page: ProductPage = self.execute(request).await?;
        Ok(page.products)
    }

    /// Products in one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn fetch_products_by_category(
        &self,
        token: Option<&SecretString>,
        category: &str,
    ) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint(Service::Catalog, &["category", category])?;
        let request = self.request(Method::GET, url, AuthPolicy::Optional, token)?;
        self.execute(request).await
    }

    /// One product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn fetch_product(
        &self,
        token: Option<&SecretString>,
        id: &ProductId,
    ) -> Result<Product, ApiError> {
        let url = self.endpoint(Service::Catalog, &[id.as_str()])?;
        let request = self.request(Method::GET, url, AuthPolicy::Optional, token)?;
        self.execute(request).await
    }

    /// List a new product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when signed out, or an error if the
    /// request fails.
    #[instrument(skip_all, fields(name = %draft.name))]
    pub async fn create_product(
        &self,
        token: Option<&SecretString>,
        draft: &ProductDraft,
    ) -> Result<Product, ApiError> {
        let url = self.endpoint(Service::Catalog, &["product", "create"])?;
        let request = self
            .request(Method::POST, url, AuthPolicy::Required, token)?
            .json(draft);
        self.execute(request).await
    }

    /// Replace an existing product's fields.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when signed out, or an error if the
    /// request fails.
    #[instrument(skip(self, token, draft), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        token: Option<&SecretString>,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ApiError> {
        let url = self.endpoint(Service::Catalog, &["product", id.as_str()])?;
        let request = self
            .request(Method::PUT, url, AuthPolicy::Required, token)?
            .json(draft);
        self.execute(request).await
    }

    /// The signed-in shopper's wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when signed out, or an error if the
    /// request fails.
    #[instrument(skip_all)]
    pub async fn fetch_wishlist(
        &self,
        token: Option<&SecretString>,
    ) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint(Service::Catalog, &["wishlist"])?;
        let request = self.request(Method::GET, url, AuthPolicy::Required, token)?;
        self.execute(request).await
    }

    /// Add a product to the wishlist. Returns the updated wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when signed out, or an error if the
    /// request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn add_to_wishlist(
        &self,
        token: Option<&SecretString>,
        id: &ProductId,
    ) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint(Service::Catalog, &["wishlist"])?;
        let request = self
            .request(Method::PUT, url, AuthPolicy::Required, token)?
            .json(&ProductRef::from(id.clone()));
        self.execute(request).await
    }

    /// Remove a product from the wishlist. Returns the updated wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when signed out, or an error if the
    /// request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn remove_from_wishlist(
        &self,
        token: Option<&SecretString>,
        id: &ProductId,
    ) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint(Service::Catalog, &["wishlist", id.as_str()])?;
        let request = self.request(Method::DELETE, url, AuthPolicy::Required, token)?;
        self.execute(request).await
    }
}
