//! Shopping service calls: cart and orders.

use multivendor_core::ProductId;
use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;

use super::{ApiClient, ApiError, AuthPolicy, Service};
use crate::models::{AddToCart, CartEntry, NewOrder};

impl ApiClient {
    /// The signed-in shopper's cart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when signed out, or an error if the
    /// request fails.
    #[instrument(skip_all)]
    pub async fn fetch_cart(&self, token: Option<&SecretString>) -> Result<Vec<CartEntry>, ApiError> {
        let url = self.endpoint(Service::Shopping, &["cart"])?;
        let request = self.request(Method::GET, url, AuthPolicy::Required, token)?;
        self.execute(request).await
    }

    /// Put `amount` units of a product in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when signed out, or an error if the
    /// request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn add_to_cart(
        &self,
        token: Option<&SecretString>,
        id: &ProductId,
        amount: u32,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint(Service::Shopping, &["cart"])?;
        let request = self
            .request(Method::PUT, url, AuthPolicy::Required, token)?
            .json(&AddToCart::new(id.clone(), amount));
        self.execute(request).await
    }

    /// Take a product out of the cart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when signed out, or an error if the
    /// request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn remove_from_cart(
        &self,
        token: Option<&SecretString>,
        id: &ProductId,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint(Service::Shopping, &["cart", id.as_str()])?;
        let request = self.request(Method::DELETE, url, AuthPolicy::Required, token)?;
        self.execute(request).await
    }

    /// Submit an order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when signed out, or an error if the
    /// request fails.
    #[instrument(skip_all, fields(items = order.items.len(), amount = %order.amount))]
    pub async fn place_order(
        &self,
        token: Option<&SecretString>,
        order: &NewOrder,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint(Service::Shopping, &["order"])?;
        let request = self
            .request(Method::POST, url, AuthPolicy::Required, token)?
            .json(order);
        self.execute(request).await
    }
}
