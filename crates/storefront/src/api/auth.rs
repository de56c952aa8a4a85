//! Auth service calls: login, registration, profile, addresses.

use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;

use super::{ApiClient, ApiError, AuthPolicy, Service};
use crate::models::{Address, Credentials, LoginResponse, Profile, Registration};

impl ApiClient {
    /// Exchange credentials for a session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service refuses.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let url = self.endpoint(Service::Auth, &["login"])?;
        let request = self
            .request(Method::POST, url, AuthPolicy::Public, None)?
            .json(credentials);
        self.execute(request).await
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service refuses.
    #[instrument(skip(self, registration), fields(email = %registration.email, role = %registration.role))]
    pub async fn register(
        &self,
        registration: &Registration,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint(Service::Auth, &["register"])?;
        let request = self
            .request(Method::POST, url, AuthPolicy::Public, None)?
            .json(registration);
        self.execute(request).await
    }

    /// Fetch the signed-in shopper's profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when signed out, or an error if the
    /// request fails.
    #[instrument(skip_all)]
    pub async fn fetch_profile(&self, token: Option<&SecretString>) -> Result<Profile, ApiError> {
        let url = self.endpoint(Service::Auth, &["profile"])?;
        let request = self.request(Method::GET, url, AuthPolicy::Required, token)?;
        self.execute(request).await
    }

    /// Replace the signed-in shopper's profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when signed out, or an error if the
    /// request fails.
    #[instrument(skip_all)]
    pub async fn update_profile(
        &self,
        token: Option<&SecretString>,
        profile: &Profile,
    ) -> Result<Profile, ApiError> {
        let url = self.endpoint(Service::Auth, &["profile"])?;
        let request = self
            .request(Method::PUT, url, AuthPolicy::Required, token)?
            .json(profile);
        self.execute(request).await
    }

    /// Add a postal address to the signed-in shopper's account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when signed out, or an error if the
    /// request fails.
    #[instrument(skip_all, fields(city = %address.city))]
    pub async fn add_address(
        &self,
        token: Option<&SecretString>,
        address: &Address,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint(Service::Auth, &["address"])?;
        let request = self
            .request(Method::POST, url, AuthPolicy::Required, token)?
            .json(address);
        self.execute(request).await
    }
}
