//! HTTP clients for the backend services.
//!
//! Every backend call goes through [`ApiClient`]: one request per call, no
//! retries, no caching. Calls are grouped by service:
//!
//! - [`auth`] - login, registration, profile and addresses (auth service)
//! - [`catalog`] - products and the wishlist (catalog service)
//! - [`shopping`] - cart and orders (shopping service)
//!
//! Each call declares an [`AuthPolicy`]. A call that requires a token fails
//! with [`ApiError::MissingToken`] before anything is sent when the shopper is
//! signed out.

pub mod auth;
pub mod catalog;
pub mod shopping;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::ServiceEndpoints;

/// Shown for any failure where no response came back.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Shown when a protected call is attempted while signed out.
pub const SIGN_IN_MESSAGE: &str = "Please sign in to continue.";

/// Last-resort message when neither the backend nor the caller supplied one.
const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors that can occur when calling a backend service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response: connection refused, timeout, or the body could not be read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("service returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The call needs a session token and there is none.
    #[error("not signed in")]
    MissingToken,

    /// The request URL could not be built.
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
}

impl ApiError {
    /// Whether the failure means the session is missing or was refused.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::MissingToken | Self::Status {
                status: 401 | 403,
                ..
            }
        )
    }

    /// HTTP status, if the service answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message to show the shopper. Never empty.
    ///
    /// Prefers the service's own `message`, then `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        let message = match self {
            Self::Network(_) => NETWORK_ERROR_MESSAGE,
            Self::MissingToken => SIGN_IN_MESSAGE,
            Self::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message,
            _ => fallback,
        };

        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message.to_string()
        }
    }
}

/// Whether a call sends the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Fails with [`ApiError::MissingToken`] when signed out.
    Required,
    /// Sends the token when there is one.
    Optional,
    /// Never sends the token.
    Public,
}

impl AuthPolicy {
    /// Pick the token to send, or refuse the call.
    fn bearer(self, token: Option<&SecretString>) -> Result<Option<&SecretString>, ApiError> {
        match (self, token) {
            (Self::Required, None) => Err(ApiError::MissingToken),
            (Self::Public, _) => Ok(None),
            (Self::Required | Self::Optional, token) => Ok(token),
        }
    }
}

/// Backend service a call is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Auth,
    Catalog,
    Shopping,
}

/// Client for the auth, catalog and shopping services.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    services: ServiceEndpoints,
}

impl ApiClient {
    /// Create a client for the given service locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(services: ServiceEndpoints, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("multivendor-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner { http, services }),
        })
    }

    /// Service locations this client talks to.
    #[must_use]
    pub fn services(&self) -> &ServiceEndpoints {
        &self.inner.services
    }

    /// Build the URL for `segments` under a service's base URL.
    ///
    /// Each segment is percent-encoded, so ids can never climb out of the
    /// base path or smuggle in a query string.
    fn endpoint(&self, service: Service, segments: &[&str]) -> Result<Url, ApiError> {
        let base = match service {
            Service::Auth => &self.inner.services.auth,
            Service::Catalog => &self.inner.services.catalog,
            Service::Shopping => &self.inner.services.shopping,
        };

        let mut path = Vec::with_capacity(segments.len());
        for segment in segments {
            if segment.is_empty() || *segment == "." || *segment == ".." {
                return Err(ApiError::Endpoint(format!("invalid path segment '{segment}'")));
            }
            path.push(urlencoding::encode(segment));
        }

        base.join(&path.join("/"))
            .map_err(|e| ApiError::Endpoint(e.to_string()))
    }

    /// Start a request, attaching the bearer token as `policy` dictates.
    fn request(
        &self,
        method: Method,
        url: Url,
        policy: AuthPolicy,
        token: Option<&SecretString>,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let bearer = policy.bearer(token)?;
        let mut builder = self.inner.http.request(method, url);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }
        Ok(builder)
    }

    /// Send a request and decode a 2xx JSON body.
    ///
    /// An empty 2xx body decodes as JSON `null`.
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Backend request failed");
            ApiError::Network(e)
        })?;

        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await?;

        if !status.is_success() {
            let message = service_message(&body);
            tracing::warn!(
                status = status.as_u16(),
                url = %url,
                message = message.as_deref().unwrap_or(""),
                "Backend returned an error"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(status = status.as_u16(), url = %url, "Backend call succeeded");

        let body = if body.trim().is_empty() { "null" } else { &body };
        serde_json::from_str(body).map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Unexpected backend response body");
            ApiError::Decode(e.to_string())
        })
    }
}

/// Pull the `message` field out of an error body, if there is one.
fn service_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
}
