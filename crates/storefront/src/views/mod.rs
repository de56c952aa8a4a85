//! Per-screen view controllers.
//!
//! A view owns the local state of one screen: what it loaded, what the
//! shopper typed, and how the last action went. It reads the session through
//! the [`ViewContext`] it was built with and talks to the backends through
//! the [`ApiClient`]; it never changes the session itself. When a call is
//! refused for lack of a valid session, the view records it and the router
//! (which holds the session writer) invalidates the session afterwards.
//!
//! Views know nothing about HTTP or templates; `routes` drives them and
//! renders their state.

pub mod account;
pub mod address;
pub mod auth;
pub mod home;
pub mod nav;
pub mod order;
pub mod product_form;
pub mod products;
pub mod roles;
pub mod wishlist;

use std::sync::atomic::{AtomicBool, Ordering};

use secrecy::SecretString;

use crate::api::{ApiClient, ApiError};
use crate::session::SessionReader;
use crate::storage::{ProductSnapshot, SharedStorage};

pub use account::ProfileView;
pub use address::AddressFormView;
pub use auth::{LoginView, RegisterInput, RegisterView};
pub use home::HomeView;
pub use nav::NavBar;
pub use order::OrderFormView;
pub use product_form::{ProductFormInput, ProductFormView};
pub use products::{CategoryProductsView, ProductDetailView, ProductListView};
pub use roles::{Capability, FeatureCard};
pub use wishlist::WishlistView;

/// Progress of one remote operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The request succeeded.
    Success(T),
    /// The request failed; the message is never empty.
    Error(String),
}

impl<T> ViewState<T> {
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The loaded value, if the last request succeeded.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// The error message, if the last request failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Everything a view needs from the outside world.
pub struct ViewContext {
    api: ApiClient,
    session: SessionReader,
    storage: SharedStorage,
    auth_failed: AtomicBool,
}

impl ViewContext {
    #[must_use]
    pub const fn new(api: ApiClient, session: SessionReader, storage: SharedStorage) -> Self {
        Self {
            api,
            session,
            storage,
            auth_failed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn session(&self) -> &SessionReader {
        &self.session
    }

    /// Current session token, read fresh for every call.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.session.token()
    }

    /// Local snapshot of the wishlist ids.
    #[must_use]
    pub fn wishlist_snapshot(&self) -> ProductSnapshot {
        ProductSnapshot::wishlist(self.storage.clone())
    }

    /// Local snapshot of the cart ids.
    #[must_use]
    pub fn cart_snapshot(&self) -> ProductSnapshot {
        ProductSnapshot::cart(self.storage.clone())
    }

    /// Whether a call made through this context was refused for lack of a
    /// valid session.
    #[must_use]
    pub fn auth_failed(&self) -> bool {
        self.auth_failed.load(Ordering::Relaxed)
    }

    /// Turn a failed call into the message to show, noting authorization
    /// failures for the router.
    fn failure(&self, err: &ApiError, fallback: &str) -> String {
        if err.is_unauthorized() {
            self.auth_failed.store(true, Ordering::Relaxed);
        }
        tracing::warn!(error = %err, "{fallback}");
        err.user_message(fallback)
    }

    /// Apply a snapshot update. Snapshots are a cache, so a failure is only
    /// logged.
    fn sync_snapshot(
        &self,
        snapshot: &ProductSnapshot,
        update: impl FnOnce(&ProductSnapshot) -> Result<(), crate::storage::StorageError>,
    ) {
        if let Err(e) = update(snapshot) {
            tracing::warn!(key = snapshot.key(), error = %e, "Failed to update local snapshot");
        }
    }
}

/// A screen driven by the router.
pub trait View {
    /// Context the view was built with.
    fn context(&self) -> &ViewContext;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod testing {
    //! Context builders for view tests.

    use std::sync::Arc;
    use std::time::Duration;

    use secrecy::SecretString;

    use super::ViewContext;
    use crate::api::ApiClient;
    use crate::config::ServiceEndpoints;
    use crate::session::{SessionStore, token::unsigned_token};
    use crate::storage::{MemoryStorage, SharedStorage};

    /// Base URL nothing listens on, so any request that does go out fails
    /// as a network error.
    const UNREACHABLE: &str = "http://127.0.0.1:9/";

    pub struct Harness {
        pub store: SessionStore,
        pub storage: SharedStorage,
    }

    impl Harness {
        pub fn signed_out() -> Self {
            let storage: SharedStorage = Arc::new(MemoryStorage::new());
            let store = SessionStore::restore(Arc::clone(&storage));
            Self { store, storage }
        }

        pub fn signed_in(role: &str) -> Self {
            let harness = Self::signed_out();
            let token = unsigned_token(&serde_json::json!({
                "email": format!("{role}@example.com"),
                "role": role,
            }));
            harness.store.writer().login(SecretString::from(token));
            harness
        }

        pub fn context(&self) -> ViewContext {
            let services = ServiceEndpoints::parse(UNREACHABLE, UNREACHABLE, UNREACHABLE).unwrap();
            let api = ApiClient::new(services, Duration::from_secs(1)).unwrap();
            ViewContext::new(api, self.store.reader(), Arc::clone(&self.storage))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_view_state_accessors() {
        let idle: ViewState<u8> = ViewState::default();
        assert!(idle.is_idle());
        assert_eq!(idle.value(), None);

        assert_eq!(ViewState::Success(3).value(), Some(&3));
        assert_eq!(ViewState::<u8>::Error("boom".into()).error(), Some("boom"));
        assert!(ViewState::<u8>::Loading.is_loading());
    }

    #[tokio::test]
    async fn test_missing_token_marks_context() {
        let harness = testing::Harness::signed_out();
        let ctx = harness.context();
        let err = ctx.api().fetch_cart(ctx.token().as_ref()).await;
        let Err(err) = err else {
            panic!("expected missing token");
        };

        let message = ctx.failure(&err, "Failed to fetch cart");
        assert!(!message.is_empty());
        assert!(ctx.auth_failed());
    }
}
