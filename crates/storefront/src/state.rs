//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::config::StorefrontConfig;
use crate::session::{SessionReader, SessionStore, SessionWriter};
use crate::storage::{FileStorage, SharedStorage, StorageError};
use crate::views::{NavBar, View, ViewContext};

/// Error creating the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("client storage: {0}")]
    Storage(#[from] StorageError),
    #[error("HTTP client: {0}")]
    Api(#[from] ApiError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It owns the one client
/// session; handlers hand views a read-only [`ViewContext`] and keep the
/// session writer to themselves.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    storage: SharedStorage,
    session: SessionStore,
}

impl AppState {
    /// Create the application state, opening the storage file named by
    /// `config` and restoring the session persisted there.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage file cannot be read or the HTTP client
    /// fails to build.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let storage: SharedStorage = Arc::new(FileStorage::open(config.storage_path())?);
        Self::with_storage(config, storage)
    }

    /// Create the application state over an existing storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_storage(config: StorefrontConfig, storage: SharedStorage) -> Result<Self, StateError> {
        let api = ApiClient::new(config.services.clone(), config.request_timeout)?;
        let session = SessionStore::restore(Arc::clone(&storage));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                storage,
                session,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Read-only session handle.
    #[must_use]
    pub fn session(&self) -> SessionReader {
        self.inner.session.reader()
    }

    /// Session write handle, for the login/logout handlers.
    #[must_use]
    pub fn session_writer(&self) -> SessionWriter {
        self.inner.session.writer()
    }

    /// Fresh context for one view.
    #[must_use]
    pub fn view_context(&self) -> ViewContext {
        ViewContext::new(
            self.inner.api.clone(),
            self.session(),
            Arc::clone(&self.inner.storage),
        )
    }

    /// Nav bar for the session as it is now.
    #[must_use]
    pub fn nav(&self) -> NavBar {
        NavBar::from_session(&self.session())
    }

    /// Wrap up a view after it ran: a refused session is dropped.
    pub fn finish(&self, view: &impl View) {
        if view.context().auth_failed() {
            self.session_writer().invalidate();
        }
    }
}
