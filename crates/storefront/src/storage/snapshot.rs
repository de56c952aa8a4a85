//! Local snapshots of the wishlist and cart.
//!
//! Each snapshot is the list of product ids last seen in the corresponding
//! server-side collection, stored as a JSON array under its storage key. It
//! is a cache for rendering badges and "already saved" states; the services
//! stay authoritative.

use multivendor_core::ProductId;

use super::{SharedStorage, StorageError, keys};

/// A JSON array of product ids kept under one storage key.
#[derive(Clone)]
pub struct ProductSnapshot {
    storage: SharedStorage,
    key: &'static str,
}

impl ProductSnapshot {
    /// Snapshot of the wishlist.
    #[must_use]
    pub fn wishlist(storage: SharedStorage) -> Self {
        Self {
            storage,
            key: keys::WISHLIST,
        }
    }

    /// Snapshot of the cart.
    #[must_use]
    pub fn cart(storage: SharedStorage) -> Self {
        Self {
            storage,
            key: keys::CART,
        }
    }

    /// Storage key backing this snapshot.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Product ids currently in the snapshot, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or holds something other
    /// than a JSON array of strings.
    pub fn ids(&self) -> Result<Vec<ProductId>, StorageError> {
        decode(self.storage.get(self.key)?.as_deref())
    }

    /// Whether `id` is in the snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read.
    pub fn contains(&self, id: &ProductId) -> Result<bool, StorageError> {
        Ok(self.ids()?.contains(id))
    }

    /// Add `id` unless it is already present.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or written.
    pub fn insert(&self, id: &ProductId) -> Result<(), StorageError> {
        self.modify(|ids| {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        })
    }

    /// Drop `id` if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or written.
    pub fn remove(&self, id: &ProductId) -> Result<(), StorageError> {
        self.modify(|ids| ids.retain(|existing| existing != id))
    }

    /// Overwrite the snapshot with `ids`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn replace(&self, ids: &[ProductId]) -> Result<(), StorageError> {
        let json = serde_json::to_string(ids)?;
        self.storage.set(self.key, &json)
    }

    /// Edit the id list under one storage update.
    fn modify(&self, change: impl Fn(&mut Vec<ProductId>)) -> Result<(), StorageError> {
        self.storage.update(self.key, &mut |current| {
            let mut ids = decode(current)?;
            change(&mut ids);
            Ok(Some(serde_json::to_string(&ids)?))
        })
    }
}

fn decode(json: Option<&str>) -> Result<Vec<ProductId>, StorageError> {
    match json {
        Some(json) => Ok(serde_json::from_str(json)?),
        None => Ok(Vec::new()),
    }
}
