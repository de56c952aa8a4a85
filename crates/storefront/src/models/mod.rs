//! Wire models for the backend services.
//!
//! These mirror the JSON the services exchange. Field names follow the wire
//! (`_id`, `type`, `postalCode`) through serde renames; everything else uses
//! our own names. Decoding is lenient about missing non-id fields since the
//! services omit empty ones.

pub mod auth;
pub mod cart;
pub mod order;
pub mod product;
pub mod profile;

pub use auth::{Credentials, LoginResponse, Registration};
pub use cart::{AddToCart, CartEntry, CartItem};
pub use order::{NewOrder, OrderError};
pub use product::{Product, ProductDraft, ProductRef};
pub use profile::{Address, Profile};
