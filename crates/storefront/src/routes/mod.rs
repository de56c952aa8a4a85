//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action (redirects home on success)
//! GET  /register               - Register page
//! POST /register               - Register action
//! POST /logout                 - Logout action (redirects home)
//!
//! # Products
//! GET  /all-products           - Product listing
//! POST /all-products/wishlist  - Add a listed product to the wishlist
//! POST /all-products/cart      - Add a listed product to the cart
//! GET  /products/{type}        - Products in one category
//! GET  /product/{id}           - Product detail
//! GET  /add-product            - Create product form
//! POST /add-product            - Create product
//! GET  /edit-product/{id}      - Edit product form
//! POST /edit-product/{id}      - Save product
//!
//! # Wishlist
//! GET  /wishlist               - Wishlist page
//! POST /wishlist/add           - Add product
//! POST /wishlist/remove        - Remove product
//!
//! # Cart and orders
//! GET  /cart                   - Cart page
//! POST /cart/remove            - Remove product from cart
//! GET  /make-order             - Cart page with the order button
//! POST /make-order             - Place order
//!
//! # Account
//! GET  /add-address            - Address form
//! POST /add-address            - Add address
//! GET  /profile                - Profile page
//! POST /profile                - Save profile
//! ```
//!
//! Every handler builds its view from the shared state, runs it, and then
//! calls [`AppState::finish`], which drops the session if a backend refused
//! it. The nav bar is read after that so it never shows a dead session.

pub mod account;
pub mod auth;
pub mod cart;
pub mod home;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};
use multivendor_core::ProductId;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

/// Form posted by product action buttons.
#[derive(Debug, Deserialize)]
pub struct ProductActionForm {
    pub product_id: String,
    #[serde(default)]
    pub quantity: Option<String>,
}

impl ProductActionForm {
    /// The product the button refers to.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the id is blank.
    pub fn product_id(&self) -> Result<ProductId, AppError> {
        let id = self.product_id.trim();
        if id.is_empty() {
            return Err(AppError::BadRequest("product_id is required".to_string()));
        }
        Ok(ProductId::new(id))
    }

    /// Requested quantity, defaulting to one.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the quantity is not a whole number.
    pub fn quantity(&self) -> Result<u32, AppError> {
        match self.quantity.as_deref().map(str::trim) {
            None | Some("") => Ok(1),
            Some(q) => q
                .parse()
                .map_err(|_| AppError::BadRequest(format!("invalid quantity '{q}'"))),
        }
    }
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        // Products
        .route("/all-products", get(products::index))
        .route("/all-products/wishlist", post(products::add_to_wishlist))
        .route("/all-products/cart", post(products::add_to_cart))
        .route("/products/{category}", get(products::category))
        .route("/product/{id}", get(products::show))
        .route(
            "/add-product",
            get(products::new_product).post(products::create_product),
        )
        .route(
            "/edit-product/{id}",
            get(products::edit_product).post(products::update_product),
        )
        // Wishlist
        .route("/wishlist", get(wishlist::show))
        .route("/wishlist/add", post(wishlist::add))
        .route("/wishlist/remove", post(wishlist::remove))
        // Cart and orders
        .route("/cart", get(cart::show))
        .route("/cart/remove", post(cart::remove))
        .route("/make-order", get(cart::show).post(cart::place_order))
        // Account
        .route(
            "/add-address",
            get(account::address_page).post(account::add_address),
        )
        .route(
            "/profile",
            get(account::profile).post(account::update_profile),
        )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(product_id: &str, quantity: Option<&str>) -> ProductActionForm {
        ProductActionForm {
            product_id: product_id.to_string(),
            quantity: quantity.map(String::from),
        }
    }

    #[test]
    fn test_product_action_form() {
        assert_eq!(form(" p1 ", None).product_id().unwrap(), ProductId::new("p1"));
        assert!(form("  ", None).product_id().is_err());

        assert_eq!(form("p1", None).quantity().unwrap(), 1);
        assert_eq!(form("p1", Some("")).quantity().unwrap(), 1);
        assert_eq!(form("p1", Some("3")).quantity().unwrap(), 3);
        assert!(matches!(
            form("p1", Some("three")).quantity(),
            Err(AppError::BadRequest(_))
        ));
    }
}
