//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use tracing::instrument;

use super::ProductActionForm;
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::state::AppState;
use crate::views::{NavBar, WishlistView};

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist.html")]
pub struct WishlistTemplate {
    pub nav: NavBar,
    pub view: WishlistView,
}

/// Display the wishlist.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let mut view = WishlistView::new(state.view_context());
    view.load().await;
    state.finish(&view);

    WishlistTemplate {
        nav: state.nav(),
        view,
    }
}

/// Add a product to the wishlist.
#[instrument(skip(state, form), fields(product_id = %form.product_id))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<ProductActionForm>,
) -> Result<impl IntoResponse, AppError> {
    let id = form.product_id()?;

    let mut view = WishlistView::new(state.view_context());
    view.add(&id).await;
    if view.action.value().is_some() {
        add_breadcrumb("wishlist", "Added product", Some(&[("product_id", id.as_str())]));
    }
    state.finish(&view);

    Ok(WishlistTemplate {
        nav: state.nav(),
        view,
    })
}

/// Remove a product from the wishlist.
#[instrument(skip(state, form), fields(product_id = %form.product_id))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<ProductActionForm>,
) -> Result<impl IntoResponse, AppError> {
    let id = form.product_id()?;

    let mut view = WishlistView::new(state.view_context());
    view.remove(&id).await;
    if view.action.value().is_some() {
        add_breadcrumb("wishlist", "Removed product", Some(&[("product_id", id.as_str())]));
    }
    state.finish(&view);

    Ok(WishlistTemplate {
        nav: state.nav(),
        view,
    })
}
