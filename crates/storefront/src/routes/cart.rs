//! Cart and order route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use tracing::instrument;

use super::ProductActionForm;
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::state::AppState;
use crate::views::{NavBar, OrderFormView};

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: NavBar,
    pub view: OrderFormView,
}

/// Display the cart with the order button.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let mut view = OrderFormView::new(state.view_context());
    view.load().await;
    state.finish(&view);

    CartShowTemplate {
        nav: state.nav(),
        view,
    }
}

/// Remove a product from the cart.
#[instrument(skip(state, form), fields(product_id = %form.product_id))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<ProductActionForm>,
) -> Result<impl IntoResponse, AppError> {
    let id = form.product_id()?;

    let mut view = OrderFormView::new(state.view_context());
    view.remove_item(&id).await;
    if view.order.value().is_none() {
        // The removal failed, so the cart was not reloaded.
        view.load().await;
    }
    state.finish(&view);

    Ok(CartShowTemplate {
        nav: state.nav(),
        view,
    })
}

/// Place an order for everything in the cart.
#[instrument(skip(state))]
pub async fn place_order(State(state): State<AppState>) -> impl IntoResponse {
    let mut view = OrderFormView::new(state.view_context());
    view.load().await;
    view.place_order().await;
    if view.order.value().is_some() {
        add_breadcrumb("order", "Order placed", None);
    }
    state.finish(&view);

    CartShowTemplate {
        nav: state.nav(),
        view,
    }
}
