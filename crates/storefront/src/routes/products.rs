//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::IntoResponse,
};
use multivendor_core::ProductId;
use tracing::instrument;

use super::ProductActionForm;
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::state::AppState;
use crate::views::{
    CategoryProductsView, NavBar, ProductDetailView, ProductFormInput, ProductFormView,
    ProductListView,
};

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub nav: NavBar,
    pub view: ProductListView,
}

/// Category listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/category.html")]
pub struct CategoryTemplate {
    pub nav: NavBar,
    pub view: CategoryProductsView,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: NavBar,
    pub view: ProductDetailView,
}

/// Create/edit product form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub nav: NavBar,
    pub view: ProductFormView,
}

// =============================================================================
// Listing
// =============================================================================

/// Display all products.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let mut view = ProductListView::new(state.view_context());
    view.load().await;
    state.finish(&view);

    ProductsIndexTemplate {
        nav: state.nav(),
        view,
    }
}

/// Add a listed product to the wishlist, then show the listing again.
#[instrument(skip(state, form), fields(product_id = %form.product_id))]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    Form(form): Form<ProductActionForm>,
) -> Result<impl IntoResponse, AppError> {
    let id = form.product_id()?;

    let mut view = ProductListView::new(state.view_context());
    view.add_to_wishlist(&id).await;
    if view.action.value().is_some() {
        add_breadcrumb("wishlist", "Added product", Some(&[("product_id", id.as_str())]));
    }
    view.load().await;
    state.finish(&view);

    Ok(ProductsIndexTemplate {
        nav: state.nav(),
        view,
    })
}

/// Add a listed product to the cart, then show the listing again.
#[instrument(skip(state, form), fields(product_id = %form.product_id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Form(form): Form<ProductActionForm>,
) -> Result<impl IntoResponse, AppError> {
    let id = form.product_id()?;
    let quantity = form.quantity()?;

    let mut view = ProductListView::new(state.view_context());
    view.add_to_cart(&id, quantity).await;
    if view.action.value().is_some() {
        add_breadcrumb("cart", "Added product", Some(&[("product_id", id.as_str())]));
    }
    view.load().await;
    state.finish(&view);

    Ok(ProductsIndexTemplate {
        nav: state.nav(),
        view,
    })
}

/// Display the products of one category.
#[instrument(skip(state))]
pub async fn category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> impl IntoResponse {
    let mut view = CategoryProductsView::new(state.view_context(), category);
    view.load().await;
    state.finish(&view);

    CategoryTemplate {
        nav: state.nav(),
        view,
    }
}

/// Display one product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let mut view = ProductDetailView::new(state.view_context(), ProductId::new(id));
    view.load().await;
    state.finish(&view);

    ProductShowTemplate {
        nav: state.nav(),
        view,
    }
}

// =============================================================================
// Create / Edit
// =============================================================================

/// Display the blank product form.
#[instrument(skip(state))]
pub async fn new_product(State(state): State<AppState>) -> impl IntoResponse {
    product_form(&state, None, None).await
}

/// Create a product.
#[instrument(skip(state, input), fields(name = %input.name))]
pub async fn create_product(
    State(state): State<AppState>,
    Form(input): Form<ProductFormInput>,
) -> impl IntoResponse {
    product_form(&state, None, Some(input)).await
}

/// Display the product form filled from an existing product.
#[instrument(skip(state))]
pub async fn edit_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    product_form(&state, Some(ProductId::new(id)), None).await
}

/// Save an existing product.
#[instrument(skip(state, input))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(input): Form<ProductFormInput>,
) -> impl IntoResponse {
    product_form(&state, Some(ProductId::new(id)), Some(input)).await
}

/// Run the product form: load on GET, submit on POST.
async fn product_form(
    state: &AppState,
    id: Option<ProductId>,
    input: Option<ProductFormInput>,
) -> ProductFormTemplate {
    let mut view = ProductFormView::new(state.view_context(), id);
    match input {
        Some(input) => view.submit(input).await,
        None => view.load().await,
    }
    state.finish(&view);

    ProductFormTemplate {
        nav: state.nav(),
        view,
    }
}
