//! Account route handlers: addresses and profile.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::models::{Address, Profile};
use crate::state::AppState;
use crate::views::{AddressFormView, NavBar, ProfileView};

/// Address form data.
#[derive(Debug, Deserialize)]
pub struct AddressForm {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

impl From<AddressForm> for Address {
    fn from(form: AddressForm) -> Self {
        Self {
            street: form.street,
            postal_code: form.postal_code,
            city: form.city,
            country: form.country,
        }
    }
}

/// Profile form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

impl From<ProfileForm> for Profile {
    fn from(form: ProfileForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
            gender: form.gender.trim().to_string(),
            street: form.street.trim().to_string(),
            postal_code: form.postal_code.trim().to_string(),
            city: form.city.trim().to_string(),
            country: form.country.trim().to_string(),
        }
    }
}

/// Address form template.
#[derive(Template, WebTemplate)]
#[template(path = "account/address.html")]
pub struct AddressTemplate {
    pub nav: NavBar,
    pub view: AddressFormView,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub nav: NavBar,
    pub view: ProfileView,
}

/// Display the address form.
#[instrument(skip(state))]
pub async fn address_page(State(state): State<AppState>) -> impl IntoResponse {
    AddressTemplate {
        nav: state.nav(),
        view: AddressFormView::new(state.view_context()),
    }
}

/// Add an address.
#[instrument(skip(state, form))]
pub async fn add_address(
    State(state): State<AppState>,
    Form(form): Form<AddressForm>,
) -> impl IntoResponse {
    let mut view = AddressFormView::new(state.view_context());
    view.submit(form.into()).await;
    state.finish(&view);

    AddressTemplate {
        nav: state.nav(),
        view,
    }
}

/// Display the profile.
#[instrument(skip(state))]
pub async fn profile(State(state): State<AppState>) -> impl IntoResponse {
    let mut view = ProfileView::new(state.view_context());
    view.load().await;
    state.finish(&view);

    ProfileTemplate {
        nav: state.nav(),
        view,
    }
}

/// Save the profile.
#[instrument(skip(state, form))]
pub async fn update_profile(
    State(state): State<AppState>,
    Form(form): Form<ProfileForm>,
) -> impl IntoResponse {
    let mut view = ProfileView::new(state.view_context());
    view.submit(form.into()).await;
    state.finish(&view);

    ProfileTemplate {
        nav: state.nav(),
        view,
    }
}
