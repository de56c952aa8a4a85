//! Authentication route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use multivendor_core::Role;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::state::AppState;
use crate::views::{LoginView, NavBar, RegisterInput, RegisterView};

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: NavBar,
    pub view: LoginView,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub nav: NavBar,
    pub view: RegisterView,
    pub roles: &'static [Role],
}

// =============================================================================
// Handlers
// =============================================================================

/// Display login page.
#[instrument(skip(state))]
pub async fn login_page(State(state): State<AppState>) -> impl IntoResponse {
    LoginTemplate {
        nav: state.nav(),
        view: LoginView::new(state.view_context()),
    }
}

/// Handle login form submission.
///
/// Redirects home once signed in; otherwise re-renders the form with the
/// failure message.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let mut view = LoginView::new(state.view_context());
    let writer = state.session_writer();

    if view
        .submit(&writer, &form.email, SecretString::from(form.password))
        .await
    {
        add_breadcrumb("auth", "Signed in", None);
        return Redirect::to("/").into_response();
    }

    LoginTemplate {
        nav: state.nav(),
        view,
    }
    .into_response()
}

/// Display registration page.
#[instrument(skip(state))]
pub async fn register_page(State(state): State<AppState>) -> impl IntoResponse {
    RegisterTemplate {
        nav: state.nav(),
        view: RegisterView::new(state.view_context()),
        roles: &Role::ALL,
    }
}

/// Handle registration form submission.
#[instrument(skip(state, form), fields(email = %form.email, role = %form.role))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let role: Role = form
        .role
        .parse()
        .map_err(|e: multivendor_core::RoleError| AppError::BadRequest(e.to_string()))?;

    let mut view = RegisterView::new(state.view_context());
    view.submit(RegisterInput {
        email: form.email,
        password: SecretString::from(form.password),
        confirm_password: SecretString::from(form.confirm_password),
        role,
    })
    .await;
    state.finish(&view);

    Ok(RegisterTemplate {
        nav: state.nav(),
        view,
        roles: &Role::ALL,
    }
    .into_response())
}

/// Handle logout.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Redirect {
    state.session_writer().logout();
    add_breadcrumb("auth", "Signed out", None);
    Redirect::to("/")
}
