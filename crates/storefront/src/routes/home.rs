//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::state::AppState;
use crate::views::{HomeView, NavBar};

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: NavBar,
    pub view: HomeView,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let mut view = HomeView::new(state.view_context());
    view.load().await;
    state.finish(&view);

    HomeTemplate {
        nav: state.nav(),
        view,
    }
}
