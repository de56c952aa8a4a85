//! Home page.

use crate::models::Profile;
use crate::session::SessionUser;

use super::roles::{self, FeatureCard};
use super::{View, ViewContext, ViewState};

/// Landing page: login/register for guests, profile and feature cards for
/// signed-in shoppers.
pub struct HomeView {
    ctx: ViewContext,
    pub signed_in: bool,
    pub user: Option<SessionUser>,
    pub profile: ViewState<Profile>,
    pub tagline: &'static str,
    pub features: Vec<FeatureCard>,
}

impl HomeView {
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        let session = ctx.session().snapshot();
        let role = session.role();
        Self {
            signed_in: session.is_authenticated(),
            user: session.user().cloned(),
            profile: ViewState::Idle,
            tagline: roles::tagline(role),
            features: if session.is_authenticated() {
                roles::home_features(role)
            } else {
                Vec::new()
            },
            ctx,
        }
    }

    /// Load the profile of a signed-in shopper. Guests load nothing.
    pub async fn load(&mut self) {
        if !self.signed_in {
            return;
        }

        self.profile = ViewState::Loading;
        let token = self.ctx.token();
        self.profile = match self.ctx.api().fetch_profile(token.as_ref()).await {
            Ok(profile) => ViewState::Success(profile),
            Err(e) => ViewState::Error(self.ctx.failure(&e, "Failed to fetch profile")),
        };
    }
}

impl View for HomeView {
    fn context(&self) -> &ViewContext {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use multivendor_core::Role;

    use super::*;
    use crate::views::testing::Harness;

    #[tokio::test]
    async fn test_guest_home_makes_no_request() {
        let harness = Harness::signed_out();
        let mut view = HomeView::new(harness.context());
        view.load().await;

        assert!(!view.signed_in);
        assert!(view.features.is_empty());
        assert!(view.profile.is_idle());
    }

    #[test]
    fn test_seller_home_features() {
        let harness = Harness::signed_in("seller");
        let view = HomeView::new(harness.context());

        assert_eq!(view.user.as_ref().map(|u| u.role), Some(Role::Seller));
        assert_eq!(view.tagline, "Manage your seller dashboard");
        assert_eq!(view.features.first().map(|c| c.link), Some("/add-product"));
    }

    #[tokio::test]
    async fn test_profile_failure_is_an_error_state() {
        let harness = Harness::signed_in("buyer");
        let mut view = HomeView::new(harness.context());
        view.load().await;

        assert!(view.profile.error().is_some_and(|m| !m.is_empty()));
        assert!(!view.context().auth_failed());
    }
}
