//! Profile page.

use super::{View, ViewContext, ViewState};
use crate::models::Profile;

/// Shows the shopper's profile and saves edits to it.
pub struct ProfileView {
    ctx: ViewContext,
    pub profile: ViewState<Profile>,
    /// Outcome of the last save.
    pub update: ViewState<String>,
}

impl ProfileView {
    #[must_use]
    pub const fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            profile: ViewState::Idle,
            update: ViewState::Idle,
        }
    }

    pub async fn load(&mut self) {
        self.profile = ViewState::Loading;
        let token = self.ctx.token();
        self.profile = match self.ctx.api().fetch_profile(token.as_ref()).await {
            Ok(profile) => ViewState::Success(profile),
            Err(e) => ViewState::Error(self.ctx.failure(&e, "Failed to load profile")),
        };
    }

    /// Save `profile`; the service's copy replaces the shown one.
    pub async fn submit(&mut self, profile: Profile) {
        self.update = ViewState::Loading;
        let token = self.ctx.token();
        match self.ctx.api().update_profile(token.as_ref(), &profile).await {
            Ok(saved) => {
                self.profile = ViewState::Success(saved);
                self.update = ViewState::Success("Profile updated successfully!".to_string());
            }
            Err(e) => {
                self.profile = ViewState::Success(profile);
                self.update = ViewState::Error(self.ctx.failure(&e, "Failed to update profile"));
            }
        }
    }
}

impl View for ProfileView {
    fn context(&self) -> &ViewContext {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::Harness;

    #[tokio::test]
    async fn test_failed_save_keeps_typed_values() {
        let harness = Harness::signed_out();
        let mut view = ProfileView::new(harness.context());
        let typed = Profile {
            name: "Ada".into(),
            ..Profile::default()
        };

        view.submit(typed.clone()).await;

        assert_eq!(view.profile.value(), Some(&typed));
        assert!(view.update.error().is_some());
        assert!(view.context().auth_failed());
    }
}
