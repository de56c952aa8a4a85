//! Navigation bar shown on every page.

use crate::session::SessionReader;

/// What the nav bar shows: the signed-in email with a logout button, or the
/// login and register links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavBar {
    pub signed_in: bool,
    pub email: Option<String>,
}

impl NavBar {
    /// Read the current session.
    #[must_use]
    pub fn from_session(session: &SessionReader) -> Self {
        let snapshot = session.snapshot();
        Self {
            signed_in: snapshot.is_authenticated(),
            email: snapshot.user().map(|user| user.email.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::Harness;

    #[test]
    fn test_nav_bar_follows_session() {
        let harness = Harness::signed_out();
        assert_eq!(NavBar::from_session(&harness.store.reader()), NavBar::default());

        harness.store.writer().login(secrecy::SecretString::from("opaque"));
        let nav = NavBar::from_session(&harness.store.reader());
        assert!(nav.signed_in);
        assert_eq!(nav.email, None);

        let harness = Harness::signed_in("buyer");
        let nav = NavBar::from_session(&harness.store.reader());
        assert_eq!(nav.email.as_deref(), Some("buyer@example.com"));
    }
}
