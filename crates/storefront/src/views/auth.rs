//! Login and registration forms.

use multivendor_core::{Email, Role};
use secrecy::{ExposeSecret, SecretString};

use super::{View, ViewContext, ViewState};
use crate::api::{ApiError, NETWORK_ERROR_MESSAGE};
use crate::models::{Credentials, Registration};
use crate::session::SessionWriter;

/// 2xx login response without a token.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Login failed: Invalid credentials";

/// Login refused with an error status.
pub const CHECK_CREDENTIALS_MESSAGE: &str = "Login failed. Please check your credentials.";

/// Email/password login form.
pub struct LoginView {
    ctx: ViewContext,
    /// Email as typed, kept so a failed attempt does not clear it.
    pub email: String,
    pub state: ViewState<()>,
}

impl LoginView {
    #[must_use]
    pub const fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            email: String::new(),
            state: ViewState::Idle,
        }
    }

    /// Send the credentials; on a token, sign in through `writer`.
    ///
    /// Returns `true` when the shopper is now signed in.
    pub async fn submit(&mut self, writer: &SessionWriter, email: &str, password: SecretString) -> bool {
        self.email = email.trim().to_string();
        self.state = ViewState::Loading;

        let credentials = Credentials {
            email: self.email.clone(),
            password,
        };

        match self.ctx.api().login(&credentials).await {
            Ok(response) => match response.token.filter(|t| !t.trim().is_empty()) {
                Some(token) => {
                    writer.login(SecretString::from(token));
                    self.state = ViewState::Success(());
                    true
                }
                None => {
                    self.state = ViewState::Error(INVALID_CREDENTIALS_MESSAGE.to_string());
                    false
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                let message = match e {
                    ApiError::Network(_) => NETWORK_ERROR_MESSAGE,
                    _ => CHECK_CREDENTIALS_MESSAGE,
                };
                self.state = ViewState::Error(message.to_string());
                false
            }
        }
    }
}

impl View for LoginView {
    fn context(&self) -> &ViewContext {
        &self.ctx
    }
}

/// Fields of the registration form.
pub struct RegisterInput {
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub role: Role,
}

/// Account registration form.
pub struct RegisterView {
    ctx: ViewContext,
    pub email: String,
    pub role: Role,
    pub state: ViewState<String>,
}

impl RegisterView {
    #[must_use]
    pub const fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            email: String::new(),
            role: Role::Buyer,
            state: ViewState::Idle,
        }
    }

    /// Check the form and create the account.
    ///
    /// Mismatched passwords and malformed emails are rejected without a
    /// request.
    pub async fn submit(&mut self, input: RegisterInput) {
        self.email = input.email.trim().to_string();
        self.role = input.role;

        let email = match Email::parse(&self.email) {
            Ok(email) => email,
            Err(e) => {
                self.state = ViewState::Error(format!("Please enter a valid email address ({e})."));
                return;
            }
        };
        if input.password.expose_secret().is_empty() {
            self.state = ViewState::Error("Please choose a password.".to_string());
            return;
        }
        if input.password.expose_secret() != input.confirm_password.expose_secret() {
            self.state = ViewState::Error("Passwords do not match.".to_string());
            return;
        }

        self.state = ViewState::Loading;
        let registration = Registration {
            email: email.into_inner(),
            password: input.password,
            role: input.role,
        };

        self.state = match self.ctx.api().register(&registration).await {
            Ok(_) => {
                tracing::info!(role = %registration.role, "Account registered");
                ViewState::Success("Registration successful! You can now sign in.".to_string())
            }
            Err(e) => ViewState::Error(self.ctx.failure(&e, "Registration failed. Please try again.")),
        };
    }
}

impl View for RegisterView {
    fn context(&self) -> &ViewContext {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::Harness;

    #[tokio::test]
    async fn test_login_network_error_message() {
        let harness = Harness::signed_out();
        let mut view = LoginView::new(harness.context());

        let signed_in = view
            .submit(&harness.store.writer(), " a@example.com ", SecretString::from("pw"))
            .await;

        assert!(!signed_in);
        assert_eq!(view.email, "a@example.com");
        assert_eq!(view.state.error(), Some(NETWORK_ERROR_MESSAGE));
        assert!(!harness.store.reader().is_authenticated());
    }

    #[tokio::test]
    async fn test_register_rejects_mismatched_passwords_locally() {
        let harness = Harness::signed_out();
        let mut view = RegisterView::new(harness.context());

        view.submit(RegisterInput {
            email: "new@example.com".into(),
            password: SecretString::from("one"),
            confirm_password: SecretString::from("two"),
            role: Role::Seller,
        })
        .await;

        assert_eq!(view.state.error(), Some("Passwords do not match."));
        assert_eq!(view.role, Role::Seller);
    }

    #[tokio::test]
    async fn test_register_rejects_bad_email_locally() {
        let harness = Harness::signed_out();
        let mut view = RegisterView::new(harness.context());

        view.submit(RegisterInput {
            email: "not-an-email".into(),
            password: SecretString::from("pw"),
            confirm_password: SecretString::from("pw"),
            role: Role::Buyer,
        })
        .await;

        assert!(view.state.error().is_some_and(|m| m.starts_with("Please enter a valid email")));
    }
}
