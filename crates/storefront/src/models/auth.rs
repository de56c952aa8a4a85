//! Login and registration payloads.

use multivendor_core::Role;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

/// Body of `POST /login`.
#[derive(Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

/// Body of `POST /register`.
#[derive(Debug, Serialize)]
pub struct Registration {
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    pub role: Role,
}

/// Response of `POST /login`. The token is absent when credentials were refused
/// with a 2xx status.
#[derive(Debug, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Passwords leave the process only inside request bodies.
fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_credentials_wire_shape_and_debug() {
        let credentials = Credentials {
            email: "a@example.com".into(),
            password: SecretString::from("hunter2"),
        };
        assert_eq!(
            serde_json::to_value(&credentials).unwrap(),
            json!({"email": "a@example.com", "password": "hunter2"})
        );
        assert!(!format!("{credentials:?}").contains("hunter2"));
    }

    #[test]
    fn test_registration_role_is_lowercase() {
        let registration = Registration {
            email: "s@example.com".into(),
            password: SecretString::from("pw"),
            role: Role::Seller,
        };
        assert_eq!(serde_json::to_value(&registration).unwrap()["role"], "seller");
    }

    #[test]
    fn test_login_response_without_token() {
        let response: LoginResponse = serde_json::from_value(json!({"message": "nope"})).unwrap();
        assert!(response.token.is_none());
    }
}
