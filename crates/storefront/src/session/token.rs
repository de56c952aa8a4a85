//! Reading the identity carried by a session token.
//!
//! The auth service issues JWTs. The storefront never verifies them (it has
//! no key and the backends do that on every request); it only reads the
//! payload to learn who is signed in and in which role.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use multivendor_core::{Email, Role};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when reading a token payload.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token is not three dot-separated segments.
    #[error("token is not a JWT")]
    Format,

    /// The payload segment is not base64url.
    #[error("token payload is not base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The payload is not a JSON object of the expected shape.
    #[error("token payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Identity claims read from a token payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub email: Option<Email>,
    pub role: Option<Role>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RawClaims {
    email: Option<String>,
    role: Option<String>,
    exp: Option<i64>,
}

/// Decode the payload of a JWT without verifying its signature.
///
/// Claims that are present but unusable (an email that does not parse, an
/// unknown role) come back as `None` rather than failing the whole token.
///
/// # Errors
///
/// Returns an error if the token is not a JWT or its payload cannot be
/// decoded.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Format);
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    let raw: RawClaims = serde_json::from_slice(&bytes)?;

    Ok(TokenClaims {
        email: raw.email.as_deref().and_then(|e| Email::parse(e).ok()),
        role: raw.role.as_deref().and_then(|r| r.parse().ok()),
        expires_at: raw.exp.and_then(|secs| DateTime::from_timestamp(secs, 0)),
    })
}

/// Build an unsigned JWT carrying `claims`.
///
/// Used by tests and the fake backend; never by production paths.
#[doc(hidden)]
#[must_use]
pub fn unsigned_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}
