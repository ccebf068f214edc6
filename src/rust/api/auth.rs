use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::warn;
use sha2::{Digest, Sha256};

use super::error::ApiError;
use super::AppState;

/// The single admin account allowed to read model metadata.
///
/// Only SHA-256 digests are kept; comparisons run over the full digest so the
/// time taken does not depend on where the inputs differ.
#[derive(Clone)]
pub struct AdminCredentials {
    user_digest: [u8; 32],
    password_digest: [u8; 32],
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminCredentials(..)")
    }
}

impl AdminCredentials {
    pub fn new(user: &str, password: &str) -> Self {
        Self {
            user_digest: digest(user),
            password_digest: digest(password),
        }
    }

    pub fn verify(&self, user: &str, password: &str) -> bool {
        let user_ok = constant_time_eq(&digest(user), &self.user_digest);
        let password_ok = constant_time_eq(&digest(password), &self.password_digest);
        user_ok & password_ok
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Extracts `(user, password)` from an `Authorization: Basic ...` header.
pub(crate) fn parse_basic(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Extractor that admits only requests carrying the admin credentials.
#[derive(Debug)]
pub struct AdminUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (user, password) = parse_basic(&parts.headers).ok_or(ApiError::Unauthorized)?;
        if !state.credentials.verify(&user, &password) {
            warn!("Rejected credentials for user '{}' on {}", user, parts.uri.path());
            return Err(ApiError::Unauthorized);
        }
        Ok(AdminUser(user))
    }
}
