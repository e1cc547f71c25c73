//! Access gatekeeping for the single admin account.
//!
//! Credentials arrive either as an HTTP Basic `Authorization` header or as
//! the `auth` cookie. The cookie is the same `username:password` pair in
//! base64 and is re-verified on every request; there is no session state.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::AuthError;
use crate::models::config::AuthConfig;

/// A username and password pair as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Parse an `Authorization: Basic <base64>` header value.
    pub fn from_authorization_header(value: &str) -> Result<Self, AuthError> {
        let (scheme, encoded) = value
            .trim()
            .split_once(' ')
            .ok_or_else(|| AuthError::Malformed("expected \"Basic <credentials>\"".to_string()))?;

        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(AuthError::Malformed(format!("unsupported scheme {:?}", scheme)));
        }

        Self::decode_pair(encoded.trim())
    }

    /// Base64 of `username:password`.
    pub fn encode_pair(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.username, self.password))
    }

    /// Decode base64 `username:password`. The password may contain ':'.
    pub fn decode_pair(encoded: &str) -> Result<Self, AuthError> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| AuthError::Malformed(format!("invalid base64: {}", e)))?;
        let pair = String::from_utf8(bytes)
            .map_err(|_| AuthError::Malformed("credentials are not valid UTF-8".to_string()))?;
        let (username, password) = pair
            .split_once(':')
            .ok_or_else(|| AuthError::Malformed("missing ':' separator".to_string()))?;
        Ok(Self::new(username, password))
    }
}

/// The browser-facing `auth` cookie.
pub struct AuthCookie;

impl AuthCookie {
    pub const NAME: &'static str = "auth";

    pub fn encode(credentials: &Credentials) -> String {
        credentials.encode_pair()
    }

    pub fn decode(value: &str) -> Result<Credentials, AuthError> {
        Credentials::decode_pair(value.trim())
    }
}

/// Verifies credentials against the configured admin account.
///
/// Only a salted SHA-256 digest of the password is kept in memory.
pub struct AccessGate {
    username: String,
    salt: String,
    password_hash: [u8; 32],
}

impl AccessGate {
    pub fn new(username: impl Into<String>, password: &str) -> Self {
        let salt = Uuid::new_v4().simple().to_string();
        let password_hash = hash_password(&salt, password);
        Self {
            username: username.into(),
            salt,
            password_hash,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.username.clone(), &config.password)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check a credential pair, returning the authenticated username.
    ///
    /// The password is only hashed once the username has matched.
    pub fn verify(&self, credentials: &Credentials) -> Result<String, AuthError> {
        if credentials.username != self.username {
            warn!("Authentication failed for unknown user {:?}", credentials.username);
            return Err(AuthError::InvalidCredentials);
        }

        let candidate = hash_password(&self.salt, &credentials.password);
        if !constant_time_eq(&candidate, &self.password_hash) {
            warn!("Authentication failed for {:?}: wrong password", credentials.username);
            return Err(AuthError::InvalidCredentials);
        }

        debug!("Authenticated {}", credentials.username);
        Ok(credentials.username.clone())
    }

    /// Verify an optional `Authorization` header value.
    pub fn verify_header(&self, header: Option<&str>) -> Result<String, AuthError> {
        let header = header.ok_or(AuthError::Missing)?;
        self.verify(&Credentials::from_authorization_header(header)?)
    }

    /// Verify an optional `auth` cookie value.
    pub fn verify_cookie(&self, cookie: Option<&str>) -> Result<String, AuthError> {
        let cookie = cookie.filter(|c| !c.trim().is_empty()).ok_or(AuthError::Missing)?;
        self.verify(&AuthCookie::decode(cookie)?)
    }

    /// Verify credentials and produce the cookie value for them.
    pub fn login(&self, credentials: &Credentials) -> Result<String, AuthError> {
        self.verify(credentials)?;
        Ok(AuthCookie::encode(credentials))
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

fn hash_password(salt: &str, password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
