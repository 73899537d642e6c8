//! Access checks for the read-only data preview.
//!
//! The preview is gated by an [`Authenticator`] supplied by the caller. This
//! crate knows nothing about rows or validation; it only answers whether a
//! credential pair is accepted.
//!
//! No throttling, lockout or audit trail. Deployments exposing the preview to
//! real users should plug in a real identity provider behind the trait.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Identifier + secret pair presented by a caller.
#[derive(Clone)]
pub struct Credentials {
    pub identity: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self { identity: identity.into(), secret: secret.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthOutcome {
    pub granted: bool,
    /// Identity the grant was issued to. `None` when denied.
    pub identity: Option<String>,
}

impl AuthOutcome {
    pub fn granted(identity: impl Into<String>) -> Self {
        Self { granted: true, identity: Some(identity.into()) }
    }

    pub fn denied() -> Self {
        Self { granted: false, identity: None }
    }
}

pub trait Authenticator {
    fn authenticate(&self, credentials: &Credentials) -> AuthOutcome;
}

/// Used when no credentials are configured: nobody gets in.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl Authenticator for DenyAll {
    fn authenticate(&self, credentials: &Credentials) -> AuthOutcome {
        log::warn!("preview denied for '{}': no credentials configured", credentials.identity);
        AuthOutcome::denied()
    }
}

/// A single configured identity whose secret is stored as a SHA-256 digest.
#[derive(Clone)]
pub struct StaticAuthenticator {
    identity: String,
    secret_digest: [u8; 32],
}

impl fmt::Debug for StaticAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticAuthenticator")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl StaticAuthenticator {
    /// Build from a plaintext secret (hashed immediately).
    pub fn with_secret(identity: impl Into<String>, secret: &str) -> Self {
        Self { identity: identity.into(), secret_digest: digest(secret) }
    }

    /// Build from a hex-encoded SHA-256 digest, as stored in settings.
    pub fn from_hex_digest(identity: impl Into<String>, hex: &str) -> Result<Self, String> {
        Ok(Self { identity: identity.into(), secret_digest: decode_digest(hex)? })
    }
}

impl Authenticator for StaticAuthenticator {
    fn authenticate(&self, credentials: &Credentials) -> AuthOutcome {
        let provided = digest(&credentials.secret);
        // Both parts are always compared
        let id_ok = self.identity.as_bytes().ct_eq(credentials.identity.as_bytes());
        let secret_ok = self.secret_digest[..].ct_eq(&provided[..]);
        if bool::from(id_ok & secret_ok) {
            log::debug!("preview granted to '{}'", self.identity);
            AuthOutcome::granted(self.identity.clone())
        } else {
            log::warn!("preview denied for '{}'", credentials.identity);
            AuthOutcome::denied()
        }
    }
}

fn digest(secret: &str) -> [u8; 32] {
    Sha256::digest(secret.as_bytes()).into()
}

/// Lowercase hex SHA-256 of `secret`, the form stored in settings.
pub fn hash_secret(secret: &str) -> String {
    digest(secret).iter().map(|b| format!("{b:02x}")).collect()
}

fn decode_digest(hex: &str) -> Result<[u8; 32], String> {
    let hex = hex.trim();
    if hex.len() != 64 {
        return Err(format!("expected 64 hex characters, got {}", hex.len()));
    }
    let mut out = [0u8; 32];
    for (i, byte) in out.iter_mut().enumerate() {
        let pair = hex
            .get(i * 2..i * 2 + 2)
            .ok_or_else(|| "digest is not ASCII hex".to_string())?;
        *byte = u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte '{pair}'"))?;
    }
    Ok(out)
}
