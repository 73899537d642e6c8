// Preview gate: an injected authenticator in front of the preview renderer

use std::fmt;

use rowcheck_access::{Authenticator, Credentials, DenyAll, StaticAuthenticator};
use rowcheck_config::Settings;
use rowcheck_engine::RecordStore;
use rowcheck_io::preview::render_preview;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDenied;

impl fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Access denied: invalid ID or password")
    }
}

impl std::error::Error for AccessDenied {}

pub struct PreviewGate {
    authenticator: Box<dyn Authenticator>,
    row_limit: usize,
}

impl PreviewGate {
    pub fn new(authenticator: Box<dyn Authenticator>, row_limit: usize) -> Self {
        Self { authenticator, row_limit }
    }

    /// Static credentials from settings, or a gate nobody can open.
    pub fn from_settings(settings: &Settings) -> Result<Self, String> {
        let authenticator: Box<dyn Authenticator> =
            match (&settings.preview_identity, &settings.preview_secret_sha256) {
                (Some(id), Some(digest)) => Box::new(
                    StaticAuthenticator::from_hex_digest(id.as_str(), digest)
                        .map_err(|e| format!("preview.secretSha256: {e}"))?,
                ),
                _ => Box::new(DenyAll),
            };
        Ok(Self::new(authenticator, settings.preview_row_limit))
    }

    /// Render the preview if `credentials` are accepted.
    pub fn open(&self, credentials: &Credentials, store: &RecordStore) -> Result<String, AccessDenied> {
        let outcome = self.authenticator.authenticate(credentials);
        if !outcome.granted {
            return Err(AccessDenied);
        }
        Ok(render_preview(store, self.row_limit))
    }
}
