//! Bearer token cache and local expiry check
//!
//! The token is an opaque JWT issued by the booking API. It is cached in a
//! single plain-text file between runs and replaced wholesale whenever the
//! `exp` claim says it is no longer usable. The signature is never verified;
//! the issuing server is trusted and only the expiry claim is of interest.

use std::path::PathBuf;

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::Result;

/// On-disk slot for the cached bearer token
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the cached token. Absent, unreadable, or blank files all read as
    /// "no token" - callers re-authenticate, they never see an error.
    pub fn load(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let token = contents.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    /// Replace the cached token. Writes a sibling temp file and renames it
    /// into place so a reader never observes a partial token.
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, token.trim())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&tmp)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&tmp, perms)?;
        }

        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Claims we care about from the token payload
#[derive(Deserialize)]
struct Claims {
    // Missing claim reads as the epoch, i.e. already expired
    #[serde(default)]
    exp: i64,
}

/// Extract the expiry instant from a JWT without verifying its signature.
/// Returns `None` if the token is not decodable at all.
pub fn expiry(token: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let payload = base64_decode_url(parts[1])?;
    let claims: Claims = serde_json::from_slice(&payload).ok()?;

    DateTime::from_timestamp(claims.exp, 0)
}

/// True if the token's `exp` claim is in the past, the claim is missing, or
/// the token cannot be decoded. Strictly `now > exp`, no refresh buffer.
pub fn is_expired(token: &str) -> bool {
    match expiry(token) {
        None => true,
        Some(exp) => Utc::now() > exp,
    }
}

/// Decode base64url with or without padding (JWT segments omit it)
fn base64_decode_url(input: &str) -> Option<Vec<u8>> {
    general_purpose::URL_SAFE_NO_PAD
        .decode(input.trim_end_matches('='))
        .ok()
}
