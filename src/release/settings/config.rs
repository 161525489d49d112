//! Release credentials, validated once before anything runs.

use crate::release::error::{Error, Result};
use base64::Engine;

/// Codesigning identity for the app bundle and DMG.
pub const DEV_ID_APPLICATION: &str = "DEV_ID_APPLICATION";
/// App Store Connect API key id.
pub const AC_API_KEY_ID: &str = "AC_API_KEY_ID";
/// App Store Connect API key (.p8 content).
pub const AC_API_KEY: &str = "AC_API_KEY";
/// App Store Connect issuer id, only for Team API keys.
pub const AC_API_ISSUER_ID: &str = "AC_API_ISSUER_ID";
/// Sparkle EdDSA private key, base64.
pub const SPARKLE_PRIVATE_KEY: &str = "SPARKLE_PRIVATE_KEY";

/// Variables that must be set, in the order they are reported.
pub const REQUIRED_ENV: [&str; 4] = [
    DEV_ID_APPLICATION,
    AC_API_KEY_ID,
    AC_API_KEY,
    SPARKLE_PRIVATE_KEY,
];

/// Credentials for signing, notarization and update-feed signing.
#[derive(Clone)]
pub struct ReleaseConfig {
    /// Codesigning identity, e.g. "Developer ID Application: Name (TEAMID)"
    pub signing_identity: String,
    /// App Store Connect API key id
    pub api_key_id: String,
    /// App Store Connect API key material
    pub api_key: String,
    /// Issuer id for Team API keys
    pub api_issuer_id: Option<String>,
    /// Sparkle private key, trimmed
    pub sparkle_private_key: String,
}

impl std::fmt::Debug for ReleaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseConfig")
            .field("signing_identity", &self.signing_identity)
            .field("api_key_id", &self.api_key_id)
            .field("api_key", &"<redacted>")
            .field("api_issuer_id", &self.api_issuer_id)
            .field("sparkle_private_key", &"<redacted>")
            .finish()
    }
}

impl ReleaseConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary name lookup.
    ///
    /// Blank values count as missing. Every missing required name is reported
    /// in a single [`Error::MissingConfiguration`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let missing: Vec<&'static str> = REQUIRED_ENV
            .iter()
            .copied()
            .filter(|name| get(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingConfiguration { missing });
        }

        let required = |name: &'static str| {
            get(name).ok_or(Error::MissingConfiguration {
                missing: vec![name],
            })
        };

        let sparkle_private_key = required(SPARKLE_PRIVATE_KEY)?.trim().to_string();
        validate_sparkle_key(&sparkle_private_key)?;

        Ok(Self {
            signing_identity: required(DEV_ID_APPLICATION)?,
            api_key_id: required(AC_API_KEY_ID)?,
            api_key: required(AC_API_KEY)?,
            api_issuer_id: get(AC_API_ISSUER_ID),
            sparkle_private_key,
        })
    }
}

fn validate_sparkle_key(key: &str) -> Result<()> {
    if key.starts_with('"') || key.starts_with('\'') {
        return Err(Error::InvalidConfiguration {
            name: SPARKLE_PRIVATE_KEY,
            reason: "remove the surrounding quotes".to_string(),
        });
    }
    base64::engine::general_purpose::STANDARD
        .decode(key)
        .map_err(|e| Error::InvalidConfiguration {
            name: SPARKLE_PRIVATE_KEY,
            reason: format!("not valid base64: {e}"),
        })?;
    Ok(())
}
