//! Session token configuration.

use serde::{Deserialize, Serialize};

/// Signing algorithm for session tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenAlgorithm {
    /// Shared secret (`auth.secret`).
    #[default]
    Hs256,
    /// RSA key pair (`auth.private_key_path` / `auth.public_key_path`, PEM).
    Rs256,
}

/// Token issuing and verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub algorithm: TokenAlgorithm,

    /// HMAC secret, usually `${LIVEVIEW_SECRET}`.
    #[serde(default)]
    pub secret: Option<String>,

    #[serde(default)]
    pub private_key_path: Option<String>,

    #[serde(default)]
    pub public_key_path: Option<String>,

    /// Lifetime of issued tokens.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            algorithm: TokenAlgorithm::default(),
            secret: None,
            private_key_path: None,
            public_key_path: None,
            token_ttl_secs: default_token_ttl(),
        }
    }
}

/// One week.
fn default_token_ttl() -> u64 {
    3600 * 24 * 7
}
