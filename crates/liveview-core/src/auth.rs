//! Session token verification.
//!
//! The registry only needs an [`Authenticator`]. [`JwtAuthenticator`] is the
//! bundled implementation: it issues short JWTs carrying a random session id
//! and verifies them on connect and on every inbound message.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Verifies session tokens.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: &str) -> Result<(), AuthError>;
}

/// Issues fresh session tokens.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self) -> Result<String, AuthError>;
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Random id associated with the session.
    pub sid: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    /// Claims for a new session, expiring `ttl` from now.
    pub fn new(ttl: Duration) -> Self {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            sid: Uuid::new_v4(),
            iat: now,
            exp: now.saturating_add(ttl),
        }
    }
}

/// JWT-backed authenticator and issuer.
pub struct JwtAuthenticator {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuthenticator")
            .field("header", &self.header)
            .field("validation", &self.validation)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl JwtAuthenticator {
    /// HMAC-SHA256 with a shared secret.
    pub fn hs256(secret: &[u8], ttl: Duration) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::KeySetup("HS256 secret is empty".to_string()));
        }
        Ok(Self::with_keys(
            Algorithm::HS256,
            EncodingKey::from_secret(secret),
            DecodingKey::from_secret(secret),
            ttl,
        ))
    }

    /// RSA-SHA256 with a PEM key pair.
    pub fn rs256(private_pem: &[u8], public_pem: &[u8], ttl: Duration) -> Result<Self, AuthError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|e| AuthError::KeySetup(format!("private key: {e}")))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| AuthError::KeySetup(format!("public key: {e}")))?;
        Ok(Self::with_keys(Algorithm::RS256, encoding_key, decoding_key, ttl))
    }

    fn with_keys(
        algorithm: Algorithm,
        encoding_key: EncodingKey,
        decoding_key: DecodingKey,
        ttl: Duration,
    ) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.set_required_spec_claims(&["exp"]);
        Self {
            header: Header::new(algorithm),
            encoding_key,
            decoding_key,
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign arbitrary claims.
    pub fn sign(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        jsonwebtoken::encode(&self.header, claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Missing);
        }
        jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid(e.to_string()),
            })
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, token: &str) -> Result<(), AuthError> {
        self.verify(token).map(|_| ())
    }
}

impl TokenIssuer for JwtAuthenticator {
    fn issue(&self) -> Result<String, AuthError> {
        self.sign(&SessionClaims::new(self.ttl))
    }
}
