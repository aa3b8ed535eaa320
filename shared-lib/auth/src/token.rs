//! Token issuance and verification (HS256 JWT).

use std::fmt;

use error::AuthError;
use hmac::{Hmac, Mac};
use jwt::{Header, SignWithKey, Token as JwtToken, Unverified, VerifyWithKey};
use sha2::Sha256;

use crate::claims::{Identity, TokenClaims};

type HmacSha256 = Hmac<Sha256>;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Token validity duration in seconds
    pub ttl_secs: i64,
    /// Grace period applied after `exp` when verifying
    pub leeway_secs: i64,
}

impl JwtConfig {
    /// Create a new JWT configuration.
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            ttl_secs,
            leeway_secs: 0,
        }
    }

    /// Set the verification leeway.
    pub fn with_leeway(mut self, secs: i64) -> Self {
        self.leeway_secs = secs;
        self
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::new(3600)
    }
}

/// Secret HMAC-SHA256 key used to sign and check tokens.
#[derive(Clone)]
pub struct SigningKey {
    mac: HmacSha256,
}

impl SigningKey {
    /// Build a key from raw secret bytes. Empty secrets are rejected.
    pub fn from_secret(secret: impl AsRef<[u8]>) -> Result<Self, AuthError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(AuthError::InvalidSigningKey);
        }
        let mac = HmacSha256::new_from_slice(secret).map_err(|e| {
            tracing::error!("Failed to create HMAC key: {}", e);
            AuthError::InvalidSigningKey
        })?;
        Ok(Self { mac })
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}

/// A signed, self-contained bearer token in compact JWS form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues and verifies tokens. Sole holder of the signing keys.
///
/// Keys are ordered newest first: the first key signs, every key is tried
/// when verifying so tokens signed before a rotation stay valid until they
/// expire. The service is immutable after construction and can be shared
/// freely across requests.
#[derive(Debug, Clone)]
pub struct TokenService {
    keys: Vec<SigningKey>,
    config: JwtConfig,
}

impl TokenService {
    pub fn new(key: SigningKey, config: JwtConfig) -> Self {
        Self {
            keys: vec![key],
            config,
        }
    }

    /// Accept tokens signed by an older key. Keys added later are tried later.
    pub fn with_previous_key(mut self, key: SigningKey) -> Self {
        self.keys.push(key);
        self
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Issue a token for `subject`, valid for the configured TTL from now.
    pub fn issue(&self, subject: &str) -> Result<Token, AuthError> {
        self.issue_at(subject, chrono::Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (Unix seconds).
    pub fn issue_at(&self, subject: &str, now: i64) -> Result<Token, AuthError> {
        let claims = TokenClaims::new(subject, now, self.config.ttl_secs).ok_or_else(|| {
            tracing::error!(ttl_secs = self.config.ttl_secs, "Token expiry overflows");
            AuthError::TokenCreationFailed
        })?;
        let exp = claims.exp;
        let token = claims.sign_with_key(&self.keys[0].mac).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            AuthError::TokenCreationFailed
        })?;

        tracing::debug!(subject, exp, "issued token");
        Ok(Token(token))
    }

    /// Verify `token` against the current wall clock.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Verify `token` as if the current time were `now` (Unix seconds).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Identity, AuthError> {
        // Structure first, so that a bad signature is never confused with garbage input.
        JwtToken::<Header, TokenClaims, Unverified>::parse_unverified(token).map_err(|e| {
            tracing::debug!("Malformed JWT: {}", e);
            AuthError::MalformedToken
        })?;

        let claims = self
            .keys
            .iter()
            .find_map(|key| {
                let verified: Result<TokenClaims, _> = token.verify_with_key(&key.mac);
                verified.ok()
            })
            .ok_or_else(|| {
                tracing::warn!("JWT signature did not match any signing key");
                AuthError::InvalidSignature
            })?;

        if claims.is_expired_at(now, self.config.leeway_secs) {
            tracing::debug!(subject = %claims.sub, exp = claims.exp, now, "expired JWT");
            return Err(AuthError::TokenExpired);
        }

        Ok(Identity::with_default_roles(claims.sub))
    }
}
