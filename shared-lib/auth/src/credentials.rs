//! Username/password authentication.

use std::collections::HashMap;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use error::{AppError, AuthError};

/// Checks a username/password pair and yields the subject to put in a token.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError>;
}

/// In-memory credential store with argon2-hashed passwords.
pub struct InMemoryCredentialStore {
    users: HashMap<String, String>,
    // Verified against when the user is unknown so both paths cost one hash check.
    dummy_hash: String,
}

impl InMemoryCredentialStore {
    pub fn new() -> error::Result<Self> {
        Ok(Self {
            users: HashMap::new(),
            dummy_hash: hash_password("not-a-real-password")?,
        })
    }

    /// Register a user, hashing the password.
    pub fn with_user(self, username: impl Into<String>, password: &str) -> error::Result<Self> {
        let hash = hash_password(password)?;
        self.with_password_hash(username, &hash)
    }

    /// Register a user from an argon2 PHC string, so the plain password never
    /// has to reach this process.
    pub fn with_password_hash(
        mut self,
        username: impl Into<String>,
        phc: &str,
    ) -> error::Result<Self> {
        PasswordHash::new(phc)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        let username = username.into();
        tracing::debug!(username = %username, "registered user");
        self.users.insert(username, phc.to_string());
        Ok(self)
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let (stored, known) = match self.users.get(username) {
            Some(hash) => (hash.as_str(), true),
            None => (self.dummy_hash.as_str(), false),
        };

        let parsed = PasswordHash::new(stored).map_err(|e| {
            tracing::error!("Invalid stored password hash: {}", e);
            AuthError::InvalidCredentials
        })?;
        let matches = Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();

        if known && matches {
            Ok(username.to_string())
        } else {
            tracing::warn!(username, "authentication failed");
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Hash `password` into an argon2 PHC string with a fresh salt.
pub fn hash_password(password: &str) -> error::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}
