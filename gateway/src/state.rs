//! Shared application state.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use auth::{CredentialStore, InMemoryCredentialStore, JwtConfig, SigningKey, TokenService};

use crate::config::GatewayConfig;

/// State shared by every request. Read-only after startup.
pub struct AppState {
    pub tokens: TokenService,
    pub credentials: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(tokens: TokenService, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            tokens,
            credentials,
        }
    }

    /// Build the token service and seed the credential store from configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let secret = config
            .jwt_secret
            .as_deref()
            .context("GATEWAY_JWT_SECRET must be set")?;
        let primary = SigningKey::from_secret(secret).context("Invalid GATEWAY_JWT_SECRET")?;

        if config.token_ttl_secs <= 0 {
            bail!("GATEWAY_TOKEN_TTL_SECS must be positive, got {}", config.token_ttl_secs);
        }
        if config.token_leeway_secs < 0 {
            bail!(
                "GATEWAY_TOKEN_LEEWAY_SECS must not be negative, got {}",
                config.token_leeway_secs
            );
        }

        let jwt_config = JwtConfig::new(config.token_ttl_secs).with_leeway(config.token_leeway_secs);
        let mut tokens = TokenService::new(primary, jwt_config);
        for previous in &config.jwt_previous_secrets {
            let key = SigningKey::from_secret(previous)
                .context("Invalid entry in GATEWAY_JWT_PREVIOUS_SECRETS")?;
            tokens = tokens.with_previous_key(key);
        }

        let credentials = InMemoryCredentialStore::new()
            .and_then(|store| match &config.password_hash {
                Some(phc) => store.with_password_hash(config.username.as_str(), phc),
                None => store.with_user(config.username.as_str(), &config.password),
            })
            .context("Failed to seed credential store")?;

        tracing::info!(
            ttl_secs = tokens.config().ttl_secs,
            previous_keys = config.jwt_previous_secrets.len(),
            "token service ready"
        );

        Ok(Self::new(tokens, Arc::new(credentials)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secret_is_fatal() {
        let config = GatewayConfig::default();
        let err = AppState::from_config(&config).err().expect("expected failure");
        assert!(err.to_string().contains("GATEWAY_JWT_SECRET"));
    }

    fn config_with_secret() -> GatewayConfig {
        GatewayConfig {
            jwt_secret: Some("s3cret".to_string()),
            ..GatewayConfig::default()
        }
    }

    #[test]
    fn test_non_positive_ttl_is_fatal() {
        for ttl in [0, -60] {
            let config = GatewayConfig {
                token_ttl_secs: ttl,
                ..config_with_secret()
            };
            let err = AppState::from_config(&config).err().expect("expected failure");
            assert!(err.to_string().contains("GATEWAY_TOKEN_TTL_SECS"), "{}", err);
        }
    }

    #[test]
    fn test_negative_leeway_is_fatal() {
        let config = GatewayConfig {
            token_leeway_secs: -1,
            ..config_with_secret()
        };
        let err = AppState::from_config(&config).err().expect("expected failure");
        assert!(err.to_string().contains("GATEWAY_TOKEN_LEEWAY_SECS"), "{}", err);
    }

    #[test]
    fn test_bad_password_hash_is_internal_error() {
        let config = GatewayConfig {
            password_hash: Some("plaintext".to_string()),
            ..config_with_secret()
        };
        let err = AppState::from_config(&config).err().expect("expected failure");
        assert!(err.to_string().contains("Failed to seed credential store"));
        assert!(matches!(
            err.downcast_ref::<error::AppError>(),
            Some(error::AppError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_password_hash_seeds_store() {
        let config = GatewayConfig {
            password_hash: Some(auth::hash_password("from-hash").unwrap()),
            ..config_with_secret()
        };
        let state = AppState::from_config(&config).unwrap();
        assert_eq!(
            state.credentials.authenticate("user", "from-hash").await.unwrap(),
            "user"
        );
        assert!(state.credentials.authenticate("user", "password").await.is_err());
    }

    #[test]
    fn test_previous_secrets_verify() {
        let old = TokenService::new(
            SigningKey::from_secret("old-secret").unwrap(),
            JwtConfig::default(),
        );
        let token = old.issue("user").unwrap();

        let config = GatewayConfig {
            jwt_secret: Some("new-secret".to_string()),
            jwt_previous_secrets: vec!["old-secret".to_string()],
            ..GatewayConfig::default()
        };
        let state = AppState::from_config(&config).unwrap();
        assert_eq!(state.tokens.verify(token.as_str()).unwrap().name, "user");
    }
}
