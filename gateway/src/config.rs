use std::fmt;

/// Gateway configuration
#[derive(Clone)]
pub struct GatewayConfig {
    /// HTTP listen address
    pub http_addr: String,

    /// Secret used to sign new tokens. Required at startup.
    pub jwt_secret: Option<String>,

    /// Secrets of earlier signing keys still accepted for verification, newest first
    pub jwt_previous_secrets: Vec<String>,

    /// Token lifetime in seconds
    pub token_ttl_secs: i64,

    /// Grace period after token expiry in seconds
    pub token_leeway_secs: i64,

    /// Seed user for the in-memory credential store
    pub username: String,
    pub password: String,

    /// Argon2 PHC hash for the seed user; takes precedence over `password`
    pub password_hash: Option<String>,

    /// Service version
    pub version: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            jwt_secret: None,
            jwt_previous_secrets: Vec::new(),
            token_ttl_secs: 3600,
            token_leeway_secs: 0,
            username: "user".to_string(),
            password: "password".to_string(),
            password_hash: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl GatewayConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("GATEWAY_HTTP_ADDR") {
            config.http_addr = addr;
        }

        if let Some(secret) = lookup("GATEWAY_JWT_SECRET") {
            config.jwt_secret = Some(secret);
        }

        if let Some(secrets) = lookup("GATEWAY_JWT_PREVIOUS_SECRETS") {
            config.jwt_previous_secrets = secrets
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(ttl) = lookup("GATEWAY_TOKEN_TTL_SECS") {
            if let Ok(n) = ttl.parse() {
                config.token_ttl_secs = n;
            }
        }

        if let Some(leeway) = lookup("GATEWAY_TOKEN_LEEWAY_SECS") {
            if let Ok(n) = leeway.parse() {
                config.token_leeway_secs = n;
            }
        }

        if let Some(username) = lookup("GATEWAY_USERNAME") {
            config.username = username;
        }

        if let Some(password) = lookup("GATEWAY_PASSWORD") {
            config.password = password;
        }

        if let Some(hash) = lookup("GATEWAY_PASSWORD_HASH") {
            config.password_hash = Some(hash);
        }

        config
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("http_addr", &self.http_addr)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_previous_secrets", &self.jwt_previous_secrets.len())
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("token_leeway_secs", &self.token_leeway_secs)
            .field("username", &self.username)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "[REDACTED]"))
            .field("version", &self.version)
            .finish()
    }
}
