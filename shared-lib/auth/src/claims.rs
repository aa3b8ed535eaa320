//! JWT claims, roles and the verified identity.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Capabilities a verified principal can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user
    User,
    /// Administrator with full access
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (principal name)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    /// Create claims for `subject` issued at `now` and valid for `ttl_secs`.
    ///
    /// Returns `None` when the expiry does not fit in a timestamp.
    pub fn new(subject: impl Into<String>, now: i64, ttl_secs: i64) -> Option<Self> {
        Some(Self {
            sub: subject.into(),
            iat: now,
            exp: now.checked_add(ttl_secs)?,
        })
    }

    /// A token is live while `now` is strictly before `exp + leeway_secs`.
    pub fn is_expired_at(&self, now: i64, leeway_secs: i64) -> bool {
        now >= self.exp.saturating_add(leeway_secs)
    }
}

/// A verified principal: who the caller is and what they may do.
///
/// Lives in the extensions of a single request and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "username")]
    pub name: String,
    pub roles: BTreeSet<Role>,
}

impl Identity {
    pub fn new(name: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            name: name.into(),
            roles: roles.into_iter().collect(),
        }
    }

    /// Identity carrying the capability set every verified token receives.
    pub fn with_default_roles(name: impl Into<String>) -> Self {
        Self::new(name, [Role::default()])
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
