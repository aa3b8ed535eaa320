//! Authentication and authorization library for the inventory API.
//!
//! This crate issues and verifies signed bearer tokens and checks
//! username/password credentials at login.

mod claims;
mod credentials;
mod token;

pub use claims::{Identity, Role, TokenClaims};
pub use credentials::{hash_password, CredentialStore, InMemoryCredentialStore};
pub use token::{JwtConfig, SigningKey, Token, TokenService};
