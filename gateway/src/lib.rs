//! Inventory gateway library
//!
//! HTTP front door of the inventory API: credential login, bearer-token
//! authentication and the protected route table.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod state;

pub use config::GatewayConfig;
pub use middleware::{authentication_gate, require_identity, Authenticated};
pub use response::ApiError;
pub use router::build_router;
pub use state::AppState;
