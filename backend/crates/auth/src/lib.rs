//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Admin identity entity, token claims, repository trait
//! - `application/` - Login, admin bootstrap, token issuing/verification
//! - `infra/` - PostgreSQL implementation, in-memory test double
//! - `presentation/` - HTTP handlers, DTOs, router, auth gate middleware
//!
//! ## Security Model
//! - Passwords hashed with Argon2id; verification runs on the blocking pool
//! - Unknown usernames still pay for one digest verification
//! - Stateless HS256 bearer tokens, 24 hour absolute expiry, zero leeway
//! - No server-side revocation

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::token::TokenService;
pub use domain::claims::AdminClaims;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAdminRepository;
pub use presentation::middleware::{AuthGate, require_admin};
pub use presentation::router::{auth_router, auth_router_generic};

#[cfg(test)]
mod tests;
