//! Domain Layer
//!
//! Contains entities, token claims, and repository traits.

pub mod claims;
pub mod entity;
pub mod repository;

// Re-exports
pub use claims::AdminClaims;
pub use entity::admin_user::{AdminSeed, AdminUser};
pub use repository::AdminUserRepository;
