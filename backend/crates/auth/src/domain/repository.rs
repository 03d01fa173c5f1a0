//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::admin_user::{AdminSeed, AdminUser};
use crate::error::AuthResult;

/// Admin user repository trait
#[trait_variant::make(AdminUserRepository: Send)]
pub trait LocalAdminUserRepository {
    /// Find admin by exact username
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<AdminUser>>;

    /// Insert the admin, or refresh its digest if the username exists
    async fn upsert(&self, seed: &AdminSeed) -> AuthResult<AdminUser>;
}
