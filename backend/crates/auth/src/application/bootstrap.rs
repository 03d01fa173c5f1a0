//! Admin Bootstrap Use Case
//!
//! Ensures the configured admin identity exists with a fresh digest.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::domain::entity::admin_user::{AdminSeed, AdminUser};
use crate::domain::repository::AdminUserRepository;
use crate::error::AuthResult;

/// Configured admin identity
pub struct EnsureAdminInput {
    pub username: String,
    pub email: String,
    pub password: ClearTextPassword,
}

/// Hash the configured password and upsert the admin on every start
pub struct EnsureAdminUseCase<R>
where
    R: AdminUserRepository,
{
    repo: Arc<R>,
}

impl<R> EnsureAdminUseCase<R>
where
    R: AdminUserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: EnsureAdminInput) -> AuthResult<AdminUser> {
        let password_hash = input.password.hash_blocking().await?;

        let admin = self
            .repo
            .upsert(&AdminSeed {
                username: input.username,
                email: input.email,
                password_hash,
            })
            .await?;

        tracing::info!(
            username = %admin.username,
            email = %admin.email,
            "Admin user verified"
        );

        Ok(admin)
    }
}
