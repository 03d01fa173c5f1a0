//! Login Use Case
//!
//! Authenticates the admin and mints a session token.

use std::sync::Arc;

use platform::password::{ClearTextPassword, HashedPassword};

use crate::application::token::TokenService;
use crate::domain::entity::admin_user::AdminUser;
use crate::domain::repository::AdminUserRepository;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub username: String,
    pub password: ClearTextPassword,
}

/// Login output
pub struct LoginOutput {
    /// Signed session token
    pub token: String,
    pub user: AdminUser,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: AdminUserRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R> LoginUseCase<R>
where
    R: AdminUserRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let user = self.repo.find_by_username(&input.username).await?;

        // An unknown username still runs one verification
        let digest = user.as_ref().map(|u| u.password_hash.clone());
        let password_valid = HashedPassword::verify_blocking(digest, input.password).await?;

        let user = match user {
            Some(user) if password_valid => user,
            _ => return Err(AuthError::InvalidCredentials),
        };

        let (token, _claims) = self.tokens.issue(user.id, &user.username)?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "Admin signed in"
        );

        Ok(LoginOutput { token, user })
    }
}
