//! Admin User Entity

use chrono::{DateTime, Utc};
use kernel::id::AdminUserId;
use platform::password::HashedPassword;

/// The single privileged identity class allowed to mutate plots
///
/// The digest never leaves this type through any response DTO.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: AdminUserId,
    /// Unique login name
    pub username: String,
    /// Unique contact address
    pub email: String,
    pub password_hash: HashedPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Bootstrap identity written at startup (upsert keyed on `username`)
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password_hash: HashedPassword,
}
