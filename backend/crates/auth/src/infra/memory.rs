//! In-Memory Repository
//!
//! Admin store keyed on username, for tests (this crate's and, via the
//! `test-support` feature, the server's).

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use kernel::id::AdminUserId;

use crate::domain::entity::admin_user::{AdminSeed, AdminUser};
use crate::domain::repository::AdminUserRepository;
use crate::error::AuthResult;

#[derive(Clone, Default)]
pub struct MemoryAdminRepository {
    users: Arc<Mutex<Vec<AdminUser>>>,
}

impl MemoryAdminRepository {
    pub fn len(&self) -> usize {
        self.users().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users().is_empty()
    }

    fn users(&self) -> MutexGuard<'_, Vec<AdminUser>> {
        self.users.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AdminUserRepository for MemoryAdminRepository {
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<AdminUser>> {
        Ok(self.users().iter().find(|u| u.username == username).cloned())
    }

    async fn upsert(&self, seed: &AdminSeed) -> AuthResult<AdminUser> {
        let mut users = self.users();
        let now = Utc::now();

        if let Some(existing) = users.iter_mut().find(|u| u.username == seed.username) {
            existing.password_hash = seed.password_hash.clone();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let user = AdminUser {
            id: AdminUserId::new(),
            username: seed.username.clone(),
            email: seed.email.clone(),
            password_hash: seed.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }
}
