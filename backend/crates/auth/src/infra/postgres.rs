//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::AdminUserId;
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::admin_user::{AdminSeed, AdminUser};
use crate::domain::repository::AdminUserRepository;
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed admin repository
#[derive(Clone)]
pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `admin_users` table if it does not exist
    pub async fn ensure_schema(&self) -> AuthResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS admin_users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                username VARCHAR(50) UNIQUE NOT NULL,
                email VARCHAR(100) UNIQUE NOT NULL,
                password_hash VARCHAR(255) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl AdminUserRepository for PgAdminRepository {
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<AdminUser>> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r#"
            SELECT
                id,
                username,
                email,
                password_hash,
                created_at,
                updated_at
            FROM admin_users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_admin()).transpose()
    }

    async fn upsert(&self, seed: &AdminSeed) -> AuthResult<AdminUser> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r#"
            INSERT INTO admin_users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username) DO UPDATE SET
                password_hash = EXCLUDED.password_hash,
                updated_at = NOW()
            RETURNING
                id,
                username,
                email,
                password_hash,
                created_at,
                updated_at
            "#,
        )
        .bind(AdminUserId::new().into_uuid())
        .bind(&seed.username)
        .bind(&seed.email)
        .bind(seed.password_hash.as_phc_string())
        .fetch_one(&self.pool)
        .await?;

        row.into_admin()
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AdminUserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AdminUserRow {
    fn into_admin(self) -> AuthResult<AdminUser> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password_hash: {}", e)))?;

        Ok(AdminUser {
            id: AdminUserId::from_uuid(self.id),
            username: self.username,
            email: self.email,
            password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
