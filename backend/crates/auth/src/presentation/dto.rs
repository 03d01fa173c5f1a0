//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::claims::AdminClaims;
use crate::domain::entity::admin_user::AdminUser;

// ============================================================================
// Login
// ============================================================================

/// Login request
///
/// Fields are optional at the serde level so that absence is reported as a
/// per-field validation detail rather than a parser error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Both fields must be present and non-empty
    pub fn validate(self) -> Result<(String, String), Vec<String>> {
        let mut details = Vec::new();

        let username = required("username", self.username, &mut details);
        let password = required("password", self.password, &mut details);

        match (username, password) {
            (Some(username), Some(password)) if details.is_empty() => Ok((username, password)),
            _ => Err(details),
        }
    }
}

fn required(field: &str, value: Option<String>, details: &mut Vec<String>) -> Option<String> {
    match value {
        None => {
            details.push(format!("\"{field}\" is required"));
            None
        }
        Some(v) if v.is_empty() => {
            details.push(format!("\"{field}\" is not allowed to be empty"));
            None
        }
        Some(v) => Some(v),
    }
}

/// Public view of the admin (never includes the digest)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserView {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<&AdminUser> for AdminUserView {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Login response
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: &'static str,
    pub token: String,
    pub user: AdminUserView,
}

// ============================================================================
// Verify
// ============================================================================

/// Token verification response
#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: AdminClaims,
}
