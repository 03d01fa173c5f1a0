//! Session token claims

use kernel::id::AdminUserId;
use serde::{Deserialize, Serialize};

/// Verified identity carried by a session token
///
/// Inserted into request extensions by the auth gate and echoed back by
/// `GET /auth/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminClaims {
    pub user_id: AdminUserId,
    pub username: String,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}
