//! Session token issuing and verification (HS256)

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::id::AdminUserId;

use crate::application::config::AuthConfig;
use crate::domain::claims::AdminClaims;
use crate::error::{AuthError, AuthResult};

/// Signs and verifies session tokens with the configured secret
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            ttl_secs: config.token_ttl_secs(),
        }
    }

    /// Mint a token for `user_id` issued now
    pub fn issue(&self, user_id: AdminUserId, username: &str) -> AuthResult<(String, AdminClaims)> {
        self.issue_at(user_id, username, Utc::now())
    }

    /// Mint a token as if issued at `issued_at`
    pub fn issue_at(
        &self,
        user_id: AdminUserId,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> AuthResult<(String, AdminClaims)> {
        let iat = issued_at.timestamp();
        let claims = AdminClaims {
            user_id,
            username: username.to_string(),
            iat,
            exp: iat + self.ttl_secs,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("Token signing failed: {e}")))?;

        Ok((token, claims))
    }

    /// Check signature, payload shape, and expiry; no database lookup
    pub fn verify(&self, token: &str) -> AuthResult<AdminClaims> {
        decode::<AdminClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                AuthError::InvalidToken
            })
    }
}
