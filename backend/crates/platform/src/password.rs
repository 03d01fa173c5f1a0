//! Password Hashing and Verification
//!
//! - Argon2id hashing (memory-hard, PHC string format)
//! - Zeroization of clear text on drop
//! - Constant-time comparison inside the Argon2 verifier
//! - NFKC normalization before hashing or verifying

use std::fmt;
use std::sync::OnceLock;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,

    /// Blocking task panicked or was cancelled
    #[error("Password task failed: {0}")]
    TaskFailed(String),
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// - Does not implement `Clone`
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Wrap a raw password, applying NFKC normalization.
    ///
    /// No strength policy is enforced here; callers validate presence.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().nfkc().collect())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password using Argon2id with a fresh random salt
    pub fn hash(&self) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(OsRng);

        // OWASP defaults: m=19456 (19 MiB), t=2, p=1
        let hash = Argon2::default()
            .hash_password(self.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }

    /// Hash on the blocking pool
    pub async fn hash_blocking(self) -> Result<HashedPassword, PasswordHashError> {
        tokio::task::spawn_blocking(move || self.hash())
            .await
            .map_err(|e| PasswordHashError::TaskFailed(e.to_string()))?
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Verify on the blocking pool
    ///
    /// Passing `None` runs a verification against a fixed dummy digest and
    /// always yields `false`, so an unknown account costs the same as a
    /// wrong password.
    pub async fn verify_blocking(
        hash: Option<Self>,
        password: ClearTextPassword,
    ) -> Result<bool, PasswordHashError> {
        tokio::task::spawn_blocking(move || match hash {
            Some(hash) => Ok(hash.verify(&password)),
            None => {
                let dummy = dummy_hash()?;
                let _ = dummy.verify(&password);
                Ok(false)
            }
        })
        .await
        .map_err(|e| PasswordHashError::TaskFailed(e.to_string()))?
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

/// Digest used for timing equalization, computed once per process.
fn dummy_hash() -> Result<&'static HashedPassword, PasswordHashError> {
    static DUMMY: OnceLock<HashedPassword> = OnceLock::new();

    if let Some(hash) = DUMMY.get() {
        return Ok(hash);
    }
    let hash = ClearTextPassword::new("dummy-password-for-timing").hash()?;
    Ok(DUMMY.get_or_init(|| hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let password = ClearTextPassword::new("admin123");
        let hashed = password.hash().unwrap();

        assert!(hashed.as_phc_string().starts_with("$argon2id$"));
        assert!(hashed.verify(&password));

        let wrong = ClearTextPassword::new("wrong");
        assert!(!hashed.verify(&wrong));
    }

    #[test]
    fn test_same_password_different_salts() {
        let password = ClearTextPassword::new("admin123");
        let a = password.hash().unwrap();
        let b = password.hash().unwrap();

        assert_ne!(a.as_phc_string(), b.as_phc_string());
        assert!(a.verify(&password));
        assert!(b.verify(&password));
    }

    #[test]
    fn test_nfkc_normalization() {
        // Fullwidth digits normalize to ASCII digits
        let fullwidth = ClearTextPassword::new("admin１２３");
        let ascii = ClearTextPassword::new("admin123");

        let hashed = ascii.hash().unwrap();
        assert!(hashed.verify(&fullwidth));
    }

    #[test]
    fn test_from_phc_string() {
        let hashed = ClearTextPassword::new("admin123").hash().unwrap();
        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert_eq!(hashed, restored);

        assert!(matches!(
            HashedPassword::from_phc_string("not-a-hash"),
            Err(PasswordHashError::InvalidHashFormat)
        ));
    }

    #[test]
    fn test_debug_redacted() {
        let password = ClearTextPassword::new("secret_password");
        let debug = format!("{:?}", password);
        assert!(!debug.contains("secret_password"));
        assert!(debug.contains("REDACTED"));

        let hashed = password.hash().unwrap();
        assert!(!format!("{:?}", hashed).contains("argon2"));
    }

    #[tokio::test]
    async fn test_verify_blocking() {
        let hashed = ClearTextPassword::new("admin123")
            .hash_blocking()
            .await
            .unwrap();

        let ok = HashedPassword::verify_blocking(Some(hashed.clone()), ClearTextPassword::new("admin123"))
            .await
            .unwrap();
        assert!(ok);

        let bad = HashedPassword::verify_blocking(Some(hashed), ClearTextPassword::new("wrong"))
            .await
            .unwrap();
        assert!(!bad);

        let unknown = HashedPassword::verify_blocking(None, ClearTextPassword::new("admin123"))
            .await
            .unwrap();
        assert!(!unknown);
    }
}
