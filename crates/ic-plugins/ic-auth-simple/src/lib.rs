//! # ic-auth-simple
//!
//! Argon2-based implementation of `AuthProvider`.
//! Stored hashes are PHC strings, so parameters travel with each hash.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use ic_core::error::{AppError, Result};
use ic_core::traits::AuthProvider;

/// Salt length in bytes before base64 encoding.
const SALT_LEN: usize = 16;

#[derive(Default)]
pub struct SimpleAuthProvider {
    argon2: Argon2<'static>,
}

impl SimpleAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthProvider for SimpleAuthProvider {
    fn hash_password(&self, password: &str) -> Result<String> {
        let mut bytes = [0u8; SALT_LEN];
        getrandom::getrandom(&mut bytes)
            .map_err(|e| AppError::Internal(format!("salt generation failed: {e}")))?;
        let salt = SaltString::encode_b64(&bytes)
            .map_err(|e| AppError::Internal(format!("salt encoding failed: {e}")))?;

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
    }

    /// Verifies if a provided password matches a stored Argon2 hash.
    /// A malformed hash never verifies.
    fn verify_password(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is malformed");
                return false;
            }
        };
        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let auth = SimpleAuthProvider::new();
        let hash = auth.hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(auth.verify_password("correct horse", &hash));
        assert!(!auth.verify_password("wrong horse", &hash));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let auth = SimpleAuthProvider::new();
        let a = auth.hash_password("hunter22").unwrap();
        let b = auth.hash_password("hunter22").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_hash_does_not_verify() {
        assert!(!SimpleAuthProvider::new().verify_password("anything", "not-a-phc-string"));
    }
}
