//! Argon2id hashing for the email + password login path.
//!
//! Hashes are stored and compared as PHC-format strings
//! (e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::auth::AuthError;

/// Hash a password with a fresh random salt. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC-format hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::InvalidPasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("hunter42").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter42", &hash).unwrap());
        assert!(!verify_password("hunter43", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        // Fresh salt per call
        let a = hash_password("hunter42").unwrap();
        let b = hash_password("hunter42").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        let err = verify_password("hunter42", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AuthError::InvalidPasswordHash(_)));
    }
}
