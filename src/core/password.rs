//! Password hashing and verification

use anyhow::{Result, anyhow};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::LazyLock;

/// Hash a plaintext password into a PHC-format argon2 digest.
pub fn hash(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {e}"))?;

    Ok(digest.to_string())
}

/// Verify a plaintext password against a stored digest.
pub fn verify(plaintext: &str, digest: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(digest).map_err(|e| anyhow!("Invalid password hash: {e}"))?;

    Ok(Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok())
}

static SHAM_DIGEST: LazyLock<Option<String>> =
    LazyLock::new(|| hash("storefront-sham-credential").ok());

/// Burn a verification against a fixed digest.
///
/// Used on the unknown-account path so a lookup miss takes as long as a
/// real failed check; the result is always discarded.
pub fn verify_sham(plaintext: &str) {
    if let Some(digest) = SHAM_DIGEST.as_ref() {
        let _ = verify(plaintext, digest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let digest = hash("hunter2!").unwrap();

        assert!(verify("hunter2!", &digest).unwrap());
        assert!(!verify("hunter3!", &digest).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash("same-password").unwrap();
        let b = hash("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_digest_is_an_error() {
        assert!(verify("whatever", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_sham_verification_does_not_panic() {
        verify_sham("anything");
    }
}
