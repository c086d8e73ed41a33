//! Argon2 implementation of the credential hashing port.

use argon2::password_hash::{PasswordHash, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHasher};
use rand_core::OsRng;

use crate::domain::ports::{CredentialHashError, CredentialHasher};

/// Argon2id hasher producing PHC-format hash strings.
///
/// Uses the `argon2` crate defaults (Argon2id v19). Parameters are encoded
/// in the stored hash, so they can be tightened later without invalidating
/// existing credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, CredentialHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| CredentialHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, CredentialHashError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|err| CredentialHashError::malformed_hash(err.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(CredentialHashError::malformed_hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("correct horse").expect("hash");
        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("correct horse", &hash).expect("verify"));
        assert!(!hasher.verify("battery staple", &hash).expect("verify"));
    }

    #[test]
    fn same_password_hashes_differently_per_salt() {
        let hasher = Argon2Hasher;
        let first = hasher.hash("secret").expect("hash");
        let second = hasher.hash("secret").expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn garbage_stored_hash_is_an_error_not_a_mismatch() {
        let hasher = Argon2Hasher;
        let err = hasher
            .verify("secret", "not-a-phc-string")
            .expect_err("malformed hash");
        assert!(matches!(err, CredentialHashError::MalformedHash { .. }));
    }
}
