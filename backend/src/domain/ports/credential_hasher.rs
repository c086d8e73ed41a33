//! Port abstraction for password hashing.
//!
//! The account service depends on this trait rather than a concrete
//! algorithm so tests can use a deterministic hasher and the production
//! wiring can supply Argon2.

/// Failures raised by hashing adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialHashError {
    /// Hashing the plain-text password failed.
    #[error("password hashing failed: {message}")]
    Hash { message: String },

    /// The stored hash could not be parsed for verification.
    #[error("stored password hash is malformed: {message}")]
    MalformedHash { message: String },
}

impl CredentialHashError {
    /// Create a hash error with the given message.
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }

    /// Create a malformed-hash error with the given message.
    pub fn malformed_hash(message: impl Into<String>) -> Self {
        Self::MalformedHash {
            message: message.into(),
        }
    }
}

/// Domain port for hashing and verifying account passwords.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plain-text password into a storable string.
    fn hash(&self, password: &str) -> Result<String, CredentialHashError>;

    /// Verify a plain-text password against a stored hash. A mismatch is
    /// `Ok(false)`, never an error.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, CredentialHashError>;
}

/// Deterministic hasher for tests and dev mode. Not a real hash; never use
/// outside those contexts.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextHasher;

impl CredentialHasher for PlainTextHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialHashError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, CredentialHashError> {
        Ok(stored_hash == format!("plain:{password}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("password", "password", true)]
    #[case("password", "wrong", false)]
    fn plain_text_hasher_round_trips(
        #[case] stored: &str,
        #[case] attempt: &str,
        #[case] expected: bool,
    ) {
        let hasher = PlainTextHasher;
        let hash = hasher.hash(stored).expect("hash");
        assert_eq!(hasher.verify(attempt, &hash).expect("verify"), expected);
    }
}
