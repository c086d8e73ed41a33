//! Authentication primitives: login credentials and registration payloads.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to the account
//! service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::user::{DisplayName, EmailAddress, UserValidationError};

/// Minimum accepted password length at registration.
pub const PASSWORD_MIN: usize = 6;
/// Maximum accepted password length at registration.
pub const PASSWORD_MAX: usize = 128;

/// Domain error returned when an auth payload is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// Email failed the address checks.
    Email(UserValidationError),
    /// Display name failed the name checks.
    Name(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Password fell outside the accepted length range.
    PasswordLength { min: usize, max: usize },
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) | Self::Name(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordLength { min, max } => {
                write!(f, "password must be between {min} and {max} characters")
            }
        }
    }
}

impl std::error::Error for AuthValidationError {}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `email` is normalised via [`EmailAddress`].
/// - `password` is non-empty but retains caller-provided whitespace to
///   avoid surprising credential comparisons.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email).map_err(AuthValidationError::Email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload.
#[derive(Debug, Clone)]
pub struct Registration {
    name: DisplayName,
    email: EmailAddress,
    profile_pic: Option<String>,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw form inputs. Blank profile-picture
    /// values are treated as absent.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        profile_pic: Option<&str>,
        password: &str,
    ) -> Result<Self, AuthValidationError> {
        let name = DisplayName::new(name).map_err(AuthValidationError::Name)?;
        let email = EmailAddress::new(email).map_err(AuthValidationError::Email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        let length = password.chars().count();
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&length) {
            return Err(AuthValidationError::PasswordLength {
                min: PASSWORD_MIN,
                max: PASSWORD_MAX,
            });
        }
        let profile_pic = profile_pic
            .map(str::trim)
            .filter(|pic| !pic.is_empty())
            .map(str::to_owned);
        Ok(Self {
            name,
            email,
            profile_pic,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Display name for the new account.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Unique email for the new account.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Optional profile picture reference.
    pub fn profile_pic(&self) -> Option<&str> {
        self.profile_pic.as_deref()
    }

    /// Plain-text password to be hashed by the account service.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
