//! Account use-cases: registration, authentication, profile view and edit.
//!
//! Handlers call this service; it composes the user repository and the
//! credential hasher and maps port errors into the domain [`Error`].

use std::sync::Arc;

use crate::domain::auth::{LoginCredentials, Registration};
use crate::domain::error::Error;
use crate::domain::ports::{
    CredentialHashError, CredentialHasher, NewUser, UserRepository, UserStoreError,
};
use crate::domain::user::{ProfileUpdate, User, UserId};

/// Registration, login, and profile service over the user repository.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

fn map_store_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::Connection { message } => Error::service_unavailable(message),
        UserStoreError::Query { message } => Error::internal(message),
        UserStoreError::DuplicateEmail => {
            Error::conflict("user already exists, please choose a different email")
        }
    }
}

fn map_hash_error(error: CredentialHashError) -> Error {
    Error::internal(error.to_string())
}

impl AccountService {
    /// Create a service over the given repository and hasher.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { users, hasher }
    }

    /// Register a new account. A duplicate email is a domain conflict,
    /// never a crash.
    pub async fn register(&self, registration: &Registration) -> Result<User, Error> {
        if self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_store_error)?
            .is_some()
        {
            return Err(map_store_error(UserStoreError::DuplicateEmail));
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(map_hash_error)?;

        let new_user = NewUser {
            name: registration.name().clone(),
            email: registration.email().clone(),
            profile_pic: registration.profile_pic().map(str::to_owned),
            password_hash,
        };

        let user = self
            .users
            .insert(new_user)
            .await
            .map_err(map_store_error)?;
        tracing::info!(user_id = %user.id(), "registered new user");
        Ok(user)
    }

    /// Authenticate credentials. Unknown email and wrong password are both
    /// `None`; callers branch on absence rather than catching errors.
    pub async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<User>, Error> {
        let Some(account) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_store_error)?
        else {
            return Ok(None);
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .map_err(map_hash_error)?;
        Ok(matches.then_some(account.user))
    }

    /// Fetch a user's profile.
    pub async fn profile(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(id).await.map_err(map_store_error)
    }

    /// Apply a whole-profile edit.
    pub async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<User, Error> {
        self.users
            .update_profile(id, update)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}
