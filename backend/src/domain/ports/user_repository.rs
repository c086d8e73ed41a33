//! Port abstraction for user persistence adapters and their errors.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::user::{EmailAddress, ProfileUpdate, User, UserId};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserStoreError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },

    /// The email is already registered to another user.
    #[error("email is already registered")]
    DuplicateEmail,
}

impl UserStoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Insert payload for a new user record. The password arrives pre-hashed;
/// repositories never see plain-text credentials.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: crate::domain::user::DisplayName,
    pub email: EmailAddress,
    pub profile_pic: Option<String>,
    pub password_hash: String,
}

/// A stored account: the public user plus its credential hash. Only the
/// account service ever reads the hash.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub user: User,
    pub password_hash: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; duplicate emails surface as
    /// [`UserStoreError::DuplicateEmail`].
    async fn insert(&self, new_user: NewUser) -> Result<User, UserStoreError>;

    /// Fetch an account (user + hash) by its unique email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserStoreError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError>;

    /// Apply a whole-profile update. Returns `None` when the user does not
    /// exist; taking another user's email surfaces as `DuplicateEmail`.
    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserStoreError>;
}

#[derive(Debug, Clone)]
struct StoredAccount {
    user: User,
    password_hash: String,
}

/// In-memory user repository backing dev mode and handler tests.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: Mutex<HashMap<UserId, StoredAccount>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<UserId, StoredAccount>>, UserStoreError>
    {
        self.accounts
            .lock()
            .map_err(|_| UserStoreError::query("user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, new_user: NewUser) -> Result<User, UserStoreError> {
        let mut accounts = self.lock()?;
        if accounts
            .values()
            .any(|stored| stored.user.email() == &new_user.email)
        {
            return Err(UserStoreError::DuplicateEmail);
        }
        let user = User::new(
            UserId::random(),
            new_user.name,
            new_user.email,
            new_user.profile_pic,
        );
        accounts.insert(
            *user.id(),
            StoredAccount {
                user: user.clone(),
                password_hash: new_user.password_hash,
            },
        );
        Ok(user)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserStoreError> {
        let accounts = self.lock()?;
        Ok(accounts
            .values()
            .find(|stored| stored.user.email() == email)
            .map(|stored| UserAccount {
                user: stored.user.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        let accounts = self.lock()?;
        Ok(accounts.get(id).map(|stored| stored.user.clone()))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserStoreError> {
        let mut accounts = self.lock()?;
        let email_taken = accounts
            .iter()
            .any(|(other_id, stored)| other_id != id && stored.user.email() == &update.email);
        if email_taken {
            return Err(UserStoreError::DuplicateEmail);
        }
        let Some(stored) = accounts.get_mut(id) else {
            return Ok(None);
        };
        stored.user = User::new(
            *id,
            update.name.clone(),
            update.email.clone(),
            update.profile_pic.clone(),
        );
        Ok(Some(stored.user.clone()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the in-memory adapter.
    use super::*;
    use crate::domain::user::DisplayName;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: DisplayName::new(name).expect("name"),
            email: EmailAddress::new(email).expect("email"),
            profile_pic: None,
            password_hash: "hash".to_owned(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_never_creates_a_second_user() {
        let repo = InMemoryUserRepository::new();
        repo.insert(new_user("Ada", "ada@example.com"))
            .await
            .expect("first insert");

        let err = repo
            .insert(new_user("Imposter", "ada@example.com"))
            .await
            .expect_err("duplicate must fail");
        assert_eq!(err, UserStoreError::DuplicateEmail);

        let account = repo
            .find_by_email(&EmailAddress::new("ada@example.com").expect("email"))
            .await
            .expect("lookup")
            .expect("account present");
        assert_eq!(account.user.name().as_ref(), "Ada");
    }

    #[tokio::test]
    async fn update_profile_rejects_taken_email() {
        let repo = InMemoryUserRepository::new();
        let ada = repo
            .insert(new_user("Ada", "ada@example.com"))
            .await
            .expect("insert ada");
        repo.insert(new_user("Grace", "grace@example.com"))
            .await
            .expect("insert grace");

        let update = ProfileUpdate {
            name: DisplayName::new("Ada").expect("name"),
            email: EmailAddress::new("grace@example.com").expect("email"),
            profile_pic: None,
        };
        let err = repo
            .update_profile(ada.id(), &update)
            .await
            .expect_err("taken email must fail");
        assert_eq!(err, UserStoreError::DuplicateEmail);
    }

    #[tokio::test]
    async fn update_profile_returns_none_for_unknown_user() {
        let repo = InMemoryUserRepository::new();
        let update = ProfileUpdate {
            name: DisplayName::new("Ghost").expect("name"),
            email: EmailAddress::new("ghost@example.com").expect("email"),
            profile_pic: None,
        };
        let result = repo
            .update_profile(&UserId::random(), &update)
            .await
            .expect("update");
        assert!(result.is_none());
    }
}
