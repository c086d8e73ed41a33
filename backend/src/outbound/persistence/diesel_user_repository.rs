//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! A thin adapter translating between Diesel row structs and domain user
//! types. Email uniqueness is enforced by the database; unique violations
//! surface as [`UserStoreError::DuplicateEmail`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{NewUser, UserAccount, UserRepository, UserStoreError};
use crate::domain::{DisplayName, EmailAddress, ProfileUpdate, User, UserId};

use super::models::{NewUserRow, UserProfileUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserStoreError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserStoreError::DuplicateEmail
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserStoreError::connection("database connection error")
        }
        DieselError::NotFound => UserStoreError::query("record not found"),
        _ => UserStoreError::query("database error"),
    }
}

/// Convert a database row to a domain user.
///
/// Stored rows failing domain validation indicate data written outside the
/// application; they surface as query errors rather than panics.
fn row_to_user(row: &UserRow) -> Result<User, UserStoreError> {
    let name = DisplayName::new(row.display_name.clone())
        .map_err(|err| UserStoreError::query(format!("stored display name invalid: {err}")))?;
    let email = EmailAddress::new(row.email.clone())
        .map_err(|err| UserStoreError::query(format!("stored email invalid: {err}")))?;
    Ok(User::new(
        UserId::from_uuid(row.id),
        name,
        email,
        row.profile_pic.clone(),
    ))
}

fn row_to_account(row: &UserRow) -> Result<UserAccount, UserStoreError> {
    Ok(UserAccount {
        user: row_to_user(row)?,
        password_hash: row.password_hash.clone(),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, new_user: NewUser) -> Result<User, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: Uuid::new_v4(),
            display_name: new_user.name.as_ref(),
            email: new_user.email.as_ref(),
            profile_pic: new_user.profile_pic.as_deref(),
            password_hash: &new_user.password_hash,
        };

        let inserted: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(&inserted)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserProfileUpdate {
            display_name: update.name.as_ref(),
            email: update.email.as_ref(),
            profile_pic: update.profile_pic.as_deref(),
        };

        let row: Option<UserRow> = diesel::update(users::table.find(id.as_uuid()))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.as_ref().map(row_to_user).transpose()
    }
}
