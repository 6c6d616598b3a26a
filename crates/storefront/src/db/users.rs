//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use smart_gadgets_core::{UserId, Username};

use super::{RepositoryError, conflict_or_database};
use crate::models::User;

/// Database row for the `user` table (without the password hash).
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            username,
            is_admin: row.is_admin,
            created_at: row.created_at,
        })
    }
}

/// Row used for login: the user plus their password hash.
#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &Username,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO "user" (username, password_hash, is_admin, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, is_admin, created_at
            "#,
        )
        .bind(username.as_str())
        .bind(password_hash)
        .bind(is_admin)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "username"))?;

        User::try_from(row)
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, is_admin, created_at
            FROM "user"
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by their username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, is_admin, created_at
            FROM "user"
            WHERE username = ?
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Whether a username is already registered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, username: &Username) -> Result<bool, RepositoryError> {
        let found: Option<i64> = sqlx::query_scalar(r#"SELECT 1 FROM "user" WHERE username = ?"#)
            .bind(username.as_str())
            .fetch_optional(self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Get a user together with their password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, username, is_admin, created_at, password_hash
            FROM "user"
            WHERE username = ?
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = User::try_from(row.user)?;
        Ok(Some((user, row.password_hash)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn name(s: &str) -> Username {
        Username::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let pool = test_pool().await;
        let users = UserRepository::new(&pool);

        let created = users.create(&name("alice"), "hash", false).await.unwrap();
        assert!(!created.is_admin);

        let by_id = users.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, name("alice"));

        let by_name = users.get_by_username(&name("alice")).await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);

        assert!(users.exists(&name("alice")).await.unwrap());
        assert!(!users.exists(&name("bob")).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let pool = test_pool().await;
        let users = UserRepository::new(&pool);

        users.create(&name("alice"), "first", false).await.unwrap();
        let err = users.create(&name("alice"), "second", true).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let (user, hash) = users
            .get_password_hash(&name("alice"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hash, "first");
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let pool = test_pool().await;
        let users = UserRepository::new(&pool);

        assert!(users.get_by_id(UserId::new(99)).await.unwrap().is_none());
        assert!(
            users
                .get_password_hash(&name("ghost"))
                .await
                .unwrap()
                .is_none()
        );
    }
}
