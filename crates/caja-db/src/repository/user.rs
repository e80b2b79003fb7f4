//! # User Repository
//!
//! Database operations for user accounts.
//!
//! ## Credential Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where Passwords Live                                 │
//! │                                                                         │
//! │  HTTP payload (clear)                                                  │
//! │       │                                                                 │
//! │       ▼  hashed at the API layer (argon2)                              │
//! │  UserRepository::create(username, password_hash, role)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  users.password column (argon2 PHC string)                             │
//! │       │                                                                 │
//! │       ▼  login                                                          │
//! │  find_credentials() → UserCredentials (NOT serializable)               │
//! │       │                                                                 │
//! │       ▼  verified at the API layer, hash discarded                     │
//! │  User (no password field) → JSON response                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`User`] deliberately has no password field, so no query in this module
//! can leak a hash into a response.

use sqlx::SqlitePool;
use tracing::debug;

use caja_core::{RecordState, User};

use crate::error::{DbError, DbResult};

/// A user row including its stored password hash.
///
/// Only [`UserRepository::find_credentials`] produces this, and it is
/// deliberately not `Serialize`: the hash is for in-process verification
/// and never crosses the HTTP boundary.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub role: String,
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user and returns the created row (without the hash).
    ///
    /// `password_hash` must already be an argon2 PHC string; this layer
    /// never sees clear passwords.
    pub async fn create(&self, username: &str, password_hash: &str, role: &str) -> DbResult<User> {
        debug!(username = %username, role = %role, "Inserting user");

        let id = sqlx::query(
            r#"
            INSERT INTO users (username, password, role)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id.to_string()))
    }

    /// Lists all users. Hashes stay in the database.
    pub async fn list_all(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, role, state
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, role, state
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Partially updates a user and returns the updated row.
    ///
    /// `password_hash` as `None` leaves the stored hash untouched; the API
    /// layer maps an absent or empty password field to `None`.
    pub async fn update(
        &self,
        id: i64,
        username: Option<&str>,
        password_hash: Option<&str>,
        role: Option<&str>,
    ) -> DbResult<User> {
        debug!(id = %id, "Updating user");

        let result = sqlx::query(
            r#"
            UPDATE users SET
                username = COALESCE(?2, username),
                password = COALESCE(?3, password),
                role = COALESCE(?4, role)
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id.to_string()));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id.to_string()))
    }

    /// Sets the user state (activate / disable).
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No user with this ID
    pub async fn set_state(&self, id: i64, state: RecordState) -> DbResult<()> {
        debug!(id = %id, ?state, "Toggling user state");

        let result = sqlx::query(
            r#"
            UPDATE users SET state = ?2 WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(state)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id.to_string()));
        }

        Ok(())
    }

    /// Looks up login credentials by username.
    ///
    /// Returns the stored hash for in-process verification. No state filter:
    /// the login contract predates soft-disable and still admits any row.
    pub async fn find_credentials(&self, username: &str) -> DbResult<Option<UserCredentials>> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            r#"
            SELECT id, username, password, role
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(credentials)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find_credentials() {
        let db = test_db().await;
        let repo = db.users();

        let user = repo
            .create("lucia", "$argon2id$fake-hash", "cajera")
            .await
            .unwrap();
        assert_eq!(user.username, "lucia");
        assert_eq!(user.state, RecordState::Active);

        let creds = repo.find_credentials("lucia").await.unwrap().unwrap();
        assert_eq!(creds.id, user.id);
        assert_eq!(creds.password, "$argon2id$fake-hash");
        assert_eq!(creds.role, "cajera");

        assert!(repo.find_credentials("nadie").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_without_password_keeps_hash() {
        let db = test_db().await;
        let repo = db.users();

        let user = repo
            .create("mario", "$argon2id$original", "admin")
            .await
            .unwrap();

        let updated = repo
            .update(user.id, Some("mario.g"), None, None)
            .await
            .unwrap();
        assert_eq!(updated.username, "mario.g");
        assert_eq!(updated.role, "admin");

        let creds = repo.find_credentials("mario.g").await.unwrap().unwrap();
        assert_eq!(creds.password, "$argon2id$original");
    }

    #[tokio::test]
    async fn test_update_with_password_replaces_hash() {
        let db = test_db().await;
        let repo = db.users();

        let user = repo
            .create("sofia", "$argon2id$old", "cajera")
            .await
            .unwrap();

        repo.update(user.id, None, Some("$argon2id$new"), None)
            .await
            .unwrap();

        let creds = repo.find_credentials("sofia").await.unwrap().unwrap();
        assert_eq!(creds.password, "$argon2id$new");
    }

    #[tokio::test]
    async fn test_state_toggle_uses_legacy_spelling() {
        let db = test_db().await;
        let repo = db.users();

        let user = repo
            .create("ana", "$argon2id$hash", "cajera")
            .await
            .unwrap();

        repo.set_state(user.id, RecordState::Disable).await.unwrap();

        // The stored value must be the historical 'disable' (no trailing d)
        let raw: String = sqlx::query_scalar("SELECT state FROM users WHERE id = ?1")
            .bind(user.id)
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(raw, "disable");

        let reread = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(reread.state, RecordState::Disable);
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let db = test_db().await;

        let err = db.users().update(999, Some("x"), None, None).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
