//! # Branch Repository
//!
//! Database operations for store branches.
//!
//! ## Key Operations
//! - Create / list / partial update
//! - State toggle (`active` ↔ `disabled`)
//!
//! Branches are never deleted; closing one sets `state = 'disabled'` so
//! historical sales keep a valid foreign key.

use sqlx::SqlitePool;
use tracing::debug;

use caja_core::{Branch, BranchState, BranchUpdate};

use crate::error::{DbError, DbResult};

/// Repository for branch database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = BranchRepository::new(pool);
///
/// let branch = repo.create("Sucursal Centro", Some("Av. Grau 123"), None, None).await?;
/// let all = repo.list_all().await?;
/// ```
#[derive(Debug, Clone)]
pub struct BranchRepository {
    pool: SqlitePool,
}

impl BranchRepository {
    /// Creates a new BranchRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BranchRepository { pool }
    }

    /// Inserts a new branch and returns the created row.
    ///
    /// State defaults to `active` (schema default).
    pub async fn create(
        &self,
        name: &str,
        location: Option<&str>,
        manager: Option<&str>,
        phone: Option<&str>,
    ) -> DbResult<Branch> {
        debug!(name = %name, "Inserting branch");

        let id = sqlx::query(
            r#"
            INSERT INTO branch (name, location, manager, phone)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(name)
        .bind(location)
        .bind(manager)
        .bind(phone)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Branch", id.to_string()))
    }

    /// Lists all branches, active and disabled alike.
    pub async fn list_all(&self) -> DbResult<Vec<Branch>> {
        let branches = sqlx::query_as::<_, Branch>(
            r#"
            SELECT id, name, location, manager, phone, state
            FROM branch
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(branches)
    }

    /// Gets a branch by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Branch))` - Branch found
    /// * `Ok(None)` - Branch not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Branch>> {
        let branch = sqlx::query_as::<_, Branch>(
            r#"
            SELECT id, name, location, manager, phone, state
            FROM branch
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(branch)
    }

    /// Partially updates a branch and returns the updated row.
    ///
    /// Fields absent from `changes` keep their stored value (COALESCE).
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No branch with this ID
    pub async fn update(&self, id: i64, changes: &BranchUpdate) -> DbResult<Branch> {
        debug!(id = %id, "Updating branch");

        let result = sqlx::query(
            r#"
            UPDATE branch SET
                name = COALESCE(?2, name),
                location = COALESCE(?3, location),
                manager = COALESCE(?4, manager),
                phone = COALESCE(?5, phone)
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.location.as_deref())
        .bind(changes.manager.as_deref())
        .bind(changes.phone.as_deref())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Branch", id.to_string()));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Branch", id.to_string()))
    }

    /// Sets the branch state (activate / disable).
    ///
    /// Setting the state a branch already has still succeeds: SQLite counts
    /// the matched row whether or not the value changed.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No branch with this ID
    pub async fn set_state(&self, id: i64, state: BranchState) -> DbResult<()> {
        debug!(id = %id, ?state, "Toggling branch state");

        let result = sqlx::query(
            r#"
            UPDATE branch SET state = ?2 WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(state)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Branch", id.to_string()));
        }

        Ok(())
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
    async fn test_create_and_list() {
        let db = test_db().await;
        let repo = db.branches();

        let branch = repo
            .create("Sucursal Centro", Some("Av. Grau 123"), Some("Marta"), None)
            .await
            .unwrap();

        assert_eq!(branch.name, "Sucursal Centro");
        assert_eq!(branch.state, BranchState::Active);

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, branch.id);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_absent_fields() {
        let db = test_db().await;
        let repo = db.branches();

        let branch = repo
            .create("Sucursal Norte", Some("Jr. Lima 45"), None, Some("987654321"))
            .await
            .unwrap();

        let changes = BranchUpdate {
            name: Some("Sucursal Norte II".to_string()),
            ..BranchUpdate::default()
        };
        let updated = repo.update(branch.id, &changes).await.unwrap();

        assert_eq!(updated.name, "Sucursal Norte II");
        assert_eq!(updated.location.as_deref(), Some("Jr. Lima 45"));
        assert_eq!(updated.phone.as_deref(), Some("987654321"));
    }

    #[tokio::test]
    async fn test_update_missing_branch_is_not_found() {
        let db = test_db().await;
        let repo = db.branches();

        let err = repo
            .update(999, &BranchUpdate::default())
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_toggle_state_round_trip() {
        let db = test_db().await;
        let repo = db.branches();

        let branch = repo.create("Sucursal Sur", None, None, None).await.unwrap();

        repo.set_state(branch.id, BranchState::Disabled).await.unwrap();
        let reread = repo.get_by_id(branch.id).await.unwrap().unwrap();
        assert_eq!(reread.state, BranchState::Disabled);

        // Toggling to the state it already has still succeeds
        repo.set_state(branch.id, BranchState::Disabled).await.unwrap();

        repo.set_state(branch.id, BranchState::Active).await.unwrap();
        let reread = repo.get_by_id(branch.id).await.unwrap().unwrap();
        assert_eq!(reread.state, BranchState::Active);
    }

    #[tokio::test]
    async fn test_toggle_missing_branch_is_not_found() {
        let db = test_db().await;

        let err = db
            .branches()
            .set_state(404, BranchState::Active)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
