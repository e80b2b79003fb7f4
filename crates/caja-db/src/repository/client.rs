//! # Client Repository
//!
//! Database operations for clients (customers).
//!
//! ## Key Operations
//! - Create / list / partial update
//! - Substring search over document and name (till's lookup box)
//! - Exact document lookup (feeds the external identity fallback)
//!
//! Row 1 is the seeded walk-in customer ("CLIENTE VARIOS"); the keep-alive
//! probe and anonymous sales lean on it existing.

use sqlx::SqlitePool;
use tracing::debug;

use caja_core::{Client, ClientUpdate};

use crate::error::{DbError, DbResult};

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Inserts a new client and returns the created row.
    ///
    /// Points start at 0 (schema default).
    pub async fn create(
        &self,
        name: &str,
        document: Option<&str>,
        phone: Option<&str>,
    ) -> DbResult<Client> {
        debug!(name = %name, "Inserting client");

        let id = sqlx::query(
            r#"
            INSERT INTO client (name, document, phone)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(name)
        .bind(document)
        .bind(phone)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Client", id.to_string()))
    }

    /// Lists all clients.
    pub async fn list_all(&self) -> DbResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, document, phone, points
            FROM client
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Gets a client by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, document, phone, points
            FROM client
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Partially updates a client and returns the updated row.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No client with this ID
    pub async fn update(&self, id: i64, changes: &ClientUpdate) -> DbResult<Client> {
        debug!(id = %id, "Updating client");

        let result = sqlx::query(
            r#"
            UPDATE client SET
                name = COALESCE(?2, name),
                document = COALESCE(?3, document),
                phone = COALESCE(?4, phone),
                points = COALESCE(?5, points)
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.document.as_deref())
        .bind(changes.phone.as_deref())
        .bind(changes.points)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id.to_string()));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Client", id.to_string()))
    }

    /// Searches clients by document or name substring.
    ///
    /// ## How It Works
    /// `LIKE '%term%'` against both columns; an empty term matches every
    /// client with a name (LIKE never matches NULL). ASCII-case-insensitive,
    /// as SQLite's LIKE is by default.
    pub async fn search(&self, term: &str) -> DbResult<Vec<Client>> {
        let pattern = format!("%{}%", term);

        debug!(term = %term, "Searching clients");

        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, document, phone, points
            FROM client
            WHERE document LIKE ?1 OR name LIKE ?1
            ORDER BY id
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Looks up a client by exact document number.
    pub async fn find_by_document(&self, document: &str) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, document, phone, points
            FROM client
            WHERE document = ?1
            "#,
        )
        .bind(document)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Returns the first client by ID, if any.
    ///
    /// The till preloads this as the default walk-in customer.
    pub async fn first(&self) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, document, phone, points
            FROM client
            ORDER BY id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
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
    async fn test_walkin_client_is_seeded_first() {
        let db = test_db().await;
        let repo = db.clients();

        let first = repo.first().await.unwrap().unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(first.name, "CLIENTE VARIOS");
        assert_eq!(first.document.as_deref(), Some("00000000"));
    }

    #[tokio::test]
    async fn test_create_and_search_by_document_or_name() {
        let db = test_db().await;
        let repo = db.clients();

        repo.create("Rosa Quispe", Some("45678123"), Some("999888777"))
            .await
            .unwrap();
        repo.create("Juan Rosales", Some("12345678"), None)
            .await
            .unwrap();

        // Substring of a document
        let by_document = repo.search("45678").await.unwrap();
        assert_eq!(by_document.len(), 2); // 45678123 and 12345678 both contain it

        // Substring of a name, case-insensitive
        let by_name = repo.search("rosa").await.unwrap();
        assert_eq!(by_name.len(), 2); // Rosa Quispe and Juan Rosales

        let none = repo.search("zzz").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_document_is_exact() {
        let db = test_db().await;
        let repo = db.clients();

        repo.create("Rosa Quispe", Some("45678123"), None)
            .await
            .unwrap();

        let found = repo.find_by_document("45678123").await.unwrap().unwrap();
        assert_eq!(found.name, "Rosa Quispe");

        assert!(repo.find_by_document("45678").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_points() {
        let db = test_db().await;
        let repo = db.clients();

        let client = repo.create("Rosa Quispe", None, None).await.unwrap();
        assert_eq!(client.points, 0);

        let changes = ClientUpdate {
            points: Some(120),
            ..ClientUpdate::default()
        };
        let updated = repo.update(client.id, &changes).await.unwrap();

        assert_eq!(updated.points, 120);
        assert_eq!(updated.name, "Rosa Quispe");
    }

    #[tokio::test]
    async fn test_update_missing_client_is_not_found() {
        let db = test_db().await;

        let err = db
            .clients()
            .update(999, &ClientUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
