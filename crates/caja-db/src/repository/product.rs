//! # Product Repository
//!
//! Database operations for the product catalog and per-branch inventory.
//!
//! ## Two-Table Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Product vs ProductBranch                               │
//! │                                                                         │
//! │  product            product_branch (per-branch association)            │
//! │  ┌──────────────┐   ┌───────────────────────────────────────────┐      │
//! │  │ id           │◄──│ product_id ┐                              │      │
//! │  │ name         │   │ branch_id  ┴ composite key                │      │
//! │  │ description  │   │ price          ← what THIS branch charges │      │
//! │  │ code         │   │ stock_quantity ← what THIS branch holds   │      │
//! │  └──────────────┘   │ state          ← shelf on/off here        │      │
//! │                     └───────────────────────────────────────────┘      │
//! │                                                                         │
//! │  Creating a product writes BOTH rows in one transaction: an orphan     │
//! │  product with no branch pricing is unsellable and invisible to the     │
//! │  listing join.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use caja_core::{PricingUpdate, ProductListing, ProductUpdate, RecordState};

use crate::error::{DbError, DbResult};

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product together with its first per-branch row.
    ///
    /// ## Atomicity
    /// Both inserts run in one transaction: if the `product_branch` insert
    /// fails (e.g. the branch does not exist), the product row rolls back
    /// too and the catalog stays orphan-free.
    ///
    /// The new branch row starts at stock 0, state `active`.
    ///
    /// ## Errors
    /// * `DbError::ForeignKeyViolation` - `branch_id` does not exist
    pub async fn create_with_branch(
        &self,
        name: &str,
        description: Option<&str>,
        code: Option<&str>,
        branch_id: i64,
        price: f64,
    ) -> DbResult<ProductListing> {
        debug!(name = %name, branch_id = %branch_id, "Inserting product with branch pricing");

        let mut tx = self.pool.begin().await?;

        let product_id = sqlx::query(
            r#"
            INSERT INTO product (name, description, code)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(code)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        sqlx::query(
            r#"
            INSERT INTO product_branch (product_id, branch_id, price)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(product_id)
        .bind(branch_id)
        .bind(price)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_listing(product_id, branch_id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", product_id.to_string()))
    }

    /// Lists every (product, branch) pairing with its pricing and stock.
    ///
    /// One row per product per branch it is stocked in.
    pub async fn list_all(&self) -> DbResult<Vec<ProductListing>> {
        let products = sqlx::query_as::<_, ProductListing>(
            r#"
            SELECT
                product.id,
                product.name,
                product.description,
                product.code,
                product_branch.stock_quantity,
                product_branch.price,
                product_branch.state,
                branch.id AS branch_id,
                branch.name AS branch_name
            FROM product
            JOIN product_branch ON product.id = product_branch.product_id
            JOIN branch ON branch.id = product_branch.branch_id
            ORDER BY product.id, branch.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets one (product, branch) listing row.
    pub async fn get_listing(
        &self,
        product_id: i64,
        branch_id: i64,
    ) -> DbResult<Option<ProductListing>> {
        let listing = sqlx::query_as::<_, ProductListing>(
            r#"
            SELECT
                product.id,
                product.name,
                product.description,
                product.code,
                product_branch.stock_quantity,
                product_branch.price,
                product_branch.state,
                branch.id AS branch_id,
                branch.name AS branch_name
            FROM product
            JOIN product_branch ON product.id = product_branch.product_id
            JOIN branch ON branch.id = product_branch.branch_id
            WHERE product.id = ?1 AND branch.id = ?2
            "#,
        )
        .bind(product_id)
        .bind(branch_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(listing)
    }

    /// Partially updates a product's catalog fields (name, description, code).
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No product with this ID
    pub async fn update(&self, id: i64, changes: &ProductUpdate) -> DbResult<()> {
        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE product SET
                name = COALESCE(?2, name),
                description = COALESCE(?3, description),
                code = COALESCE(?4, code)
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.code.as_deref())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id.to_string()));
        }

        Ok(())
    }

    /// Updates price and/or stock on one (product, branch) row.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No such (product, branch) pairing
    pub async fn update_pricing(
        &self,
        product_id: i64,
        branch_id: i64,
        changes: &PricingUpdate,
    ) -> DbResult<()> {
        debug!(product_id = %product_id, branch_id = %branch_id, "Updating branch pricing");

        let result = sqlx::query(
            r#"
            UPDATE product_branch SET
                price = COALESCE(?3, price),
                stock_quantity = COALESCE(?4, stock_quantity)
            WHERE product_id = ?1 AND branch_id = ?2
            "#,
        )
        .bind(product_id)
        .bind(branch_id)
        .bind(changes.price)
        .bind(changes.stock_quantity)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "ProductBranch",
                format!("{}/{}", product_id, branch_id),
            ));
        }

        Ok(())
    }

    /// Sets the availability state of a product in one branch.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No such (product, branch) pairing
    pub async fn set_branch_state(
        &self,
        product_id: i64,
        branch_id: i64,
        state: RecordState,
    ) -> DbResult<()> {
        debug!(product_id = %product_id, branch_id = %branch_id, ?state, "Toggling product availability");

        let result = sqlx::query(
            r#"
            UPDATE product_branch SET state = ?3
            WHERE product_id = ?1 AND branch_id = ?2
            "#,
        )
        .bind(product_id)
        .bind(branch_id)
        .bind(state)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "ProductBranch",
                format!("{}/{}", product_id, branch_id),
            ));
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

    async fn seed_branch(db: &Database, name: &str) -> i64 {
        db.branches().create(name, None, None, None).await.unwrap().id
    }

    #[tokio::test]
    async fn test_create_with_branch_starts_at_stock_zero() {
        let db = test_db().await;
        let branch_id = seed_branch(&db, "Sucursal Centro").await;

        let listing = db
            .products()
            .create_with_branch("Coca Cola 500ml", None, Some("7750182000123"), branch_id, 3.5)
            .await
            .unwrap();

        assert_eq!(listing.name, "Coca Cola 500ml");
        assert_eq!(listing.branch_id, branch_id);
        assert_eq!(listing.branch_name, "Sucursal Centro");
        assert_eq!(listing.stock_quantity, 0);
        assert_eq!(listing.price, 3.5);
        assert_eq!(listing.state, RecordState::Active);
    }

    #[tokio::test]
    async fn test_create_with_missing_branch_leaves_no_orphan_product() {
        let db = test_db().await;

        let err = db
            .products()
            .create_with_branch("Pan", None, None, 999, 1.2)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        // The rolled-back product insert must not survive
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_list_all_is_one_row_per_branch_pairing() {
        let db = test_db().await;
        let centro = seed_branch(&db, "Sucursal Centro").await;
        let norte = seed_branch(&db, "Sucursal Norte").await;

        let listing = db
            .products()
            .create_with_branch("Leche 1L", None, None, centro, 4.5)
            .await
            .unwrap();

        // Stock the same product in the second branch at another price
        sqlx::query(
            "INSERT INTO product_branch (product_id, branch_id, price, stock_quantity) \
             VALUES (?1, ?2, 4.8, 12)",
        )
        .bind(listing.id)
        .bind(norte)
        .execute(db.pool())
        .await
        .unwrap();

        let all = db.products().list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].branch_id, centro);
        assert_eq!(all[0].price, 4.5);
        assert_eq!(all[1].branch_id, norte);
        assert_eq!(all[1].price, 4.8);
        assert_eq!(all[1].stock_quantity, 12);
    }

    #[tokio::test]
    async fn test_update_pricing_partial() {
        let db = test_db().await;
        let branch_id = seed_branch(&db, "Sucursal Centro").await;
        let listing = db
            .products()
            .create_with_branch("Azucar 1kg", None, None, branch_id, 5.0)
            .await
            .unwrap();

        // Only stock changes; price must survive
        let changes = PricingUpdate {
            price: None,
            stock_quantity: Some(40),
        };
        db.products()
            .update_pricing(listing.id, branch_id, &changes)
            .await
            .unwrap();

        let reread = db
            .products()
            .get_listing(listing.id, branch_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reread.stock_quantity, 40);
        assert_eq!(reread.price, 5.0);
    }

    #[tokio::test]
    async fn test_update_pricing_missing_pairing_is_not_found() {
        let db = test_db().await;

        let err = db
            .products()
            .update_pricing(7, 7, &PricingUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_branch_state_toggle() {
        let db = test_db().await;
        let branch_id = seed_branch(&db, "Sucursal Centro").await;
        let listing = db
            .products()
            .create_with_branch("Arroz 1kg", None, None, branch_id, 4.2)
            .await
            .unwrap();

        db.products()
            .set_branch_state(listing.id, branch_id, RecordState::Disable)
            .await
            .unwrap();

        let reread = db
            .products()
            .get_listing(listing.id, branch_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reread.state, RecordState::Disable);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let db = test_db().await;

        let err = db
            .products()
            .update(999, &ProductUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
