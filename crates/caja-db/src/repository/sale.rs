//! # Sale Repository
//!
//! Database operations for sale registration, reversal and reporting.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. ALLOCATE DOCUMENT NUMBER                                           │
//! │     └── next_document_number() → 42 (atomic, database-enforced)        │
//! │                                                                         │
//! │  2. REGISTER (one call per product on the receipt)                     │
//! │     └── register() ─┬─ INSERT sale row          ┐                      │
//! │                     └─ stock_quantity -= qty    ┴ one transaction      │
//! │                                                                         │
//! │  3. (OPTIONAL) REVERSE                                                 │
//! │     └── reverse() ──┬─ DELETE every line of the document  ┐            │
//! │                     └─ stock_quantity += qty per line     ┴ one tx     │
//! │                                                                         │
//! │  Reporting reads: details / print lines / daily summaries / day total  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The register/reverse pair is the one multi-step invariant in the system:
//! a sale line and its stock decrement commit together or not at all, and a
//! reversal restores exactly the quantity each line decremented.

use sqlx::SqlitePool;
use tracing::{debug, warn};

use caja_core::document::format_document_number;
use caja_core::{DailySaleSummary, NewSale, Sale, SaleDetailLine, SalePrintLine};

use crate::error::{DbError, DbResult};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Allocates the next document number.
    ///
    /// ## How It Works
    /// One UPDATE..RETURNING against the single `document_sequence` row.
    /// SQLite serializes writers, so two tills asking at once get distinct
    /// numbers — no read-max-then-increment race.
    ///
    /// The MAX() against existing sales keeps the sequence ahead of any
    /// rows that predate it (restored backups, manual inserts): with no
    /// sales the first number is 1; with a highest sale of 41 the next
    /// is 42.
    pub async fn next_document_number(&self) -> DbResult<i64> {
        let number = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE document_sequence
            SET value = MAX(value, (SELECT COALESCE(MAX(document_number), 0) FROM sale)) + 1
            WHERE id = 1
            RETURNING value
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        debug!(document_number = %number, "Allocated document number");
        Ok(number)
    }

    /// Registers one sale line and debits the matching branch stock.
    ///
    /// ## Atomicity
    /// Insert and decrement run in one transaction. If the (product, branch)
    /// inventory row does not exist, the whole registration rolls back and
    /// no sale row survives.
    ///
    /// No stock floor is enforced here; a till may oversell and the
    /// quantity goes negative (counted stock corrects it later).
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No inventory row for (product, branch)
    /// * `DbError::ForeignKeyViolation` - client/user/branch/product ID unknown
    pub async fn register(&self, sale: &NewSale) -> DbResult<()> {
        debug!(
            document_number = %sale.document_number,
            product_id = %sale.product_id,
            quantity = %sale.quantity,
            "Registering sale line"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sale (
                client_id, user_id, branch_id, product_id,
                document_number, cantidad_producto, total, date, payment_method
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(sale.client_id)
        .bind(sale.user_id)
        .bind(sale.branch_id)
        .bind(sale.product_id)
        .bind(sale.document_number)
        .bind(sale.quantity)
        .bind(sale.total)
        .bind(&sale.date)
        .bind(sale.payment_method.as_deref())
        .execute(&mut *tx)
        .await?;

        let debited = sqlx::query(
            r#"
            UPDATE product_branch
            SET stock_quantity = stock_quantity - ?3
            WHERE product_id = ?1 AND branch_id = ?2
            "#,
        )
        .bind(sale.product_id)
        .bind(sale.branch_id)
        .bind(sale.quantity)
        .execute(&mut *tx)
        .await?;

        if debited.rows_affected() == 0 {
            // Dropping the transaction rolls the insert back
            return Err(DbError::not_found(
                "ProductBranch",
                format!("{}/{}", sale.product_id, sale.branch_id),
            ));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Reverses every line of a document, restoring stock per line.
    ///
    /// Returns the number of lines reversed.
    ///
    /// ## Atomicity
    /// All deletes and restocks commit together. A line whose inventory row
    /// has meanwhile vanished is logged and skipped (the delete still
    /// happens — there is nothing left to restock).
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No sale rows carry this document number
    pub async fn reverse(&self, document_number: i64) -> DbResult<u64> {
        debug!(document_number = %document_number, "Reversing sale");

        let mut tx = self.pool.begin().await?;

        let lines = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, client_id, user_id, branch_id, product_id,
                   document_number, cantidad_producto, total, date,
                   payment_method, print_count
            FROM sale
            WHERE document_number = ?1
            "#,
        )
        .bind(document_number)
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(DbError::not_found(
                "Sale",
                format_document_number(document_number),
            ));
        }

        for line in &lines {
            sqlx::query("DELETE FROM sale WHERE id = ?1")
                .bind(line.id)
                .execute(&mut *tx)
                .await?;

            let restocked = sqlx::query(
                r#"
                UPDATE product_branch
                SET stock_quantity = stock_quantity + ?3
                WHERE product_id = ?1 AND branch_id = ?2
                "#,
            )
            .bind(line.product_id)
            .bind(line.branch_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

            if restocked.rows_affected() == 0 {
                warn!(
                    product_id = %line.product_id,
                    branch_id = %line.branch_id,
                    "No inventory row to restock for reversed sale line"
                );
            }
        }

        tx.commit().await?;
        Ok(lines.len() as u64)
    }

    /// Receipt detail lines for one document.
    ///
    /// Joins each sale line to its product and to the inventory row of the
    /// branch the sale happened in, so the listed price is that branch's.
    pub async fn details(&self, document_number: i64) -> DbResult<Vec<SaleDetailLine>> {
        let lines = sqlx::query_as::<_, SaleDetailLine>(
            r#"
            SELECT
                product.name AS producto,
                product_branch.price AS precio,
                sale.cantidad_producto AS cantidad,
                sale.document_number AS numero_documento,
                sale.total AS subtotal
            FROM sale
            JOIN product ON sale.product_id = product.id
            JOIN product_branch ON sale.product_id = product_branch.product_id
                               AND sale.branch_id = product_branch.branch_id
            WHERE sale.document_number = ?1
            ORDER BY sale.id
            "#,
        )
        .bind(document_number)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Receipt lines for printing, counting the print.
    ///
    /// ## Side Effect
    /// Increments `print_count` on every line of the document, in the same
    /// transaction as the read. A document nobody can read is never counted
    /// as printed.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No sale rows carry this document number
    pub async fn print_lines(&self, document_number: i64) -> DbResult<Vec<SalePrintLine>> {
        let mut tx = self.pool.begin().await?;

        let lines = sqlx::query_as::<_, SalePrintLine>(
            r#"
            SELECT
                sale.document_number,
                product.name AS product_name,
                product_branch.price AS unit_price,
                sale.cantidad_producto AS quantity
            FROM sale
            JOIN product ON sale.product_id = product.id
            JOIN product_branch ON sale.product_id = product_branch.product_id
                               AND sale.branch_id = product_branch.branch_id
            WHERE sale.document_number = ?1
            ORDER BY sale.id
            "#,
        )
        .bind(document_number)
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(DbError::not_found(
                "Sale",
                format_document_number(document_number),
            ));
        }

        sqlx::query(
            r#"
            UPDATE sale SET print_count = print_count + 1
            WHERE document_number = ?1
            "#,
        )
        .bind(document_number)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(lines)
    }

    /// Sales of one calendar day, aggregated per document.
    ///
    /// `date` must be a `YYYY-MM-DD` string; matching is by prefix against
    /// the stored `YYYY-MM-DD HH:MM:SS` timestamps. One row per document:
    /// summed total, earliest line timestamp, cashier and customer names.
    pub async fn daily_summaries(&self, date: &str) -> DbResult<Vec<DailySaleSummary>> {
        let pattern = format!("{}%", date);

        let summaries = sqlx::query_as::<_, DailySaleSummary>(
            r#"
            SELECT
                u.username AS usuario,
                c.name AS cliente,
                sale.document_number AS numero_documento,
                MIN(sale.date) AS primer_fecha,
                SUM(sale.total) AS total_venta,
                sale.payment_method
            FROM sale
            JOIN users u ON sale.user_id = u.id
            JOIN client c ON sale.client_id = c.id
            WHERE sale.date LIKE ?1
            GROUP BY sale.document_number
            ORDER BY sale.document_number DESC
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    /// Grand total of one calendar day's sales.
    ///
    /// ## Returns
    /// * `Ok(Some(total))` - At least one sale that day
    /// * `Ok(None)` - No sales that day (SUM over zero rows is NULL)
    pub async fn total_for_day(&self, date: &str) -> DbResult<Option<f64>> {
        let pattern = format!("{}%", date);

        let total = sqlx::query_scalar::<_, Option<f64>>(
            r#"
            SELECT SUM(total) FROM sale WHERE date LIKE ?1
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use caja_core::PricingUpdate;

    /// Branch + user + one product stocked at 10 units. Client 1 is the
    /// seeded walk-in customer.
    struct Fixture {
        db: Database,
        branch_id: i64,
        user_id: i64,
        product_id: i64,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let branch_id = db
            .branches()
            .create("Sucursal Centro", None, None, None)
            .await
            .unwrap()
            .id;
        let user_id = db
            .users()
            .create("lucia", "$argon2id$hash", "cajera")
            .await
            .unwrap()
            .id;
        let product_id = db
            .products()
            .create_with_branch("Coca Cola 500ml", None, None, branch_id, 3.5)
            .await
            .unwrap()
            .id;
        db.products()
            .update_pricing(
                product_id,
                branch_id,
                &PricingUpdate {
                    price: None,
                    stock_quantity: Some(10),
                },
            )
            .await
            .unwrap();

        Fixture {
            db,
            branch_id,
            user_id,
            product_id,
        }
    }

    fn new_sale(fx: &Fixture, document_number: i64, quantity: i64, date: &str) -> NewSale {
        NewSale {
            client_id: 1,
            user_id: fx.user_id,
            branch_id: fx.branch_id,
            product_id: fx.product_id,
            document_number,
            quantity,
            total: 3.5 * quantity as f64,
            date: date.to_string(),
            payment_method: Some("efectivo".to_string()),
        }
    }

    async fn stock(fx: &Fixture) -> i64 {
        fx.db
            .products()
            .get_listing(fx.product_id, fx.branch_id)
            .await
            .unwrap()
            .unwrap()
            .stock_quantity
    }

    #[tokio::test]
    async fn test_document_numbers_start_at_one_and_increase() {
        let fx = fixture().await;
        let repo = fx.db.sales();

        assert_eq!(repo.next_document_number().await.unwrap(), 1);
        assert_eq!(repo.next_document_number().await.unwrap(), 2);
        assert_eq!(repo.next_document_number().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_document_sequence_stays_ahead_of_existing_sales() {
        let fx = fixture().await;
        let repo = fx.db.sales();

        // A sale stamped 41 exists (restored backup scenario)
        repo.register(&new_sale(&fx, 41, 1, "2024-03-05 09:00:00"))
            .await
            .unwrap();

        assert_eq!(repo.next_document_number().await.unwrap(), 42);
        assert_eq!(repo.next_document_number().await.unwrap(), 43);
    }

    #[tokio::test]
    async fn test_register_debits_stock() {
        let fx = fixture().await;

        fx.db
            .sales()
            .register(&new_sale(&fx, 1, 3, "2024-03-05 10:00:00"))
            .await
            .unwrap();

        assert_eq!(stock(&fx).await, 7);
    }

    #[tokio::test]
    async fn test_register_rolls_back_when_inventory_row_missing() {
        let fx = fixture().await;

        // A second branch exists (valid FK) but carries no inventory row
        // for this product, so the decrement matches nothing.
        let other_branch = fx
            .db
            .branches()
            .create("Sucursal Norte", None, None, None)
            .await
            .unwrap()
            .id;
        let mut sale = new_sale(&fx, 1, 2, "2024-03-05 10:00:00");
        sale.branch_id = other_branch;

        let err = fx.db.sales().register(&sale).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        // The insert must have rolled back with the failed decrement
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale")
            .fetch_one(fx.db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(stock(&fx).await, 10);
    }

    #[tokio::test]
    async fn test_reverse_restores_stock_per_line() {
        let fx = fixture().await;
        let repo = fx.db.sales();

        // Two lines on one receipt: second product stocked at 5
        let second_product = fx
            .db
            .products()
            .create_with_branch("Pan", None, None, fx.branch_id, 0.5)
            .await
            .unwrap()
            .id;
        fx.db
            .products()
            .update_pricing(
                second_product,
                fx.branch_id,
                &PricingUpdate {
                    price: None,
                    stock_quantity: Some(5),
                },
            )
            .await
            .unwrap();

        repo.register(&new_sale(&fx, 7, 3, "2024-03-05 11:00:00"))
            .await
            .unwrap();
        let mut second_line = new_sale(&fx, 7, 2, "2024-03-05 11:00:05");
        second_line.product_id = second_product;
        second_line.total = 1.0;
        repo.register(&second_line).await.unwrap();

        assert_eq!(stock(&fx).await, 7);

        let reversed = repo.reverse(7).await.unwrap();
        assert_eq!(reversed, 2);

        assert_eq!(stock(&fx).await, 10);
        let second_stock = fx
            .db
            .products()
            .get_listing(second_product, fx.branch_id)
            .await
            .unwrap()
            .unwrap()
            .stock_quantity;
        assert_eq!(second_stock, 5);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale")
            .fetch_one(fx.db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_reverse_unknown_document_is_not_found() {
        let fx = fixture().await;

        let err = fx.db.sales().reverse(404).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_details_use_the_sale_branch_price() {
        let fx = fixture().await;

        // Same product stocked in a second branch at a different price;
        // the receipt must show the price of the branch it was sold in.
        let norte = fx
            .db
            .branches()
            .create("Sucursal Norte", None, None, None)
            .await
            .unwrap()
            .id;
        sqlx::query(
            "INSERT INTO product_branch (product_id, branch_id, price, stock_quantity) \
             VALUES (?1, ?2, 9.9, 50)",
        )
        .bind(fx.product_id)
        .bind(norte)
        .execute(fx.db.pool())
        .await
        .unwrap();

        fx.db
            .sales()
            .register(&new_sale(&fx, 3, 2, "2024-03-05 12:00:00"))
            .await
            .unwrap();

        let details = fx.db.sales().details(3).await.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].producto, "Coca Cola 500ml");
        assert_eq!(details[0].precio, 3.5);
        assert_eq!(details[0].cantidad, 2);
        assert_eq!(details[0].numero_documento, 3);
        assert_eq!(details[0].subtotal, 7.0);
    }

    #[tokio::test]
    async fn test_print_lines_increment_print_count_per_view() {
        let fx = fixture().await;
        let repo = fx.db.sales();

        repo.register(&new_sale(&fx, 5, 1, "2024-03-05 13:00:00"))
            .await
            .unwrap();

        let lines = repo.print_lines(5).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_name, "Coca Cola 500ml");
        assert_eq!(lines[0].unit_price, 3.5);

        repo.print_lines(5).await.unwrap();

        let print_count: i64 =
            sqlx::query_scalar("SELECT print_count FROM sale WHERE document_number = 5")
                .fetch_one(fx.db.pool())
                .await
                .unwrap();
        assert_eq!(print_count, 2);
    }

    #[tokio::test]
    async fn test_print_lines_unknown_document_is_not_found() {
        let fx = fixture().await;

        let err = fx.db.sales().print_lines(404).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_daily_summaries_group_and_sum_per_document() {
        let fx = fixture().await;
        let repo = fx.db.sales();

        // Document 1: two lines on 2024-03-05
        repo.register(&new_sale(&fx, 1, 2, "2024-03-05 09:00:00"))
            .await
            .unwrap();
        repo.register(&new_sale(&fx, 1, 1, "2024-03-05 09:01:00"))
            .await
            .unwrap();
        // Document 2: one line, same day
        repo.register(&new_sale(&fx, 2, 1, "2024-03-05 16:45:00"))
            .await
            .unwrap();
        // Another day entirely
        repo.register(&new_sale(&fx, 3, 1, "2024-03-06 08:00:00"))
            .await
            .unwrap();

        let summaries = repo.daily_summaries("2024-03-05").await.unwrap();
        assert_eq!(summaries.len(), 2);

        // Ordered by document number, descending
        assert_eq!(summaries[0].numero_documento, 2);
        assert_eq!(summaries[1].numero_documento, 1);

        // Each group's total is the sum of its lines
        assert_eq!(summaries[1].total_venta, 3.5 * 3.0);
        assert_eq!(summaries[1].primer_fecha, "2024-03-05 09:00:00");
        assert_eq!(summaries[1].usuario, "lucia");
        assert_eq!(summaries[1].cliente, "CLIENTE VARIOS");
    }

    #[tokio::test]
    async fn test_daily_summaries_empty_day() {
        let fx = fixture().await;

        let summaries = fx.db.sales().daily_summaries("2024-03-05").await.unwrap();
        assert!(summaries.is_empty());
    }

    #[tokio::test]
    async fn test_total_for_day() {
        let fx = fixture().await;
        let repo = fx.db.sales();

        assert_eq!(repo.total_for_day("2024-03-05").await.unwrap(), None);

        repo.register(&new_sale(&fx, 1, 2, "2024-03-05 09:00:00"))
            .await
            .unwrap();
        repo.register(&new_sale(&fx, 2, 1, "2024-03-05 10:00:00"))
            .await
            .unwrap();

        let total = repo.total_for_day("2024-03-05").await.unwrap();
        assert_eq!(total, Some(3.5 * 3.0));
    }
}
