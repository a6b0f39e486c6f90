//! # Stock Ledger
//!
//! The transactional inventory mutation protocol. This module is the only
//! code path allowed to change a sweet's quantity once it has stock, and the
//! only code path allowed to create a purchase row.
//!
//! ## Purchase Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Purchase Transaction                              │
//! │                                                                         │
//! │  PurchaseRequest                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Validation gate (pure, no store access)                               │
//! │       │ ok                                                              │
//! │       ▼                                                                 │
//! │  BEGIN ────────────────────────────────────────────────┐               │
//! │  │  purchaser exists?          no → PurchaserNotFound  │               │
//! │  │  load sweet                 absent → SweetNotFound  │               │
//! │  │  requested <= quantity?     no → InsufficientStock  │               │
//! │  │  total = price × quantity   (price snapshot)        │               │
//! │  │  INSERT purchase row                                │               │
//! │  │  UPDATE quantity - n WHERE quantity >= n            │               │
//! │  │       0 rows → InsufficientStock (lost a race)      │               │
//! │  COMMIT ───────────────────────────────────────────────┘               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PurchaseOutcome { purchase, updated_sweet }                           │
//! │                                                                         │
//! │  Any early return drops the transaction, which rolls it back:          │
//! │  a purchase row without a decrement (or vice versa) cannot exist.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The in-transaction read produces the friendly `InsufficientStock` numbers;
//! the conditional `UPDATE ... WHERE quantity >= ?` is the enforcing write.
//! Two concurrent purchases that individually fit but jointly exceed stock
//! resolve to exactly one success: the loser either re-reads the decremented
//! quantity or hits the zero-rows-affected branch. Purchases against
//! different sweets do not contend beyond SQLite's single writer.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::DbError;
use sweetshop_core::validation::{PurchaseRequest, RestockRequest};
use sweetshop_core::{LedgerError, Purchase, PurchaseOutcome, Sweet};

const SWEET_COLUMNS: &str =
    "id, name, category, price_cents, quantity, description, created_at, updated_at";

/// Maps a store failure to the generic ledger error, logging the detail.
/// Raw database error text must never reach the caller.
fn store_failure(err: DbError) -> LedgerError {
    error!(error = %err, "Ledger store operation failed");
    LedgerError::Store
}

/// The stock ledger operation: transactional purchase and restock against a
/// shared stock counter.
#[derive(Debug, Clone)]
pub struct StockLedger {
    pool: SqlitePool,
}

impl StockLedger {
    /// Creates a new StockLedger.
    pub fn new(pool: SqlitePool) -> Self {
        StockLedger { pool }
    }

    /// Purchases `quantity` units of a sweet for a purchaser.
    ///
    /// ## Errors
    /// - [`LedgerError::Validation`] - input rejected, store untouched
    /// - [`LedgerError::PurchaserNotFound`] - unknown purchaser
    /// - [`LedgerError::SweetNotFound`] - unknown sweet
    /// - [`LedgerError::InsufficientStock`] - requested more than available
    /// - [`LedgerError::Store`] - infrastructure failure
    ///
    /// On success, returns the immutable purchase record (with the total
    /// price snapshotted from the price read inside this transaction) and
    /// the sweet as it looks after the decrement.
    pub async fn purchase(
        &self,
        sweet_id: &str,
        request: PurchaseRequest,
    ) -> Result<PurchaseOutcome, LedgerError> {
        // Gate first: no store access for invalid input.
        let input = request.validate()?;

        debug!(sweet_id = %sweet_id, quantity = input.quantity, purchaser_id = %input.purchaser_id, "Purchase requested");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_failure(e.into()))?;

        // Purchaser must exist before anything is written.
        let purchaser: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ?1")
            .bind(&input.purchaser_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| store_failure(e.into()))?;

        if purchaser.is_none() {
            return Err(LedgerError::PurchaserNotFound(input.purchaser_id));
        }

        // Load the sweet inside the transaction; this read supplies both the
        // stock check numbers and the price snapshot.
        let sweet = sqlx::query_as::<_, Sweet>(&format!(
            "SELECT {SWEET_COLUMNS} FROM sweets WHERE id = ?1"
        ))
        .bind(sweet_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| store_failure(e.into()))?
        .ok_or_else(|| LedgerError::SweetNotFound(sweet_id.to_string()))?;

        if !sweet.has_stock_for(input.quantity) {
            return Err(LedgerError::InsufficientStock {
                name: sweet.name,
                available: sweet.quantity,
                requested: input.quantity,
            });
        }

        // Price changes made after this read must not affect this purchase.
        let total_price = sweet.price().saturating_mul(input.quantity);
        let now = Utc::now();

        let purchase = Purchase {
            id: Uuid::new_v4().to_string(),
            sweet_id: sweet.id.clone(),
            user_id: input.purchaser_id.clone(),
            quantity: input.quantity,
            total_price_cents: total_price.cents(),
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO purchases (
                id, sweet_id, user_id, quantity, total_price_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&purchase.id)
        .bind(&purchase.sweet_id)
        .bind(&purchase.user_id)
        .bind(purchase.quantity)
        .bind(purchase.total_price_cents)
        .bind(purchase.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| store_failure(e.into()))?;

        // Conditional decrement: the quantity guard makes this a
        // compare-and-swap, so a writer that committed between our read and
        // this write can only push us into the zero-rows branch, never below
        // zero stock.
        let result = sqlx::query(
            r#"
            UPDATE sweets SET
                quantity = quantity - ?2,
                updated_at = ?3
            WHERE id = ?1 AND quantity >= ?2
            "#,
        )
        .bind(&sweet.id)
        .bind(input.quantity)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| store_failure(e.into()))?;

        if result.rows_affected() == 0 {
            // Transaction drops here and rolls back the purchase insert.
            return Err(LedgerError::InsufficientStock {
                name: sweet.name,
                available: sweet.quantity,
                requested: input.quantity,
            });
        }

        tx.commit().await.map_err(|e| store_failure(e.into()))?;

        info!(
            sweet_id = %sweet.id,
            purchase_id = %purchase.id,
            quantity = input.quantity,
            total = %total_price,
            "Purchase committed"
        );

        let updated_sweet = Sweet {
            quantity: sweet.quantity - input.quantity,
            updated_at: now,
            ..sweet
        };

        Ok(PurchaseOutcome {
            purchase,
            updated_sweet,
        })
    }

    /// Restocks a sweet by `quantity` units.
    ///
    /// No audit row is produced: restock has no total price to snapshot,
    /// so the asymmetry with purchase is intentional.
    ///
    /// ## Errors
    /// - [`LedgerError::Validation`] - input rejected, store untouched
    /// - [`LedgerError::SweetNotFound`] - unknown sweet
    /// - [`LedgerError::Store`] - infrastructure failure
    pub async fn restock(
        &self,
        sweet_id: &str,
        request: RestockRequest,
    ) -> Result<Sweet, LedgerError> {
        let input = request.validate()?;

        debug!(sweet_id = %sweet_id, quantity = input.quantity, "Restock requested");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_failure(e.into()))?;

        let sweet = sqlx::query_as::<_, Sweet>(&format!(
            "SELECT {SWEET_COLUMNS} FROM sweets WHERE id = ?1"
        ))
        .bind(sweet_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| store_failure(e.into()))?
        .ok_or_else(|| LedgerError::SweetNotFound(sweet_id.to_string()))?;

        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE sweets SET
                quantity = quantity + ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(&sweet.id)
        .bind(input.quantity)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| store_failure(e.into()))?;

        tx.commit().await.map_err(|e| store_failure(e.into()))?;

        info!(sweet_id = %sweet.id, quantity = input.quantity, "Restock committed");

        Ok(Sweet {
            quantity: sweet.quantity + input.quantity,
            updated_at: now,
            ..sweet
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use sweetshop_core::{LedgerError, NewSweet, User};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_user(db: &Database) -> String {
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: format!("{}@example.com", Uuid::new_v4()),
            name: "Test Purchaser".to_string(),
            created_at: Utc::now(),
        };
        db.users().insert(&user).await.unwrap();
        user.id
    }

    async fn seed_sweet(db: &Database, price_cents: i64, quantity: i64) -> String {
        let sweet = db
            .catalog()
            .create(NewSweet {
                name: format!("Fudge {}", Uuid::new_v4()),
                category: "chocolate".to_string(),
                price_cents,
                quantity,
                description: None,
            })
            .await
            .unwrap();
        sweet.id
    }

    fn purchase_request(quantity: f64, purchaser_id: &str) -> PurchaseRequest {
        PurchaseRequest {
            quantity: Some(quantity),
            purchaser_id: Some(purchaser_id.to_string()),
        }
    }

    #[tokio::test]
    async fn test_purchase_decrements_stock_and_snapshots_total() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        // $15.99, 50 in stock
        let sweet_id = seed_sweet(&db, 1599, 50).await;

        let outcome = db
            .ledger()
            .purchase(&sweet_id, purchase_request(2.0, &user_id))
            .await
            .unwrap();

        // $15.99 × 2 = $31.98
        assert_eq!(outcome.purchase.total_price_cents, 3198);
        assert_eq!(outcome.purchase.quantity, 2);
        assert_eq!(outcome.updated_sweet.quantity, 48);

        // The returned sweet matches what was committed.
        let stored = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 48);

        // The audit row exists and is readable.
        let stored_purchase = db
            .purchases()
            .get_by_id(&outcome.purchase.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored_purchase.total_price_cents, 3198);
        assert_eq!(stored_purchase.user_id, user_id);
    }

    #[tokio::test]
    async fn test_purchase_insufficient_stock_leaves_store_unchanged() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let sweet_id = seed_sweet(&db, 500, 3).await;

        let err = db
            .ledger()
            .purchase(&sweet_id, purchase_request(5.0, &user_id))
            .await
            .unwrap_err();

        match err {
            LedgerError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 3);
                assert_eq!(requested, 5);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        let stored = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 3);
        assert_eq!(db.purchases().count_for_sweet(&sweet_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_repeated_failed_purchase_never_mutates_state() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let sweet_id = seed_sweet(&db, 500, 3).await;

        for _ in 0..3 {
            let err = db
                .ledger()
                .purchase(&sweet_id, purchase_request(10.0, &user_id))
                .await
                .unwrap_err();
            assert!(matches!(err, LedgerError::InsufficientStock { .. }));

            let stored = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();
            assert_eq!(stored.quantity, 3);
            assert_eq!(db.purchases().count_for_sweet(&sweet_id).await.unwrap(), 0);
        }
    }

    #[tokio::test]
    async fn test_purchase_validation_failure_before_store_access() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let sweet_id = seed_sweet(&db, 1000, 20).await;

        let err = db
            .ledger()
            .purchase(&sweet_id, purchase_request(0.0, &user_id))
            .await
            .unwrap_err();

        match err {
            LedgerError::Validation(failed) => {
                assert_eq!(failed.messages(), vec!["quantity must be greater than 0"]);
            }
            other => panic!("expected Validation, got {other:?}"),
        }

        let stored = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 20);
        assert_eq!(db.purchases().count_for_sweet(&sweet_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_purchase_unknown_sweet() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;

        let err = db
            .ledger()
            .purchase("no-such-sweet", purchase_request(1.0, &user_id))
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::SweetNotFound(_)));
    }

    #[tokio::test]
    async fn test_purchase_unknown_purchaser() {
        let db = test_db().await;
        let sweet_id = seed_sweet(&db, 1000, 20).await;

        let err = db
            .ledger()
            .purchase(&sweet_id, purchase_request(1.0, "no-such-user"))
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::PurchaserNotFound(_)));

        let stored = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 20);
    }

    #[tokio::test]
    async fn test_concurrent_purchases_exactly_one_succeeds() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        // 10 in stock; two purchases of 6 individually fit but jointly exceed it.
        let sweet_id = seed_sweet(&db, 250, 10).await;

        let ledger_a = db.ledger();
        let ledger_b = db.ledger();
        let (a, b) = tokio::join!(
            ledger_a.purchase(&sweet_id, purchase_request(6.0, &user_id)),
            ledger_b.purchase(&sweet_id, purchase_request(6.0, &user_id)),
        );

        let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(successes, 1, "exactly one purchase must win");

        let loser = if a.is_ok() { b } else { a };
        assert!(matches!(
            loser.unwrap_err(),
            LedgerError::InsufficientStock { .. }
        ));

        let stored = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 4);
        assert_eq!(db.purchases().count_for_sweet(&sweet_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_price_edits_do_not_rewrite_history() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let sweet_id = seed_sweet(&db, 1599, 50).await;

        let outcome = db
            .ledger()
            .purchase(&sweet_id, purchase_request(2.0, &user_id))
            .await
            .unwrap();

        // Double the price after the purchase.
        let mut sweet = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();
        sweet.price_cents = 3198;
        db.sweets().update(&sweet).await.unwrap();

        let stored_purchase = db
            .purchases()
            .get_by_id(&outcome.purchase.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored_purchase.total_price_cents, 3198);
    }

    #[tokio::test]
    async fn test_restock_increments_stock_without_audit_row() {
        let db = test_db().await;
        let sweet_id = seed_sweet(&db, 750, 20).await;

        let updated = db
            .ledger()
            .restock(
                &sweet_id,
                RestockRequest {
                    quantity: Some(30.0),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.quantity, 50);

        let stored = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 50);
        assert_eq!(db.purchases().count_for_sweet(&sweet_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_restock_unknown_sweet() {
        let db = test_db().await;

        let err = db
            .ledger()
            .restock(
                "no-such-sweet",
                RestockRequest {
                    quantity: Some(5.0),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::SweetNotFound(_)));
    }

    #[tokio::test]
    async fn test_restock_validation_failure() {
        let db = test_db().await;
        let sweet_id = seed_sweet(&db, 750, 20).await;

        let err = db
            .ledger()
            .restock(&sweet_id, RestockRequest { quantity: None })
            .await
            .unwrap_err();

        match err {
            LedgerError::Validation(failed) => {
                assert_eq!(failed.messages(), vec!["quantity is required"]);
            }
            other => panic!("expected Validation, got {other:?}"),
        }

        let stored = db.sweets().get_by_id(&sweet_id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 20);
    }
}
