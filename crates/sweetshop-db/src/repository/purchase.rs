//! # Purchase Repository
//!
//! Database operations for purchase audit rows.
//!
//! Purchase rows are immutable: they are inserted by the stock ledger in the
//! same transaction as the stock decrement and never updated afterwards.
//! There is intentionally no insert method on this repository - creating a
//! purchase outside the ledger transaction would break the all-or-nothing
//! guarantee, so the insert lives in `ledger.rs` where it can bind to the
//! transaction.

use sqlx::SqlitePool;

use crate::error::DbResult;
use sweetshop_core::Purchase;

const PURCHASE_COLUMNS: &str = "id, sweet_id, user_id, quantity, total_price_cents, created_at";

/// Repository for reading purchase history.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Gets a purchase by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Purchase>> {
        let purchase = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(purchase)
    }

    /// Lists purchases for a sweet, newest first.
    pub async fn list_for_sweet(&self, sweet_id: &str) -> DbResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE sweet_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(sweet_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases)
    }

    /// Lists purchases made by a user, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE user_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases)
    }

    /// Counts purchase rows for a sweet (used by tests and diagnostics).
    pub async fn count_for_sweet(&self, sweet_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases WHERE sweet_id = ?1")
            .bind(sweet_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use sweetshop_core::validation::PurchaseRequest;
    use sweetshop_core::{NewSweet, User};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_history_listings() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: "history@example.com".to_string(),
            name: "History Reader".to_string(),
            created_at: Utc::now(),
        };
        db.users().insert(&user).await.unwrap();

        let sweet = db
            .catalog()
            .create(NewSweet {
                name: "Cola Bottles".to_string(),
                category: "gummies".to_string(),
                price_cents: 449,
                quantity: 100,
                description: None,
            })
            .await
            .unwrap();

        for _ in 0..2 {
            db.ledger()
                .purchase(
                    &sweet.id,
                    PurchaseRequest {
                        quantity: Some(3.0),
                        purchaser_id: Some(user.id.clone()),
                    },
                )
                .await
                .unwrap();
        }

        let for_sweet = db.purchases().list_for_sweet(&sweet.id).await.unwrap();
        assert_eq!(for_sweet.len(), 2);
        assert!(for_sweet.iter().all(|p| p.quantity == 3));

        let for_user = db.purchases().list_for_user(&user.id).await.unwrap();
        assert_eq!(for_user.len(), 2);
        assert_eq!(db.purchases().count_for_sweet(&sweet.id).await.unwrap(), 2);
    }
}
