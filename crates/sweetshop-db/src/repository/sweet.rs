//! # Sweet Repository
//!
//! Database operations for sweets.
//!
//! ## Key Operations
//! - CRUD operations (quantity excluded from updates)
//! - Filtered search (name substring, category, price range)
//!
//! ## Stock Is Off Limits Here
//! `update` deliberately never writes the quantity column. Stock moves only
//! through the ledger's transaction, which is what keeps two concurrent
//! purchases from both passing a stale stock check.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use sweetshop_core::{SearchFilters, Sweet};

const SWEET_COLUMNS: &str =
    "id, name, category, price_cents, quantity, description, created_at, updated_at";

/// Repository for sweet database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = SweetRepository::new(pool);
///
/// // Filtered search
/// let results = repo.search(&filters).await?;
///
/// // Get by ID
/// let sweet = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct SweetRepository {
    pool: SqlitePool,
}

impl SweetRepository {
    /// Creates a new SweetRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SweetRepository { pool }
    }

    /// Lists all sweets, newest first.
    pub async fn list(&self) -> DbResult<Vec<Sweet>> {
        let sweets = sqlx::query_as::<_, Sweet>(&format!(
            "SELECT {SWEET_COLUMNS} FROM sweets ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(sweets)
    }

    /// Searches sweets with optional filters, newest first.
    ///
    /// ## Filters
    /// - `name`: case-insensitive substring match
    /// - `category`: exact match
    /// - `min_price_cents` / `max_price_cents`: inclusive bounds
    ///
    /// A `NULL` bind disables the corresponding filter, so one static query
    /// covers every filter combination.
    pub async fn search(&self, filters: &SearchFilters) -> DbResult<Vec<Sweet>> {
        debug!(?filters, "Searching sweets");

        let sweets = sqlx::query_as::<_, Sweet>(&format!(
            r#"
            SELECT {SWEET_COLUMNS}
            FROM sweets
            WHERE (?1 IS NULL OR name LIKE '%' || ?1 || '%')
              AND (?2 IS NULL OR category = ?2)
              AND (?3 IS NULL OR price_cents >= ?3)
              AND (?4 IS NULL OR price_cents <= ?4)
            ORDER BY created_at DESC
            "#
        ))
        .bind(filters.name.as_deref().map(str::trim))
        .bind(filters.category.as_deref().map(str::trim))
        .bind(filters.min_price_cents)
        .bind(filters.max_price_cents)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = sweets.len(), "Search returned sweets");
        Ok(sweets)
    }

    /// Gets a sweet by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Sweet))` - Sweet found
    /// * `Ok(None)` - Sweet not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sweet>> {
        let sweet = sqlx::query_as::<_, Sweet>(&format!(
            "SELECT {SWEET_COLUMNS} FROM sweets WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sweet)
    }

    /// Gets a sweet by its (unique) name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Sweet>> {
        let sweet = sqlx::query_as::<_, Sweet>(&format!(
            "SELECT {SWEET_COLUMNS} FROM sweets WHERE name = ?1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sweet)
    }

    /// Inserts a new sweet.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn insert(&self, sweet: &Sweet) -> DbResult<()> {
        debug!(id = %sweet.id, name = %sweet.name, "Inserting sweet");

        sqlx::query(
            r#"
            INSERT INTO sweets (
                id, name, category, price_cents, quantity, description,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&sweet.id)
        .bind(&sweet.name)
        .bind(&sweet.category)
        .bind(sweet.price_cents)
        .bind(sweet.quantity)
        .bind(&sweet.description)
        .bind(sweet.created_at)
        .bind(sweet.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a sweet's descriptive fields.
    ///
    /// Writes name, category, price, and description from the given value.
    /// The quantity column is NOT part of this statement.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Sweet doesn't exist
    pub async fn update(&self, sweet: &Sweet) -> DbResult<()> {
        debug!(id = %sweet.id, "Updating sweet");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE sweets SET
                name = ?2,
                category = ?3,
                price_cents = ?4,
                description = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&sweet.id)
        .bind(&sweet.name)
        .bind(&sweet.category)
        .bind(sweet.price_cents)
        .bind(&sweet.description)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sweet", &sweet.id));
        }

        Ok(())
    }

    /// Deletes a sweet.
    ///
    /// `purchases.sweet_id` has no `ON DELETE` clause, so deleting a sweet
    /// that has purchase rows fails with a foreign key violation.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting sweet");

        let result = sqlx::query("DELETE FROM sweets WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sweet", id));
        }

        Ok(())
    }

    /// Counts sweets (for diagnostics and seed guards).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sweets")
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
    use sweetshop_core::NewSweet;

    #[tokio::test]
    async fn test_get_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.catalog()
            .create(NewSweet {
                name: "Lemon Drops".to_string(),
                category: "hard candy".to_string(),
                price_cents: 399,
                quantity: 150,
                description: None,
            })
            .await
            .unwrap();

        let found = db.sweets().get_by_name("Lemon Drops").await.unwrap();
        assert_eq!(found.unwrap().price_cents, 399);

        let missing = db.sweets().get_by_name("Pear Drops").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sweet = sweetshop_core::Sweet {
            id: "no-such-id".to_string(),
            name: "Ghost".to_string(),
            category: "none".to_string(),
            price_cents: 1,
            quantity: 0,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let err = db.sweets().update(&sweet).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
