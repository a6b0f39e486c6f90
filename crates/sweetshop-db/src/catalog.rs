//! # Sweet Catalog
//!
//! CRUD and search for sweets. Orchestrates validation, uniqueness checks,
//! and repository calls; never touches the quantity column directly (initial
//! stock is set at creation, everything after that goes through the ledger).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::sweet::SweetRepository;
use sweetshop_core::validation::{validate_new_sweet, validate_sweet_update};
use sweetshop_core::{CatalogError, NewSweet, SearchFilters, Sweet, SweetUpdate};

/// Maps a store failure to the generic catalog error, logging the detail.
fn store_failure(err: DbError) -> CatalogError {
    error!(error = %err, "Catalog store operation failed");
    CatalogError::Store
}

/// Administrative catalog operations over sweets.
#[derive(Debug, Clone)]
pub struct SweetCatalog {
    sweets: SweetRepository,
}

impl SweetCatalog {
    /// Creates a new SweetCatalog.
    pub fn new(pool: SqlitePool) -> Self {
        SweetCatalog {
            sweets: SweetRepository::new(pool),
        }
    }

    /// Creates a sweet.
    ///
    /// ## Errors
    /// - [`CatalogError::Validation`] - input rejected, store untouched
    /// - [`CatalogError::DuplicateName`] - name already taken
    pub async fn create(&self, input: NewSweet) -> Result<Sweet, CatalogError> {
        validate_new_sweet(&input)?;

        let now = Utc::now();
        let sweet = Sweet {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            category: input.category.trim().to_string(),
            price_cents: input.price_cents,
            quantity: input.quantity,
            description: normalize_description(input.description),
            created_at: now,
            updated_at: now,
        };

        match self.sweets.insert(&sweet).await {
            Ok(()) => {
                info!(id = %sweet.id, name = %sweet.name, "Sweet created");
                Ok(sweet)
            }
            Err(err) if err.is_unique_violation() => {
                Err(CatalogError::DuplicateName(sweet.name))
            }
            Err(err) => Err(store_failure(err)),
        }
    }

    /// Updates a sweet's descriptive fields (name, category, price,
    /// description). Quantity is not updatable here.
    pub async fn update(&self, id: &str, update: SweetUpdate) -> Result<Sweet, CatalogError> {
        validate_sweet_update(&update)?;

        let mut sweet = self.require(id).await?;

        if let Some(name) = update.name {
            sweet.name = name.trim().to_string();
        }
        if let Some(category) = update.category {
            sweet.category = category.trim().to_string();
        }
        if let Some(price_cents) = update.price_cents {
            sweet.price_cents = price_cents;
        }
        if let Some(description) = update.description {
            sweet.description = normalize_description(Some(description));
        }

        match self.sweets.update(&sweet).await {
            Ok(()) => {
                debug!(id = %sweet.id, "Sweet updated");
                // Re-read to pick up the repository's updated_at stamp.
                self.require(id).await
            }
            Err(DbError::NotFound { .. }) => Err(CatalogError::SweetNotFound(id.to_string())),
            Err(err) if err.is_unique_violation() => Err(CatalogError::DuplicateName(sweet.name)),
            Err(err) => Err(store_failure(err)),
        }
    }

    /// Deletes a sweet.
    ///
    /// The purchases table references sweets without a cascade, so a sweet
    /// with purchase history cannot be deleted; the foreign key rejects it
    /// and the caller sees [`CatalogError::Store`].
    pub async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        match self.sweets.delete(id).await {
            Ok(()) => {
                info!(id = %id, "Sweet deleted");
                Ok(())
            }
            Err(DbError::NotFound { .. }) => Err(CatalogError::SweetNotFound(id.to_string())),
            Err(err) => Err(store_failure(err)),
        }
    }

    /// Gets a sweet by id.
    pub async fn get(&self, id: &str) -> Result<Sweet, CatalogError> {
        self.require(id).await
    }

    /// Lists all sweets, newest first.
    pub async fn list(&self) -> Result<Vec<Sweet>, CatalogError> {
        self.sweets.list().await.map_err(store_failure)
    }

    /// Searches sweets with the given filters, newest first.
    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<Sweet>, CatalogError> {
        self.sweets.search(filters).await.map_err(store_failure)
    }

    async fn require(&self, id: &str) -> Result<Sweet, CatalogError> {
        self.sweets
            .get_by_id(id)
            .await
            .map_err(store_failure)?
            .ok_or_else(|| CatalogError::SweetNotFound(id.to_string()))
    }
}

/// Trims a description; blank descriptions become NULL.
fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
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

    fn gummy_bears() -> NewSweet {
        NewSweet {
            name: "Gummy Bears".to_string(),
            category: "gummies".to_string(),
            price_cents: 499,
            quantity: 100,
            description: Some("  Assorted fruit flavors  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = test_db().await;

        let sweet = db.catalog().create(gummy_bears()).await.unwrap();
        assert_eq!(sweet.name, "Gummy Bears");
        assert_eq!(sweet.description.as_deref(), Some("Assorted fruit flavors"));

        let fetched = db.catalog().get(&sweet.id).await.unwrap();
        assert_eq!(fetched.price_cents, 499);
        assert_eq!(fetched.quantity, 100);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let db = test_db().await;

        let err = db
            .catalog()
            .create(NewSweet {
                name: "G".to_string(),
                category: "".to_string(),
                price_cents: -1,
                quantity: -2,
                description: None,
            })
            .await
            .unwrap_err();

        match err {
            CatalogError::Validation(failed) => assert_eq!(failed.violations().len(), 4),
            other => panic!("expected Validation, got {other:?}"),
        }

        assert_eq!(db.sweets().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_duplicate_name() {
        let db = test_db().await;

        db.catalog().create(gummy_bears()).await.unwrap();
        let err = db.catalog().create(gummy_bears()).await.unwrap_err();

        assert!(matches!(err, CatalogError::DuplicateName(name) if name == "Gummy Bears"));
    }

    #[tokio::test]
    async fn test_update_descriptive_fields() {
        let db = test_db().await;
        let sweet = db.catalog().create(gummy_bears()).await.unwrap();

        let updated = db
            .catalog()
            .update(
                &sweet.id,
                SweetUpdate {
                    price_cents: Some(599),
                    description: Some("".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price_cents, 599);
        assert_eq!(updated.description, None);
        // Stock is untouched by catalog updates.
        assert_eq!(updated.quantity, 100);
    }

    #[tokio::test]
    async fn test_update_unknown_sweet() {
        let db = test_db().await;

        let err = db
            .catalog()
            .update("no-such-id", SweetUpdate::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::SweetNotFound(_)));
    }

    #[tokio::test]
    async fn test_update_name_conflict() {
        let db = test_db().await;
        db.catalog().create(gummy_bears()).await.unwrap();
        let other = db
            .catalog()
            .create(NewSweet {
                name: "Sour Worms".to_string(),
                ..gummy_bears()
            })
            .await
            .unwrap();

        let err = db
            .catalog()
            .update(
                &other.id,
                SweetUpdate {
                    name: Some("Gummy Bears".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let sweet = db.catalog().create(gummy_bears()).await.unwrap();

        db.catalog().delete(&sweet.id).await.unwrap();

        let err = db.catalog().get(&sweet.id).await.unwrap_err();
        assert!(matches!(err, CatalogError::SweetNotFound(_)));

        let err = db.catalog().delete(&sweet.id).await.unwrap_err();
        assert!(matches!(err, CatalogError::SweetNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_blocked_by_purchase_history() {
        use chrono::Utc;
        use sweetshop_core::validation::PurchaseRequest;
        use sweetshop_core::User;

        let db = test_db().await;
        let sweet = db.catalog().create(gummy_bears()).await.unwrap();

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: "buyer@example.com".to_string(),
            name: "Buyer".to_string(),
            created_at: Utc::now(),
        };
        db.users().insert(&user).await.unwrap();

        db.ledger()
            .purchase(
                &sweet.id,
                PurchaseRequest {
                    quantity: Some(1.0),
                    purchaser_id: Some(user.id),
                },
            )
            .await
            .unwrap();

        // The purchases foreign key rejects the delete; the sweet and its
        // history both survive.
        let err = db.catalog().delete(&sweet.id).await.unwrap_err();
        assert!(matches!(err, CatalogError::Store));

        assert!(db.catalog().get(&sweet.id).await.is_ok());
        assert_eq!(db.purchases().count_for_sweet(&sweet.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_filters() {
        let db = test_db().await;
        let catalog = db.catalog();

        catalog.create(gummy_bears()).await.unwrap();
        catalog
            .create(NewSweet {
                name: "Dark Chocolate Bar".to_string(),
                category: "chocolate".to_string(),
                price_cents: 1299,
                quantity: 10,
                description: None,
            })
            .await
            .unwrap();
        catalog
            .create(NewSweet {
                name: "Milk Chocolate Truffles".to_string(),
                category: "chocolate".to_string(),
                price_cents: 1899,
                quantity: 5,
                description: None,
            })
            .await
            .unwrap();

        // Name substring
        let results = catalog
            .search(&SearchFilters {
                name: Some("chocolate".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(results.len(), 2);

        // Category + price range combine with AND
        let results = catalog
            .search(&SearchFilters {
                category: Some("chocolate".to_string()),
                min_price_cents: Some(1500),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Milk Chocolate Truffles");

        // No filters returns everything
        let results = catalog.search(&SearchFilters::default()).await.unwrap();
        assert_eq!(results.len(), 3);

        // Price ceiling
        let results = catalog
            .search(&SearchFilters {
                max_price_cents: Some(500),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Gummy Bears");
    }
}
