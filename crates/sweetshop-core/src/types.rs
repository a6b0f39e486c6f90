//! # Domain Types
//!
//! Core domain types used throughout the sweet shop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Sweet       │   │    Purchase     │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name (unique)  │   │  sweet_id (FK)  │   │  email (unique) │       │
//! │  │  category       │   │  user_id (FK)   │   │  name           │       │
//! │  │  price_cents    │   │  quantity       │   │                 │       │
//! │  │  quantity       │   │  total_price    │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Invariant
//! `Sweet.quantity` is never negative. Once a sweet exists, its quantity is
//! only ever changed by the stock ledger (purchase decrements, restock
//! increments) inside a store transaction. `SweetUpdate` deliberately has no
//! quantity field, so direct edits cannot touch the concurrency-sensitive
//! path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Sweet
// =============================================================================

/// A sweet available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sweet {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name. Unique across the shop.
    pub name: String,

    /// Category used for browsing and search (e.g. "chocolate", "gummies").
    pub category: String,

    /// Price in cents (smallest currency unit). Never negative.
    pub price_cents: i64,

    /// Sellable units in stock. Never negative; mutated only by the ledger.
    pub quantity: i64,

    /// Optional free-text description.
    pub description: Option<String>,

    /// When the sweet was created.
    pub created_at: DateTime<Utc>,

    /// When the sweet was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Sweet {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether the requested quantity fits in the current stock.
    ///
    /// This is the read-side check; the ledger re-enforces it with a
    /// conditional update inside the same transaction.
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        quantity <= self.quantity
    }
}

// =============================================================================
// Purchase
// =============================================================================

/// An immutable audit record produced by a successful purchase.
///
/// ## Snapshot Pattern
/// `total_price_cents` is `price × quantity` using the price read in the
/// purchase transaction. Later price edits never change it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Purchase {
    pub id: String,
    /// Sweet that was purchased.
    pub sweet_id: String,
    /// User who made the purchase.
    pub user_id: String,
    /// Units purchased. Always positive.
    pub quantity: i64,
    /// Total price in cents, frozen at purchase time.
    pub total_price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Purchase {
    /// Returns the snapshotted total as Money.
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

// =============================================================================
// User
// =============================================================================

/// A purchaser reference.
///
/// The ledger only needs purchasers to exist; credentials and token issuance
/// live with the authentication collaborator, outside this workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    /// Unique login email.
    pub email: String,
    /// Display name.
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Catalog Inputs
// =============================================================================

/// Input for creating a sweet (administrative action).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    /// Initial stock level. Subsequent changes go through the ledger.
    pub quantity: i64,
    pub description: Option<String>,
}

/// Partial update for a sweet's descriptive fields.
///
/// `None` leaves a field unchanged. There is intentionally no quantity field
/// here; stock moves only through [`crate::validation`] + the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweetUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price_cents: Option<i64>,
    /// `Some("")` clears the description; `None` leaves it unchanged.
    pub description: Option<String>,
}

impl SweetUpdate {
    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price_cents.is_none()
            && self.description.is_none()
    }
}

/// Filters for catalog search. All filters are optional and combined with AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Case-insensitive substring match on the name.
    pub name: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Inclusive lower price bound, in cents.
    pub min_price_cents: Option<i64>,
    /// Inclusive upper price bound, in cents.
    pub max_price_cents: Option<i64>,
}

// =============================================================================
// Ledger Output
// =============================================================================

/// Result of a successful purchase: the audit record plus the sweet as it
/// looks after the stock decrement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOutcome {
    pub purchase: Purchase,
    pub updated_sweet: Sweet,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sweet(price_cents: i64, quantity: i64) -> Sweet {
        let now = Utc::now();
        Sweet {
            id: "s-1".to_string(),
            name: "Fudge".to_string(),
            category: "chocolate".to_string(),
            price_cents,
            quantity,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_has_stock_for() {
        let s = sweet(1599, 10);
        assert!(s.has_stock_for(10));
        assert!(s.has_stock_for(1));
        assert!(!s.has_stock_for(11));
    }

    #[test]
    fn test_price_as_money() {
        let s = sweet(1599, 10);
        assert_eq!((s.price() * 2).cents(), 3198);
    }

    #[test]
    fn test_sweet_update_is_empty() {
        assert!(SweetUpdate::default().is_empty());
        let update = SweetUpdate {
            price_cents: Some(100),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
