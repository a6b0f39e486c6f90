//! # Error Types
//!
//! Domain-specific error types for sweetshop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sweetshop-core errors (this file)                                     │
//! │  ├── ValidationError   - A single input violation                      │
//! │  ├── ValidationFailed  - The COMPLETE violation list for a request     │
//! │  ├── LedgerError       - Purchase/restock outcomes                     │
//! │  └── CatalogError      - Sweet CRUD/search outcomes                    │
//! │                                                                         │
//! │  sweetshop-db errors (separate crate)                                  │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  Flow: ValidationFailed → LedgerError ← DbError (mapped, detail        │
//! │  logged, never leaked)                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (name, available stock, etc.)
//! 3. Errors are enum variants, never String
//! 4. The store variant carries NO schema or driver detail - the HTTP layer
//!    must never see raw database error text

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// A single input validation violation.
///
/// These occur when user input doesn't meet requirements. The validation
/// gate collects every violation for a request into a [`ValidationFailed`]
/// rather than stopping at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be greater than 0")]
    MustBePositive { field: String },

    /// Value must be a whole number (no fractional part).
    #[error("{field} must be a whole number")]
    NotAnInteger { field: String },

    /// Value must not be negative (zero is allowed).
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters long")]
    TooShort { field: String, min: usize },
}

/// The complete set of violations for one request.
///
/// ## Why a list?
/// A caller should be able to display every problem at once, so the gate
/// never short-circuits across fields. Same input always yields the same
/// violation set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailed(pub Vec<ValidationError>);

impl ValidationFailed {
    /// The individual violations.
    pub fn violations(&self) -> &[ValidationError] {
        &self.0
    }

    /// Human-readable message per violation, in check order.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|v| v.to_string()).collect()
    }
}

impl std::fmt::Display for ValidationFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed: {}", self.messages().join("; "))
    }
}

impl std::error::Error for ValidationFailed {}

// =============================================================================
// Ledger Error
// =============================================================================

/// Outcomes of the stock ledger operations (purchase, restock).
///
/// Each variant maps cleanly onto an HTTP status for the (external) API
/// layer: `Validation` → 400, `PurchaserNotFound` → 401, `SweetNotFound`
/// → 404, `InsufficientStock` → 409, `Store` → 500.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Client input error. No store access has occurred.
    #[error(transparent)]
    Validation(#[from] ValidationFailed),

    /// Sweet cannot be found.
    #[error("Sweet not found: {0}")]
    SweetNotFound(String),

    /// Purchaser does not exist in the identity store.
    #[error("Purchaser not found: {0}")]
    PurchaserNotFound(String),

    /// Requested quantity exceeds available stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Purchase (qty: 5)
    ///      │
    ///      ▼
    /// Ledger loads sweet: quantity = 3
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Fudge", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 Fudge in stock"
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Infrastructure failure. The underlying detail is logged via tracing
    /// in the db layer; callers only see this generic message.
    #[error("store operation failed")]
    Store,
}

// =============================================================================
// Catalog Error
// =============================================================================

/// Outcomes of the sweet catalog operations (create, update, delete, get).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Client input error. No store access has occurred.
    #[error(transparent)]
    Validation(#[from] ValidationFailed),

    /// Sweet cannot be found.
    #[error("Sweet not found: {0}")]
    SweetNotFound(String),

    /// A sweet with this name already exists.
    #[error("Sweet with name '{0}' already exists")]
    DuplicateName(String),

    /// Infrastructure failure, detail logged in the db layer.
    #[error("store operation failed")]
    Store,
}

// =============================================================================
// Unit Tests
// =============================================================================
