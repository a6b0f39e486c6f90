//! # Validation Gate
//!
//! Input validation for the sweet shop. Every request is checked here before
//! any store access, and every violation is collected - not just the first.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP boundary (external)                                     │
//! │  ├── JSON shape / deserialization into the raw request structs         │
//! │  └── Immediate 400 on malformed bodies                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Raw request ──validate()──► Validated struct                      │
//! │  └── ValidationFailed carries the COMPLETE violation list              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── CHECK (quantity >= 0) as the last line of defense                 │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Raw vs Validated
//! Raw structs keep `Option` fields so "missing" survives deserialization,
//! and quantities arrive as `f64` so "not a whole number" is checkable.
//! The ledger and catalog only ever accept the validated structs, so
//! unvalidated shape-free data never reaches a transaction.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationFailed};
use crate::types::{NewSweet, SweetUpdate};
use crate::MIN_SWEET_NAME_LEN;

// =============================================================================
// Request Structs
// =============================================================================

/// Raw purchase request as deserialized at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub quantity: Option<f64>,
    pub purchaser_id: Option<String>,
}

/// Raw restock request as deserialized at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestockRequest {
    pub quantity: Option<f64>,
}

/// A purchase request that passed the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPurchase {
    pub quantity: i64,
    pub purchaser_id: String,
}

/// A restock request that passed the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedRestock {
    pub quantity: i64,
}

// =============================================================================
// Quantity Checks
// =============================================================================

/// Validates a requested quantity change, pushing violations onto `out`.
///
/// ## Rules
/// - Must be present
/// - Must be strictly positive
/// - Must be a whole number
///
/// The checks within this one field are sequential (a missing quantity
/// yields exactly one violation, not three), but the caller keeps checking
/// its other fields so the final list is complete.
fn check_quantity(quantity: Option<f64>, out: &mut Vec<ValidationError>) -> Option<i64> {
    let field = "quantity".to_string();

    let Some(qty) = quantity else {
        out.push(ValidationError::Required { field });
        return None;
    };

    if !qty.is_finite() || qty <= 0.0 {
        out.push(ValidationError::MustBePositive { field });
        return None;
    }

    if qty.fract() != 0.0 {
        out.push(ValidationError::NotAnInteger { field });
        return None;
    }

    Some(qty as i64)
}

/// Validates the purchaser reference, pushing a violation onto `out`.
fn check_purchaser_id(purchaser_id: Option<String>, out: &mut Vec<ValidationError>) -> Option<String> {
    let id = purchaser_id.map(|id| id.trim().to_string()).unwrap_or_default();
    if id.is_empty() {
        out.push(ValidationError::Required {
            field: "purchaser id".to_string(),
        });
        return None;
    }
    Some(id)
}

// =============================================================================
// Gate Entry Points
// =============================================================================

impl PurchaseRequest {
    /// Runs the validation gate for a purchase.
    ///
    /// Returns every violation together, so a caller can display all
    /// problems at once. No side effects; deterministic.
    ///
    /// ## Example
    /// ```rust
    /// use sweetshop_core::validation::PurchaseRequest;
    ///
    /// let bad = PurchaseRequest { quantity: Some(0.0), purchaser_id: None };
    /// let failed = bad.validate().unwrap_err();
    /// assert_eq!(failed.violations().len(), 2);
    /// ```
    pub fn validate(self) -> Result<ValidatedPurchase, ValidationFailed> {
        let mut violations = Vec::new();

        let quantity = check_quantity(self.quantity, &mut violations);
        let purchaser_id = check_purchaser_id(self.purchaser_id, &mut violations);

        match (quantity, purchaser_id) {
            (Some(quantity), Some(purchaser_id)) => Ok(ValidatedPurchase {
                quantity,
                purchaser_id,
            }),
            _ => Err(ValidationFailed(violations)),
        }
    }
}

impl RestockRequest {
    /// Runs the validation gate for a restock. Same quantity checks as a
    /// purchase, no purchaser check.
    pub fn validate(self) -> Result<ValidatedRestock, ValidationFailed> {
        let mut violations = Vec::new();

        match check_quantity(self.quantity, &mut violations) {
            Some(quantity) => Ok(ValidatedRestock { quantity }),
            None => Err(ValidationFailed(violations)),
        }
    }
}

// =============================================================================
// Catalog Validation
// =============================================================================

fn check_name(name: &str, required_field: bool, out: &mut Vec<ValidationError>) {
    let name = name.trim();
    if name.is_empty() {
        if required_field {
            out.push(ValidationError::Required {
                field: "name".to_string(),
            });
        } else {
            out.push(ValidationError::TooShort {
                field: "name".to_string(),
                min: MIN_SWEET_NAME_LEN,
            });
        }
    } else if name.chars().count() < MIN_SWEET_NAME_LEN {
        out.push(ValidationError::TooShort {
            field: "name".to_string(),
            min: MIN_SWEET_NAME_LEN,
        });
    }
}

/// Validates input for creating a sweet, collecting all violations.
///
/// ## Rules
/// - name: required, at least 2 characters
/// - category: required
/// - price: non-negative (zero allowed - free samples)
/// - initial quantity: non-negative
pub fn validate_new_sweet(sweet: &NewSweet) -> Result<(), ValidationFailed> {
    let mut violations = Vec::new();

    check_name(&sweet.name, true, &mut violations);

    if sweet.category.trim().is_empty() {
        violations.push(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if sweet.price_cents < 0 {
        violations.push(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    if sweet.quantity < 0 {
        violations.push(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailed(violations))
    }
}

/// Validates a partial sweet update; rules apply only to present fields.
pub fn validate_sweet_update(update: &SweetUpdate) -> Result<(), ValidationFailed> {
    let mut violations = Vec::new();

    if let Some(name) = &update.name {
        check_name(name, false, &mut violations);
    }

    if let Some(category) = &update.category {
        if category.trim().is_empty() {
            violations.push(ValidationError::Required {
                field: "category".to_string(),
            });
        }
    }

    if let Some(price_cents) = update.price_cents {
        if price_cents < 0 {
            violations.push(ValidationError::Negative {
                field: "price".to_string(),
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailed(violations))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
