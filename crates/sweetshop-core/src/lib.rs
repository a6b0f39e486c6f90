//! # sweetshop-core: Pure Business Logic for the Sweet Shop
//!
//! This crate is the **heart** of the sweet shop inventory system. It contains
//! all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Sweet Shop Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              HTTP Layer (external collaborator)                 │   │
//! │  │    POST /sweets/:id/purchase, POST /sweets/:id/restock, ...    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ sweetshop-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   error   │  │ validation│  │   │
//! │  │   │   Sweet   │  │   Money   │  │  Ledger   │  │   gate    │  │   │
//! │  │   │ Purchase  │  │  (cents)  │  │  errors   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 sweetshop-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, the stock ledger             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Sweet, Purchase, User, request structs)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - The validation gate: complete-violation-list checks
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use sweetshop_core::money::Money;
//! use sweetshop_core::validation::PurchaseRequest;
//!
//! // Create money from cents (never from floats!)
//! let price = Money::from_cents(1599); // $15.99
//!
//! // Snapshot a purchase total
//! let total = price * 2;
//! assert_eq!(total.cents(), 3198); // $31.98
//!
//! // Validate a purchase request before any store access
//! let request = PurchaseRequest {
//!     quantity: Some(2.0),
//!     purchaser_id: Some("user-1".to_string()),
//! };
//! let validated = request.validate().unwrap();
//! assert_eq!(validated.quantity, 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use sweetshop_core::Money` instead of
// `use sweetshop_core::money::Money`

pub use error::{CatalogError, LedgerError, ValidationError, ValidationFailed};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum length of a sweet's display name.
///
/// ## Business Reason
/// Single-character names are almost always data-entry mistakes.
pub const MIN_SWEET_NAME_LEN: usize = 2;
