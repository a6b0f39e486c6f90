//! # Repository Module
//!
//! Database repository implementations for the sweet shop.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Ledger / Catalog                                                      │
//! │       │                                                                 │
//! │       │  db.sweets().get_by_id("...")                                  │
//! │       ▼                                                                 │
//! │  SweetRepository                                                       │
//! │  ├── search(&self, filters)                                            │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, sweet)                                              │
//! │  └── update(&self, sweet)                                              │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Repositories hold no business rules: validation lives in              │
//! │  sweetshop-core, and the purchase/restock transaction lives in the     │
//! │  stock ledger.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`sweet::SweetRepository`] - Sweet rows and search
//! - [`purchase::PurchaseRepository`] - Purchase audit rows
//! - [`user::UserRepository`] - Purchaser existence checks

pub mod purchase;
pub mod sweet;
pub mod user;
