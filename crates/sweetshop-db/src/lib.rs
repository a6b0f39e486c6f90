//! # sweetshop-db: Database Layer for the Sweet Shop
//!
//! This crate provides database access for the sweet shop inventory system.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Sweet Shop Data Flow                               │
//! │                                                                         │
//! │  HTTP handler (external): POST /sweets/:id/purchase                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   sweetshop-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────────┐  ┌──────────────┐  ┌──────────────────────┐ │   │
//! │  │   │  Database   │  │ StockLedger  │  │    Repositories      │ │   │
//! │  │   │  (pool.rs)  │  │ (ledger.rs)  │  │  (repository/*.rs)   │ │   │
//! │  │   │             │  │              │  │                      │ │   │
//! │  │   │ SqlitePool  │◄─│ purchase     │  │ SweetRepository      │ │   │
//! │  │   │ Migrations  │  │ restock      │  │ PurchaseRepository   │ │   │
//! │  │   │             │  │ (one tx)     │  │ UserRepository       │ │   │
//! │  │   └─────────────┘  └──────────────┘  └──────────────────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode, foreign keys on)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (sweet, purchase, user)
//! - [`ledger`] - The stock ledger: transactional purchase/restock
//! - [`catalog`] - Sweet CRUD and search
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sweetshop_db::{Database, DbConfig};
//! use sweetshop_core::validation::PurchaseRequest;
//!
//! let db = Database::new(DbConfig::new("path/to/sweetshop.db")).await?;
//!
//! let outcome = db
//!     .ledger()
//!     .purchase(&sweet_id, PurchaseRequest {
//!         quantity: Some(2.0),
//!         purchaser_id: Some(user_id),
//!     })
//!     .await?;
//!
//! println!("charged {}", outcome.purchase.total_price());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::SweetCatalog;
pub use error::DbError;
pub use ledger::StockLedger;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::purchase::PurchaseRepository;
pub use repository::sweet::SweetRepository;
pub use repository::user::UserRepository;
