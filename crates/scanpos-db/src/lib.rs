//! # scanpos-db: Storage Layer for ScanPOS
//!
//! Product and invoice records live side by side in one asynchronous
//! key-value store. This crate defines that store, provides a SQLite and
//! an in-memory backend, and wraps both in typed repositories.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ScanPOS Data Flow                                │
//! │                                                                         │
//! │  Command (scan_code, checkout, list_products, ...)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    scanpos-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │ Repositories  │    │ KeyValueStore │    │  Migrations  │   │   │
//! │  │   │               │───►│    (trait)    │    │  (embedded)  │   │   │
//! │  │   │ ProductRepo   │    ├───────────────┤    │              │   │   │
//! │  │   │ InvoiceRepo   │    │ Database      │    │ 001_kv_store │   │   │
//! │  │   │               │    │ MemoryStore   │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (data dir)/scanpos.db                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`kv`] - The `KeyValueStore` trait and JSON record encoding
//! - [`pool`] - SQLite backend, connection pool and configuration
//! - [`memory`] - In-memory backend
//! - [`migrations`] - Embedded schema migrations
//! - [`repository`] - Product and invoice repositories
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scanpos_db::{Database, DbConfig, KeyValueStore};
//!
//! let db = Database::new(DbConfig::new("path/to/scanpos.db")).await?;
//!
//! let product = db.products().get("8934588012345").await?;
//! let history = db.invoices().list_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use pool::{Database, DbConfig};

pub use repository::invoice::InvoiceRepository;
pub use repository::product::ProductRepository;
