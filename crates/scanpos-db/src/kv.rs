//! # Key-Value Store
//!
//! The storage seam every record goes through.
//!
//! ## Namespace Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     One flat namespace of JSON values                   │
//! │                                                                         │
//! │  key                                   value                            │
//! │  ───────────────────────────────────   ─────────────────────────────    │
//! │  8934588012345                         {"id":"8934588012345",...}       │
//! │  ABC-123                               {"id":"ABC-123",...}             │
//! │  invoice_2024-05-01T08:30:00.123Z      {"id":"invoice_…","createdAt":…} │
//! │                                                                         │
//! │  products = keys WITHOUT the invoice_ prefix                            │
//! │  invoices = keys WITH    the invoice_ prefix                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Backends
//! - [`crate::Database`] - SQLite file (or in-memory SQLite for tests)
//! - [`crate::MemoryStore`] - a map behind a lock, for tests and demos
//!
//! A caller that awaits a `set` and then a `get` of the same key sees its
//! own write on every backend.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use scanpos_core::validation::StoredRecord;
use serde::Serialize;

use crate::error::{DbError, DbResult};
use crate::repository::invoice::InvoiceRepository;
use crate::repository::product::ProductRepository;

/// Asynchronous string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value under `key`, if any.
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> DbResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> DbResult<()>;

    /// Every key in the store, in ascending order.
    async fn get_all_keys(&self) -> DbResult<Vec<String>>;

    /// Looks up several keys at once.
    ///
    /// The result has one entry per requested key, in request order.
    async fn multi_get(&self, keys: &[String]) -> DbResult<Vec<(String, Option<String>)>>;

    /// Removes several keys at once.
    ///
    /// All-or-nothing: on error no key is removed.
    async fn multi_remove(&self, keys: &[String]) -> DbResult<()>;

    /// Product records (keys without the invoice prefix).
    fn products(&self) -> ProductRepository<Self>
    where
        Self: Sized + Clone,
    {
        ProductRepository::new(self.clone())
    }

    /// Invoice records (keys with the invoice prefix).
    fn invoices(&self) -> InvoiceRepository<Self>
    where
        Self: Sized + Clone,
    {
        InvoiceRepository::new(self.clone())
    }
}

// =============================================================================
// Record Encoding
// =============================================================================

/// Encodes a record as the JSON stored in the value column.
pub fn encode<T: Serialize>(record: &T) -> DbResult<String> {
    Ok(serde_json::to_string(record)?)
}

/// Decodes a stored JSON value and checks the record's invariants.
///
/// A value that parses but breaks an invariant (blank name, negative
/// price, zero-quantity line) fails like malformed JSON.
pub fn decode<T: DeserializeOwned + StoredRecord>(value: &str) -> DbResult<T> {
    let record: T = serde_json::from_str(value)?;
    record
        .validate_stored()
        .map_err(|e| DbError::Serialization(format!("invalid stored record: {e}")))?;
    Ok(record)
}
