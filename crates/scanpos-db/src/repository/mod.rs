//! # Repository Module
//!
//! Typed access to the records in a [`KeyValueStore`](crate::KeyValueStore).
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Command                                                               │
//! │       │  store.products().create(&product)                             │
//! │       ▼                                                                 │
//! │  ProductRepository<S>          InvoiceRepository<S>                    │
//! │  ├── get / exists              ├── insert                              │
//! │  ├── create / update / delete  ├── get                                 │
//! │  └── list_all                  ├── list_all                            │
//! │       │                        └── clear_all                           │
//! │       │  JSON + key prefix rules                                        │
//! │       ▼                                                                 │
//! │  S: KeyValueStore (SQLite or memory)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD and listing
//! - [`InvoiceRepository`](invoice::InvoiceRepository) - Invoice history

pub mod invoice;
pub mod product;

use scanpos_core::validation::StoredRecord;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::DbResult;
use crate::kv::{decode, KeyValueStore};

/// Loads and decodes every value under `keys`.
///
/// Absent keys and values that do not decode or validate are skipped with a warning,
/// so one bad record never hides the rest of the list.
pub(crate) async fn load_records<S, T>(store: &S, keys: &[String]) -> DbResult<Vec<T>>
where
    S: KeyValueStore,
    T: DeserializeOwned + StoredRecord,
{
    let entries = store.multi_get(keys).await?;
    let mut records = Vec::with_capacity(entries.len());

    for (key, value) in entries {
        let Some(value) = value else {
            continue;
        };
        match decode::<T>(&value) {
            Ok(record) => records.push(record),
            Err(e) => warn!(key = %key, error = %e, "Skipping unreadable record"),
        }
    }

    Ok(records)
}
