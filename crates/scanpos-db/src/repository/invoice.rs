//! # Invoice Repository
//!
//! Invoice history. Invoices are written once at checkout and otherwise
//! only read, or removed all together by [`InvoiceRepository::clear_all`].
//!
//! ## Key Collisions
//! ```text
//! checkout @ 08:30:00.123  → invoice_2024-05-01T08:30:00.123Z
//! checkout @ 08:30:00.123  → invoice_2024-05-01T08:30:00.123Z-1a2b3c4d
//!                            (key taken, random suffix appended)
//! ```

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::kv::{decode, encode, KeyValueStore};
use crate::repository::load_records;
use scanpos_core::checkout::InvoiceId;
use scanpos_core::{is_invoice_key, Invoice};

/// Attempts at finding a free key before giving up.
const MAX_ID_ATTEMPTS: usize = 8;

/// Repository for invoice records.
#[derive(Debug, Clone)]
pub struct InvoiceRepository<S> {
    store: S,
}

impl<S: KeyValueStore> InvoiceRepository<S> {
    /// Creates a new InvoiceRepository.
    pub fn new(store: S) -> Self {
        InvoiceRepository { store }
    }

    /// Stores a new invoice and returns it as stored.
    ///
    /// If another invoice already holds `invoice.id`, a short random suffix
    /// is appended and the returned invoice carries the new id.
    pub async fn insert(&self, mut invoice: Invoice) -> DbResult<Invoice> {
        if !is_invoice_key(&invoice.id) {
            return Err(DbError::Internal(format!(
                "invoice id '{}' lacks the invoice prefix",
                invoice.id
            )));
        }

        let base = InvoiceId::from(invoice.id.clone());
        let mut attempts = 0;
        while self.store.get(&invoice.id).await?.is_some() {
            attempts += 1;
            if attempts > MAX_ID_ATTEMPTS {
                return Err(DbError::duplicate("invoice id", base.as_str()));
            }
            let suffix = Uuid::new_v4().simple().to_string();
            invoice.id = base.with_suffix(&suffix[..8]).into_string();
            warn!(id = %invoice.id, "Invoice id taken, using suffixed id");
        }

        self.store.set(&invoice.id, &encode(&invoice)?).await?;

        info!(
            id = %invoice.id,
            lines = invoice.items.len(),
            total = invoice.total.units(),
            "Invoice stored"
        );
        Ok(invoice)
    }

    /// Gets an invoice by id. Keys without the invoice prefix are never
    /// invoices.
    pub async fn get(&self, id: &str) -> DbResult<Option<Invoice>> {
        if !is_invoice_key(id) {
            return Ok(None);
        }

        match self.store.get(id).await? {
            Some(value) => Ok(Some(decode(&value)?)),
            None => Ok(None),
        }
    }

    /// Every readable invoice, in key order.
    pub async fn list_all(&self) -> DbResult<Vec<Invoice>> {
        let keys = self.keys().await?;
        let invoices: Vec<Invoice> = load_records(&self.store, &keys).await?;

        debug!(keys = keys.len(), loaded = invoices.len(), "Listed invoices");
        Ok(invoices)
    }

    /// Removes every invoice in one batch and returns how many keys were
    /// removed. Product records are untouched.
    ///
    /// On error nothing is assumed removed.
    pub async fn clear_all(&self) -> DbResult<usize> {
        let keys = self.keys().await?;
        if keys.is_empty() {
            return Ok(0);
        }

        self.store.multi_remove(&keys).await?;

        info!(count = keys.len(), "Invoice history cleared");
        Ok(keys.len())
    }

    async fn keys(&self) -> DbResult<Vec<String>> {
        Ok(self
            .store
            .get_all_keys()
            .await?
            .into_iter()
            .filter(|k| is_invoice_key(k))
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
