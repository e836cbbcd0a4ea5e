//! # Checkout Command
//!
//! Turns the cart into a stored invoice.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cart empty? ──────────────────────────► BUSINESS_LOGIC "Cart is empty"│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  core::checkout  → Invoice { id: invoice_<instant>, items, total }      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  invoices().insert ──── error ─────────► cart untouched, error returned │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cart.clear_cart()  → stored invoice returned for the receipt           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::ApiError;
use scanpos_core::cart::Cart;
use scanpos_core::checkout as core_checkout;
use scanpos_core::Invoice;
use scanpos_db::KeyValueStore;

/// Stores the cart as an invoice dated now, then empties the cart.
pub async fn checkout<S>(store: &S, cart: &mut Cart) -> Result<Invoice, ApiError>
where
    S: KeyValueStore + Clone,
{
    checkout_at(store, cart, Utc::now()).await
}

/// [`checkout`] with an explicit checkout instant.
pub async fn checkout_at<S>(
    store: &S,
    cart: &mut Cart,
    now: DateTime<Utc>,
) -> Result<Invoice, ApiError>
where
    S: KeyValueStore + Clone,
{
    let invoice = core_checkout::checkout(cart, now)?;
    let stored = store.invoices().insert(invoice).await?;

    cart.clear_cart();

    info!(
        id = %stored.id,
        total = stored.total.units(),
        quantity = stored.total_quantity(),
        "Checkout complete"
    );
    Ok(stored)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::scan_code;
    use crate::commands::test_support::{fixed_time, seeded_store};
    use crate::error::ErrorCode;
    use async_trait::async_trait;
    use scanpos_core::{is_invoice_key, Money};
    use scanpos_db::{DbError, DbResult, MemoryStore};

    /// A store whose writes to invoice keys always fail.
    #[derive(Clone, Default)]
    struct ReadOnlyInvoices {
        inner: MemoryStore,
    }

    #[async_trait]
    impl KeyValueStore for ReadOnlyInvoices {
        async fn get(&self, key: &str) -> DbResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> DbResult<()> {
            if is_invoice_key(key) {
                return Err(DbError::QueryFailed("database or disk is full".to_string()));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> DbResult<()> {
            self.inner.remove(key).await
        }

        async fn get_all_keys(&self) -> DbResult<Vec<String>> {
            self.inner.get_all_keys().await
        }

        async fn multi_get(&self, keys: &[String]) -> DbResult<Vec<(String, Option<String>)>> {
            self.inner.multi_get(keys).await
        }

        async fn multi_remove(&self, keys: &[String]) -> DbResult<()> {
            self.inner.multi_remove(keys).await
        }
    }

    #[tokio::test]
    async fn test_checkout_stores_invoice_and_clears_cart() {
        let store = seeded_store().await;
        let mut cart = Cart::new();
        scan_code(&store, &mut cart, "A").await.unwrap();
        scan_code(&store, &mut cart, "A").await.unwrap();
        scan_code(&store, &mut cart, "B").await.unwrap();

        let invoice = checkout_at(&store, &mut cart, fixed_time()).await.unwrap();

        assert_eq!(invoice.id, "invoice_2024-05-01T08:30:00.000Z");
        assert_eq!(invoice.total, Money::from_units(40_000));
        assert_eq!(invoice.items.len(), 2);
        assert!(cart.is_empty());
        assert_eq!(
            store.invoices().get(&invoice.id).await.unwrap(),
            Some(invoice)
        );
    }

    #[tokio::test]
    async fn test_empty_cart() {
        let store = seeded_store().await;
        let mut cart = Cart::new();

        let err = checkout(&store, &mut cart).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert!(store.invoices().list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_cart() {
        let store = ReadOnlyInvoices::default();
        let seeded = seeded_store().await;
        for product in seeded.products().list_all().await.unwrap() {
            store.products().create(&product).await.unwrap();
        }
        let mut cart = Cart::new();
        scan_code(&store, &mut cart, "A").await.unwrap();
        let before = cart.clone();

        let err = checkout(&store, &mut cart).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(cart, before);
    }

    #[tokio::test]
    async fn test_back_to_back_checkouts_keep_both_invoices() {
        let store = seeded_store().await;
        let mut cart = Cart::new();

        scan_code(&store, &mut cart, "A").await.unwrap();
        let first = checkout_at(&store, &mut cart, fixed_time()).await.unwrap();
        scan_code(&store, &mut cart, "B").await.unwrap();
        let second = checkout_at(&store, &mut cart, fixed_time()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.invoices().list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invoice_keeps_price_at_sale() {
        let store = seeded_store().await;
        let mut cart = Cart::new();
        scan_code(&store, &mut cart, "A").await.unwrap();
        let invoice = checkout_at(&store, &mut cart, fixed_time()).await.unwrap();

        crate::commands::delete_product(&store, "A").await.unwrap();

        let stored = store.invoices().get(&invoice.id).await.unwrap().unwrap();
        assert_eq!(stored.items[0].product.standard_price, Money::from_units(10_000));
        assert_eq!(stored.total, Money::from_units(10_000));
    }
}
