//! # Product Repository
//!
//! Product records, stored under their scanned code.
//!
//! ## Key Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get(id)          get(id)            → Option<Product>                  │
//! │  create(product)  get(id) == None?   → set(id, json)                    │
//! │                   else               → DbError::UniqueViolation         │
//! │  update(id, p)    get(id) → apply    → set(id, json)                    │
//! │  delete(id)       get(id) != None?   → remove(id)                       │
//! │  list_all()       get_all_keys → drop invoice_* → multi_get → decode    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each mutation writes exactly one key, so a failed write leaves the
//! previous record in place.

use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::kv::{decode, encode, KeyValueStore};
use crate::repository::load_records;
use scanpos_core::{is_invoice_key, Product, ProductPatch};

/// Repository for product records.
///
/// ## Usage
/// ```rust,ignore
/// let repo = store.products();
///
/// if let Some(product) = repo.get("8934588012345").await? {
///     cart.add_to_cart(&product);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository<S> {
    store: S,
}

impl<S: KeyValueStore> ProductRepository<S> {
    /// Creates a new ProductRepository.
    pub fn new(store: S) -> Self {
        ProductRepository { store }
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Nothing stored under `id`, or `id` is an invoice key
    /// * `Err(DbError::Serialization)` - The stored value is not a product
    pub async fn get(&self, id: &str) -> DbResult<Option<Product>> {
        if is_invoice_key(id) {
            return Ok(None);
        }

        match self.store.get(id).await? {
            Some(value) => Ok(Some(decode(&value)?)),
            None => Ok(None),
        }
    }

    /// Checks whether a product is stored under `id`.
    pub async fn exists(&self, id: &str) -> DbResult<bool> {
        if is_invoice_key(id) {
            return Ok(false);
        }
        Ok(self.store.get(id).await?.is_some())
    }

    /// Stores a new product.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - A product with this id already exists;
    ///   nothing is written
    pub async fn create(&self, product: &Product) -> DbResult<()> {
        if self.exists(&product.id).await? {
            return Err(DbError::duplicate("id", &product.id));
        }

        self.store.set(&product.id, &encode(product)?).await?;

        info!(id = %product.id, name = %product.name, "Product created");
        Ok(())
    }

    /// Applies `patch` to the stored product and writes it back.
    ///
    /// `id` and `date_created` are never changed.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No product is stored under `id`
    pub async fn update(&self, id: &str, patch: ProductPatch) -> DbResult<Product> {
        let mut product = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        product.apply_patch(patch);
        self.store.set(id, &encode(&product)?).await?;

        info!(id = %id, "Product updated");
        Ok(product)
    }

    /// Deletes the product stored under `id`.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No product is stored under `id`
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        if !self.exists(id).await? {
            return Err(DbError::not_found("Product", id));
        }

        self.store.remove(id).await?;

        info!(id = %id, "Product deleted");
        Ok(())
    }

    /// Every readable product, in key order.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let keys = self.keys().await?;
        let products: Vec<Product> = load_records(&self.store, &keys).await?;

        debug!(keys = keys.len(), loaded = products.len(), "Listed products");
        Ok(products)
    }

    /// Number of product keys (readable or not).
    pub async fn count(&self) -> DbResult<usize> {
        Ok(self.keys().await?.len())
    }

    async fn keys(&self) -> DbResult<Vec<String>> {
        Ok(self
            .store
            .get_all_keys()
            .await?
            .into_iter()
            .filter(|k| !is_invoice_key(k))
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, MemoryStore};
    use chrono::{TimeZone, Utc};
    use scanpos_core::{Category, Money};

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            category: Category::FastMovingConsumerGoods,
            description: Some("Lon 330ml".to_string()),
            image: Some("file:///photos/bia.jpg".to_string()),
            date_created: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
            is_active: true,
            standard_price: Money::from_units(10_000),
            standard_cost: Money::from_units(8_000),
        }
    }

    #[tokio::test]
    async fn test_round_trip_on_sqlite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        let original = product("8934588012345", "Bia Hà Nội");

        repo.create(&original).await.unwrap();

        let loaded = repo.get("8934588012345").await.unwrap().unwrap();
        assert_eq!(loaded, original);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let store = MemoryStore::new();
        let repo = store.products();
        repo.create(&product("A", "First")).await.unwrap();

        let err = repo.create(&product("A", "Second")).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(repo.get("A").await.unwrap().unwrap().name, "First");
    }

    #[tokio::test]
    async fn test_update_keeps_identity() {
        let store = MemoryStore::new();
        let repo = store.products();
        let original = product("A", "Bia");
        repo.create(&original).await.unwrap();

        let updated = repo
            .update(
                "A",
                ProductPatch {
                    name: Some("Bia lon".to_string()),
                    standard_price: Some(Money::from_units(11_000)),
                    image: Some(None),
                    ..ProductPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.date_created, original.date_created);
        assert_eq!(updated.image, None);
        assert_eq!(repo.get("A").await.unwrap().unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_product() {
        let repo = MemoryStore::new().products();

        let err = repo.update("nope", ProductPatch::default()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = repo.delete("nope").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        let repo = store.products();
        repo.create(&product("A", "Bia")).await.unwrap();

        repo.delete("A").await.unwrap();

        assert!(!repo.exists("A").await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_excludes_invoices_and_skips_corrupt_records() {
        let store = MemoryStore::new();
        let repo = store.products();
        repo.create(&product("A", "Bia")).await.unwrap();
        repo.create(&product("B", "Bánh")).await.unwrap();
        store.set("C", "{not json").await.unwrap();
        store
            .set("invoice_2024-05-01T08:30:00.000Z", r#"{"id":"invoice_x"}"#)
            .await
            .unwrap();

        let products = repo.list_all().await.unwrap();

        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_invoice_keys_are_never_products() {
        let store = MemoryStore::new();
        store
            .set("invoice_2024-05-01T08:30:00.000Z", "{}")
            .await
            .unwrap();
        let repo = store.products();

        assert_eq!(repo.get("invoice_2024-05-01T08:30:00.000Z").await.unwrap(), None);
        assert!(!repo.exists("invoice_2024-05-01T08:30:00.000Z").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_corrupt_record_is_an_error() {
        let store = MemoryStore::new();
        store.set("A", "[]").await.unwrap();

        let err = store.products().get("A").await.unwrap_err();
        assert!(matches!(err, DbError::Serialization(_)));
    }

    fn stored_json(product: &Product, edit: impl FnOnce(&mut serde_json::Value)) -> String {
        let mut value = serde_json::to_value(product).unwrap();
        edit(&mut value);
        value.to_string()
    }

    #[tokio::test]
    async fn test_records_breaking_invariants_are_skipped() {
        let store = MemoryStore::new();
        let repo = store.products();
        repo.create(&product("A", "Bia")).await.unwrap();
        let blank = stored_json(&product("B", "Bánh"), |v| {
            v["id"] = "".into();
            v["name"] = "  ".into();
        });
        let negative = stored_json(&product("C", "Kẹo"), |v| v["standard_price"] = (-5).into());
        store.set("B", &blank).await.unwrap();
        store.set("C", &negative).await.unwrap();

        let ids: Vec<String> = repo.list_all().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["A"]);

        let err = repo.get("C").await.unwrap_err();
        assert!(matches!(err, DbError::Serialization(ref m) if m.contains("standard_price")));
        assert!(matches!(repo.get("B").await, Err(DbError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_fractional_price_is_rounded_and_rewritten_on_update() {
        let store = MemoryStore::new();
        let repo = store.products();
        let raw = stored_json(&product("A", "Bia"), |v| {
            v["standard_price"] = serde_json::json!(9000.5);
        });
        store.set("A", &raw).await.unwrap();

        let loaded = repo.get("A").await.unwrap().unwrap();
        assert_eq!(loaded.standard_price, Money::from_units(9001));
        assert_eq!(store.get("A").await.unwrap().unwrap(), raw);

        let patch = ProductPatch {
            name: Some("Bia lon".to_string()),
            ..ProductPatch::default()
        };
        repo.update("A", patch).await.unwrap();

        let rewritten: serde_json::Value =
            serde_json::from_str(&store.get("A").await.unwrap().unwrap()).unwrap();
        assert_eq!(rewritten["standard_price"], serde_json::json!(9001));
        assert_eq!(rewritten["name"], "Bia lon");
    }
}
