//! # Product Commands
//!
//! Create, read, edit, delete and list products.
//!
//! ## Add Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  scan "8934588012345"  →  Unknown  →  scanpos product add 8934588012345 │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                               validate_new_product (no I/O)             │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                               id already stored? ──► VALIDATION_ERROR   │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                               products().create  (one key written)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info};

use crate::error::ApiError;
use scanpos_core::listing::ProductQuery;
use scanpos_core::validation::{
    validate_amount, validate_new_product, validate_product_name, validate_search_query,
};
use scanpos_core::{NewProduct, Product, ProductPatch, ValidationError};
use scanpos_db::KeyValueStore;

/// Creates a product from the add form.
///
/// ## Errors
/// * `VALIDATION_ERROR` - Invalid field, or a product with this id exists
pub async fn add_product<S>(store: &S, input: NewProduct) -> Result<Product, ApiError>
where
    S: KeyValueStore + Clone,
{
    validate_new_product(&input)?;

    let product = input.into_product(Utc::now());
    let repo = store.products();

    if repo.exists(&product.id).await? {
        return Err(ValidationError::Duplicate {
            field: "id".to_string(),
            value: product.id,
        }
        .into());
    }

    repo.create(&product).await?;
    Ok(product)
}

/// Gets a product by id.
///
/// ## Errors
/// * `NOT_FOUND` - Nothing is stored under `id`
pub async fn get_product<S>(store: &S, id: &str) -> Result<Product, ApiError>
where
    S: KeyValueStore + Clone,
{
    debug!(id = %id, "get_product command");

    store
        .products()
        .get(id.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))
}

/// Applies the edits from the detail screen.
///
/// Fields left as `None` keep their stored value.
pub async fn edit_product<S>(store: &S, id: &str, patch: ProductPatch) -> Result<Product, ApiError>
where
    S: KeyValueStore + Clone,
{
    if patch.is_empty() {
        return Err(ApiError::validation("Nothing to change"));
    }

    if let Some(name) = &patch.name {
        validate_product_name(name)?;
    }
    if let Some(price) = patch.standard_price {
        validate_amount("standard_price", price)?;
    }
    if let Some(cost) = patch.standard_cost {
        validate_amount("standard_cost", cost)?;
    }

    let patch = ProductPatch {
        name: patch.name.map(|n| n.trim().to_string()),
        ..patch
    };

    Ok(store.products().update(id.trim(), patch).await?)
}

/// Deletes a product. Invoices that contain it keep their copy.
pub async fn delete_product<S>(store: &S, id: &str) -> Result<(), ApiError>
where
    S: KeyValueStore + Clone,
{
    store.products().delete(id.trim()).await?;
    Ok(())
}

/// Lists products through the search, filters and sort of `query`.
pub async fn list_products<S>(store: &S, query: &ProductQuery) -> Result<Vec<Product>, ApiError>
where
    S: KeyValueStore + Clone,
{
    let query = ProductQuery {
        search: validate_search_query(&query.search)?,
        ..query.clone()
    };

    let products = store.products().list_all().await?;
    let shown = query.apply(&products);

    info!(
        total = products.len(),
        shown = shown.len(),
        sort = %query.sort,
        "Products listed"
    );
    Ok(shown)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{new_product, seeded_store};
    use crate::error::ErrorCode;
    use scanpos_core::listing::ProductSort;
    use scanpos_core::{Category, Money};
    use scanpos_db::{Database, DbConfig, MemoryStore};

    #[tokio::test]
    async fn test_add_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut input = new_product(" 8934588012345 ", " Bia Hà Nội ", 10_000);
        input.description = Some("   ".to_string());
        let created = add_product(&db, input).await.unwrap();

        assert_eq!(created.id, "8934588012345");
        assert_eq!(created.name, "Bia Hà Nội");
        assert_eq!(created.description, None);
        assert_eq!(get_product(&db, "8934588012345").await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_add_duplicate_is_rejected() {
        let store = seeded_store().await;

        let err = add_product(&store, new_product("A", "Other", 1)).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "id 'A' already exists");
        assert_eq!(get_product(&store, "A").await.unwrap().name, "Bia");
    }

    #[tokio::test]
    async fn test_add_validates_before_writing() {
        let store = MemoryStore::new();

        let err = add_product(&store, new_product("A", "", 1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_product(&store, new_product("invoice_x", "Bia", 1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_product(&store, new_product("A", "Bia", -1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let err = get_product(&MemoryStore::new(), "nope").await.unwrap_err();
        assert_eq!(err, ApiError::not_found("Product", "nope"));
    }

    #[tokio::test]
    async fn test_edit() {
        let store = seeded_store().await;
        let before = get_product(&store, "A").await.unwrap();

        let after = edit_product(
            &store,
            "A",
            ProductPatch {
                name: Some("  Bia lon ".to_string()),
                standard_price: Some(Money::from_units(11_000)),
                is_active: Some(false),
                ..ProductPatch::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(after.name, "Bia lon");
        assert_eq!(after.standard_price, Money::from_units(11_000));
        assert!(!after.is_active);
        assert_eq!(after.date_created, before.date_created);
        assert_eq!(get_product(&store, "A").await.unwrap(), after);
    }

    #[tokio::test]
    async fn test_edit_rejects_bad_input() {
        let store = seeded_store().await;

        let err = edit_product(&store, "A", ProductPatch::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let patch = ProductPatch {
            standard_cost: Some(Money::from_units(-5)),
            ..ProductPatch::default()
        };
        let err = edit_product(&store, "A", patch).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let patch = ProductPatch {
            name: Some("X".to_string()),
            ..ProductPatch::default()
        };
        let err = edit_product(&store, "missing", patch).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = seeded_store().await;

        delete_product(&store, "A").await.unwrap();

        assert_eq!(
            get_product(&store, "A").await.unwrap_err().code,
            ErrorCode::NotFound
        );
        assert_eq!(
            delete_product(&store, "A").await.unwrap_err().code,
            ErrorCode::NotFound
        );
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let store = seeded_store().await;
        let mut banh = new_product("C", "Bánh mì", 15_000);
        banh.category = Category::AgricultureFood;
        add_product(&store, banh).await.unwrap();

        let query = ProductQuery {
            search: "  BÁNH ".to_string(),
            sort: ProductSort::PriceDesc,
            ..ProductQuery::default()
        };
        let names: Vec<String> = list_products(&store, &query)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Bánh", "Bánh mì"]);

        let query = ProductQuery {
            category: Some(Category::AgricultureFood),
            ..ProductQuery::default()
        };
        let found = list_products(&store, &query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "C");
    }

    #[tokio::test]
    async fn test_list_rejects_long_search() {
        let store = seeded_store().await;
        let query = ProductQuery {
            search: "x".repeat(101),
            ..ProductQuery::default()
        };

        let err = list_products(&store, &query).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
