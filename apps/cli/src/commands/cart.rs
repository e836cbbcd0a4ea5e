//! # Cart Commands
//!
//! Scanning and line edits.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐  scan_code   ┌──────────┐  checkout   ┌──────────────┐    │
//! │  │  Empty   │─────────────►│ In Cart  │────────────►│ Invoice      │    │
//! │  │  Cart    │              │          │             │ stored       │    │
//! │  └──────────┘              └──────────┘             └──────────────┘    │
//! │       ▲                     │  update_quantity           │              │
//! │       │                     │  increment / decrement     │              │
//! │       │                     │  remove_from_cart          │              │
//! │       │       cancel        ▼                            │              │
//! │       └─────────────────────┴────────────────────────────┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only [`scan_code`] touches the store. The line edits are reducer calls
//! plus a check that the line exists, so a typo in an id is reported
//! instead of silently ignored.

use tracing::{debug, info};

use crate::error::ApiError;
use scanpos_core::cart::Cart;
use scanpos_core::validation::validate_quantity;
use scanpos_core::{CartItem, ValidationError};
use scanpos_db::KeyValueStore;

/// Result of scanning a code.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// The product was found and its cart line now looks like this.
    Added(CartItem),

    /// Nothing is stored under the code. The cart is unchanged.
    Unknown(String),
}

/// Looks up a scanned code and adds one unit to the cart.
///
/// Inactive products are still sold; the flag only affects listings. A line
/// already at [`MAX_LINE_QUANTITY`] is left as it is and the scan fails.
///
/// [`MAX_LINE_QUANTITY`]: scanpos_core::validation::MAX_LINE_QUANTITY
pub async fn scan_code<S>(store: &S, cart: &mut Cart, code: &str) -> Result<ScanOutcome, ApiError>
where
    S: KeyValueStore + Clone,
{
    let code = code.trim();
    if code.is_empty() {
        return Err(ValidationError::required("code").into());
    }

    let Some(product) = store.products().get(code).await? else {
        debug!(code = %code, "Scanned code is not a product");
        return Ok(ScanOutcome::Unknown(code.to_string()));
    };

    if let Some(line) = cart.get(&product.id) {
        validate_quantity(line.quantity.saturating_add(1))?;
    }

    cart.add_to_cart(&product);
    let line = cart
        .get(&product.id)
        .cloned()
        .ok_or_else(|| ApiError::internal("Scanned product missing from cart"))?;

    info!(
        id = %product.id,
        quantity = line.quantity,
        lines = cart.item_count(),
        "Product scanned"
    );
    Ok(ScanOutcome::Added(line))
}

/// Sets the quantity of a line. Zero or less removes it.
pub fn update_quantity(cart: &mut Cart, id: &str, quantity: i64) -> Result<(), ApiError> {
    require_line(cart, id)?;
    validate_quantity(quantity)?;
    cart.update_quantity(id, quantity);
    debug!(id = %id, quantity, "Quantity updated");
    Ok(())
}

/// Adds one unit to an existing line.
pub fn increment(cart: &mut Cart, id: &str) -> Result<(), ApiError> {
    let quantity = require_line(cart, id)?.quantity;
    update_quantity(cart, id, quantity.saturating_add(1))
}

/// Takes one unit off a line; the last unit removes it.
pub fn decrement(cart: &mut Cart, id: &str) -> Result<(), ApiError> {
    let quantity = require_line(cart, id)?.quantity;
    update_quantity(cart, id, quantity - 1)
}

/// Removes a line.
pub fn remove_from_cart(cart: &mut Cart, id: &str) -> Result<(), ApiError> {
    require_line(cart, id)?;
    cart.remove_from_cart(id);
    debug!(id = %id, "Line removed");
    Ok(())
}

/// Abandons the sale.
pub fn cancel(cart: &mut Cart) {
    if !cart.is_empty() {
        info!(lines = cart.item_count(), "Sale cancelled");
    }
    cart.clear_cart();
}

fn require_line<'a>(cart: &'a Cart, id: &str) -> Result<&'a CartItem, ApiError> {
    cart.get(id).ok_or_else(|| ApiError::not_found("Cart line", id))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::seeded_store;
    use crate::commands::{edit_product, get_product};
    use crate::error::ErrorCode;
    use scanpos_core::validation::MAX_LINE_QUANTITY;
    use scanpos_core::{Money, ProductPatch};

    #[tokio::test]
    async fn test_scan_known_code_adds_and_increments() {
        let store = seeded_store().await;
        let mut cart = Cart::new();

        let first = scan_code(&store, &mut cart, "A").await.unwrap();
        let second = scan_code(&store, &mut cart, " A\n").await.unwrap();
        scan_code(&store, &mut cart, "B").await.unwrap();

        let ScanOutcome::Added(line) = first else {
            panic!("expected Added, got {first:?}");
        };
        assert_eq!(line.quantity, 1);
        assert!(matches!(second, ScanOutcome::Added(ref l) if l.quantity == 2));

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(cart.total(), Some(Money::from_units(40_000)));
    }

    #[tokio::test]
    async fn test_scan_unknown_code_leaves_cart() {
        let store = seeded_store().await;
        let mut cart = Cart::new();

        let outcome = scan_code(&store, &mut cart, "8934588012345").await.unwrap();

        assert_eq!(outcome, ScanOutcome::Unknown("8934588012345".to_string()));
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_scan_invoice_key_is_unknown() {
        let store = seeded_store().await;
        store
            .set("invoice_2024-05-01T08:30:00.000Z", r#"{"id":"A"}"#)
            .await
            .unwrap();
        let mut cart = Cart::new();

        let outcome = scan_code(&store, &mut cart, "invoice_2024-05-01T08:30:00.000Z")
            .await
            .unwrap();

        assert!(matches!(outcome, ScanOutcome::Unknown(_)));
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_scan_blank_code() {
        let store = seeded_store().await;
        let mut cart = Cart::new();

        let err = scan_code(&store, &mut cart, "   ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_scan_inactive_product() {
        let store = seeded_store().await;
        let patch = ProductPatch {
            is_active: Some(false),
            ..ProductPatch::default()
        };
        edit_product(&store, "A", patch).await.unwrap();
        assert!(!get_product(&store, "A").await.unwrap().is_active);

        let mut cart = Cart::new();
        let outcome = scan_code(&store, &mut cart, "A").await.unwrap();
        assert!(matches!(outcome, ScanOutcome::Added(_)));
    }

    #[tokio::test]
    async fn test_line_edits() {
        let store = seeded_store().await;
        let mut cart = Cart::new();
        scan_code(&store, &mut cart, "A").await.unwrap();
        scan_code(&store, &mut cart, "B").await.unwrap();

        update_quantity(&mut cart, "A", 5).unwrap();
        increment(&mut cart, "A").unwrap();
        assert_eq!(cart.get("A").unwrap().quantity, 6);

        decrement(&mut cart, "B").unwrap();
        assert!(cart.get("B").is_none());

        update_quantity(&mut cart, "A", 0).unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_edits_on_missing_line() {
        let store = seeded_store().await;
        let mut cart = Cart::new();
        scan_code(&store, &mut cart, "A").await.unwrap();
        let before = cart.clone();

        for err in [
            update_quantity(&mut cart, "B", 3).unwrap_err(),
            increment(&mut cart, "B").unwrap_err(),
            decrement(&mut cart, "B").unwrap_err(),
            remove_from_cart(&mut cart, "B").unwrap_err(),
        ] {
            assert_eq!(err.code, ErrorCode::NotFound);
        }
        assert_eq!(cart, before);
    }

    #[tokio::test]
    async fn test_quantity_is_capped() {
        let store = seeded_store().await;
        let mut cart = Cart::new();
        scan_code(&store, &mut cart, "A").await.unwrap();
        scan_code(&store, &mut cart, "B").await.unwrap();

        let err = update_quantity(&mut cart, "A", i64::MAX).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(cart.get("A").unwrap().quantity, 1);
        assert_eq!(cart.total_quantity(), 2);

        update_quantity(&mut cart, "A", MAX_LINE_QUANTITY).unwrap();
        let before = cart.clone();

        let err = increment(&mut cart, "A").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        let err = scan_code(&store, &mut cart, "A").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(cart, before);

        decrement(&mut cart, "A").unwrap();
        assert_eq!(cart.get("A").unwrap().quantity, MAX_LINE_QUANTITY - 1);
    }

    #[tokio::test]
    async fn test_cancel() {
        let store = seeded_store().await;
        let mut cart = Cart::new();
        scan_code(&store, &mut cart, "A").await.unwrap();

        cancel(&mut cart);
        assert!(cart.is_empty());

        cancel(&mut cart);
        assert!(cart.is_empty());
    }
}
