//! # Cart
//!
//! The shopping cart of a single checkout session.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Reducer                                    │
//! │                                                                         │
//! │  CartAction                    Effect on items                          │
//! │  ──────────                    ───────────────                          │
//! │  Add(product)          ──────► same id? qty += 1 (position kept)        │
//! │                                else push { product, qty: 1 }            │
//! │  UpdateQuantity(id, n) ──────► n >= 1: qty = n (position kept)          │
//! │                                n <= 0: line removed                     │
//! │  Remove(id)            ──────► line removed                             │
//! │  Clear                 ──────► []                                       │
//! │                                                                         │
//! │  Unknown ids are ignored. No operation can fail.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product id
//! - Every quantity is >= 1
//!
//! The cart is an ordinary owned value. Whoever runs the session owns it and
//! lends it out (`&Cart` / `&mut Cart`) to the code that needs it.

use crate::money::Money;
use crate::types::{CartItem, Product};

/// A mutation of the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    Add(Product),
    UpdateQuantity { id: String, quantity: i64 },
    Remove { id: String },
    Clear,
}

/// Ordered cart lines, in first-added order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Applies one action.
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add(product) => self.add_to_cart(&product),
            CartAction::UpdateQuantity { id, quantity } => self.update_quantity(&id, quantity),
            CartAction::Remove { id } => self.remove_from_cart(&id),
            CartAction::Clear => self.clear_cart(),
        }
    }

    /// Adds one unit of `product`.
    ///
    /// An existing line for the same id is incremented in place; otherwise
    /// a new line with quantity 1 is appended.
    pub fn add_to_cart(&mut self, product: &Product) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return;
        }

        self.items.push(CartItem::new(product.clone()));
    }

    /// Sets the quantity of the line for `id`.
    ///
    /// A quantity of zero or less removes the line. Unknown ids are a no-op.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == id) {
            item.quantity = quantity;
        }
    }

    /// Removes the line for `id`, if present.
    pub fn remove_from_cart(&mut self, id: &str) {
        self.items.retain(|i| i.product.id != id);
    }

    /// Empties the cart.
    pub fn clear_cart(&mut self) {
        self.items.clear();
    }

    /// The cart lines in order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns the line for `id`.
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities (the number shown on the cart badge).
    ///
    /// Saturates at `i64::MAX` instead of overflowing.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, i| acc.saturating_add(i.quantity))
    }

    /// `Σ standard_price × quantity`, or `None` if it overflows.
    pub fn total(&self) -> Option<Money> {
        self.items
            .iter()
            .try_fold(Money::zero(), |acc, item| acc.checked_add(item.line_total()?))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
