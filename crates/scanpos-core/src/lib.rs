//! # scanpos-core: Pure Business Logic for ScanPOS
//!
//! Everything a scan-to-cart register decides without touching storage:
//! the record types, the cart reducer, checkout totals, and the list
//! projections shown on the product and invoice history screens.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ScanPOS Architecture                             │
//! │                                                                         │
//! │   scanner / keyboard ──► scanpos (CLI session, commands)               │
//! │                                 │                                       │
//! │  ┌──────────────────────────────▼──────────────────────────────────┐   │
//! │  │               ★ scanpos-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  cart   │ │ checkout │ │ listing │ │validate │  │   │
//! │  │   │ Product │ │  Cart   │ │ Invoice  │ │ Query   │ │  rules  │  │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                 │                                       │
//! │  ┌──────────────────────────────▼──────────────────────────────────┐   │
//! │  │            scanpos-db (key-value store, repositories)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, cart line and invoice records
//! - [`money`] - Integer money amounts
//! - [`cart`] - The cart reducer
//! - [`checkout`] - Turning a cart into an invoice
//! - [`listing`] - Filter + sort projections for list screens
//! - [`collate`] - Accent-aware name ordering
//! - [`validation`] - Input rules for the add/edit forms
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use scanpos_core::{cart::Cart, checkout, Category, Money, NewProduct};
//!
//! let beer = NewProduct {
//!     id: "8934588012345".to_string(),
//!     name: "Bia Hà Nội".to_string(),
//!     category: Category::FastMovingConsumerGoods,
//!     description: None,
//!     image: None,
//!     is_active: true,
//!     standard_price: Money::from_units(10_000),
//!     standard_cost: Money::from_units(8_000),
//! }
//! .into_product(Utc::now());
//!
//! let mut cart = Cart::new();
//! cart.add_to_cart(&beer);
//! cart.add_to_cart(&beer);
//!
//! let invoice = checkout::checkout(&cart, Utc::now()).unwrap();
//! assert_eq!(invoice.total, Money::from_units(20_000));
//! ```

pub mod cart;
pub mod checkout;
pub mod collate;
pub mod error;
pub mod listing;
pub mod money;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Key prefix that separates invoice records from product records in the
/// shared key-value namespace.
///
/// Product listing means "every key without this prefix" and invoice
/// history means "every key with it", so the literal is part of the
/// persisted data format and must never change.
pub const INVOICE_KEY_PREFIX: &str = "invoice_";

/// Returns true if `key` names an invoice record.
#[inline]
pub fn is_invoice_key(key: &str) -> bool {
    key.starts_with(INVOICE_KEY_PREFIX)
}
