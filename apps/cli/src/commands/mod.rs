//! # Commands Module
//!
//! Every operation the cashier can perform, independent of how it is
//! invoked (one-shot subcommand or interactive session).
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── product.rs   ◄─── Product CRUD and list
//! ├── cart.rs      ◄─── Scan, quantity edits, cancel
//! ├── checkout.rs  ◄─── Cart → stored invoice
//! └── invoice.rs   ◄─── Invoice history and clear
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  async fn scan_code<S: KeyValueStore + Clone>(                          │
//! │      store: &S,           ◄── Database or MemoryStore                   │
//! │      cart: &mut Cart,     ◄── Owned by the session                      │
//! │      code: &str,                                                        │
//! │  ) -> Result<ScanOutcome, ApiError>                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  render.rs turns the result into a table or a message                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands take the store by reference and the cart by `&mut`, so the
//! same functions back the subcommands, the session and the tests.

pub mod cart;
pub mod checkout;
pub mod invoice;
pub mod product;

pub use cart::{
    cancel, decrement, increment, remove_from_cart, scan_code, update_quantity, ScanOutcome,
};
pub use checkout::checkout;
pub use invoice::{clear_history, list_invoices};
pub use product::{add_product, delete_product, edit_product, get_product, list_products};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{TimeZone, Utc};
    use scanpos_core::{Category, Money, NewProduct};
    use scanpos_db::MemoryStore;

    use super::product::add_product;

    pub fn new_product(id: &str, name: &str, price: i64) -> NewProduct {
        NewProduct {
            id: id.to_string(),
            name: name.to_string(),
            category: Category::FastMovingConsumerGoods,
            description: None,
            image: None,
            is_active: true,
            standard_price: Money::from_units(price),
            standard_cost: Money::zero(),
        }
    }

    /// A store holding "Bia" (10.000) and "Bánh" (20.000).
    pub async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        add_product(&store, new_product("A", "Bia", 10_000)).await.unwrap();
        add_product(&store, new_product("B", "Bánh", 20_000)).await.unwrap();
        store
    }

    pub fn fixed_time() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
    }
}
