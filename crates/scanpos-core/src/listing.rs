//! # Listing
//!
//! Filtered and sorted projections of stored records, for the product list
//! and the invoice history.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         List View Model                                 │
//! │                                                                         │
//! │  &[Product] ──► filter (AND) ──────────────► stable sort ──► Vec<Product>│
//! │                 ├── name contains search        ├── date_desc (default)  │
//! │                 ├── category == selected        ├── name_asc / name_desc │
//! │                 ├── is_active == selected       └── price_asc/price_desc │
//! │                 └── date_created in range                               │
//! │                                                                         │
//! │  &[Invoice] ──► filter (AND) ──────────────► stable sort ──► Vec<Invoice>│
//! │                 ├── any line name contains      ├── date_desc (default)  │
//! │                 │   search                      ├── date_asc             │
//! │                 └── createdAt in range          └── total_asc/total_desc │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A query is a plain value. `apply` borrows the input, never mutates it and
//! returns the same output for the same input, so callers can re-run it on
//! every change without caching.
//!
//! ## Usage
//! ```rust
//! use scanpos_core::listing::{ProductQuery, ProductSort};
//! use scanpos_core::Product;
//!
//! let products: Vec<Product> = Vec::new();
//! let query = ProductQuery {
//!     search: "bia".to_string(),
//!     sort: "price_desc".parse::<ProductSort>().unwrap(),
//!     ..ProductQuery::default()
//! };
//! assert!(query.apply(&products).is_empty());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use crate::collate::{fold_case, CollationKey};
use crate::error::ValidationError;
use crate::types::{Category, Invoice, Product};

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive instant range. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// The unbounded range.
    pub const fn all() -> Self {
        DateRange { from: None, to: None }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }
}

// =============================================================================
// Sort Keys
// =============================================================================

/// Sort order of the product list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    /// Newest first.
    #[default]
    DateDesc,
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl ProductSort {
    pub const ALL: [ProductSort; 5] = [
        ProductSort::DateDesc,
        ProductSort::NameAsc,
        ProductSort::NameDesc,
        ProductSort::PriceAsc,
        ProductSort::PriceDesc,
    ];

    /// Picker value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductSort::DateDesc => "date_desc",
            ProductSort::NameAsc => "name_asc",
            ProductSort::NameDesc => "name_desc",
            ProductSort::PriceAsc => "price_asc",
            ProductSort::PriceDesc => "price_desc",
        }
    }
}

/// Sort order of the invoice history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceSort {
    /// Newest first.
    #[default]
    DateDesc,
    DateAsc,
    TotalAsc,
    TotalDesc,
}

impl InvoiceSort {
    pub const ALL: [InvoiceSort; 4] = [
        InvoiceSort::DateDesc,
        InvoiceSort::DateAsc,
        InvoiceSort::TotalAsc,
        InvoiceSort::TotalDesc,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            InvoiceSort::DateDesc => "date_desc",
            InvoiceSort::DateAsc => "date_asc",
            InvoiceSort::TotalAsc => "total_asc",
            InvoiceSort::TotalDesc => "total_desc",
        }
    }
}

macro_rules! picker_value {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| ValidationError::NotAllowed {
                        field: "sort".to_string(),
                        allowed: $ty::ALL.iter().map(|v| v.as_str().to_string()).collect(),
                    })
            }
        }
    };
}

picker_value!(ProductSort);
picker_value!(InvoiceSort);

// =============================================================================
// Product Query
// =============================================================================

/// Search, filters and sort key of the product list.
///
/// `category: None` is the "All" choice of the picker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductQuery {
    pub search: String,
    pub category: Option<Category>,
    pub active: Option<bool>,
    pub created: DateRange,
    pub sort: ProductSort,
}

impl ProductQuery {
    /// True if `product` passes every active filter.
    pub fn matches(&self, product: &Product) -> bool {
        let needle = fold_case(self.search.trim());
        self.matches_folded(product, &needle)
    }

    fn matches_folded(&self, product: &Product, needle: &str) -> bool {
        (needle.is_empty() || fold_case(&product.name).contains(needle))
            && self.category.map_or(true, |c| product.category == c)
            && self.active.map_or(true, |a| product.is_active == a)
            && self.created.contains(product.date_created)
    }

    /// Returns the matching products in display order.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let needle = fold_case(self.search.trim());
        let mut out: Vec<Product> = products
            .iter()
            .filter(|p| self.matches_folded(p, &needle))
            .cloned()
            .collect();

        match self.sort {
            ProductSort::DateDesc => out.sort_by_key(|p| Reverse(p.date_created)),
            ProductSort::NameAsc => out.sort_by_cached_key(|p| CollationKey::new(&p.name)),
            ProductSort::NameDesc => {
                out.sort_by_cached_key(|p| Reverse(CollationKey::new(&p.name)))
            }
            ProductSort::PriceAsc => out.sort_by_key(|p| p.standard_price),
            ProductSort::PriceDesc => out.sort_by_key(|p| Reverse(p.standard_price)),
        }

        out
    }
}

// =============================================================================
// Invoice Query
// =============================================================================

/// Search, filters and sort key of the invoice history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceQuery {
    /// Matched against the names of the invoice's lines.
    pub search: String,
    pub created: DateRange,
    pub sort: InvoiceSort,
}

impl InvoiceQuery {
    pub fn matches(&self, invoice: &Invoice) -> bool {
        let needle = fold_case(self.search.trim());
        self.matches_folded(invoice, &needle)
    }

    fn matches_folded(&self, invoice: &Invoice, needle: &str) -> bool {
        let name_hit = needle.is_empty()
            || invoice
                .items
                .iter()
                .any(|item| fold_case(&item.product.name).contains(needle));
        name_hit && self.created.contains(invoice.created_at)
    }

    /// Returns the matching invoices in display order.
    pub fn apply(&self, invoices: &[Invoice]) -> Vec<Invoice> {
        let needle = fold_case(self.search.trim());
        let mut out: Vec<Invoice> = invoices
            .iter()
            .filter(|i| self.matches_folded(i, &needle))
            .cloned()
            .collect();

        match self.sort {
            InvoiceSort::DateDesc => out.sort_by_key(|i| Reverse(i.created_at)),
            InvoiceSort::DateAsc => out.sort_by_key(|i| i.created_at),
            InvoiceSort::TotalAsc => out.sort_by_key(|i| i.total),
            InvoiceSort::TotalDesc => out.sort_by_key(|i| Reverse(i.total)),
        }

        out
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
