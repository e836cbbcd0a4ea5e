//! # Domain Types
//!
//! Records persisted in the key-value store and the line items of a cart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartItem     │   │    Invoice      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (scanned)   │──►│  Product fields │──►│  id (invoice_…) │       │
//! │  │  name           │   │  + quantity     │   │  createdAt      │       │
//! │  │  category       │   │                 │   │  items (copy)   │       │
//! │  │  standard_price │   └─────────────────┘   │  total          │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │   key: id                                     key: id                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! A product's `id` is the decoded value of its QR/barcode. It is assigned
//! once by the scanner and never regenerated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// The fixed set of retail categories a product can belong to.
///
/// Serialized as the Vietnamese display label, which is what the stored
/// records carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Category {
    #[default]
    #[serde(rename = "Hàng tiêu dùng nhanh")]
    FastMovingConsumerGoods,
    #[serde(rename = "Điện tử – Công nghệ")]
    Electronics,
    #[serde(rename = "Điện lạnh – Điện gia dụng")]
    HomeAppliances,
    #[serde(rename = "Thời trang – Phụ kiện")]
    FashionAccessories,
    #[serde(rename = "Sức khỏe – Làm đẹp")]
    HealthBeauty,
    #[serde(rename = "Đồ mẹ và bé")]
    MotherBaby,
    #[serde(rename = "Nội thất – Trang trí")]
    FurnitureDecor,
    #[serde(rename = "Thể thao – Dã ngoại")]
    SportsOutdoor,
    #[serde(rename = "Ô tô – Xe máy – Công cụ")]
    AutoMotoTools,
    #[serde(rename = "Sách – Văn phòng phẩm")]
    BooksStationery,
    #[serde(rename = "Nông sản – Thực phẩm")]
    AgricultureFood,
    #[serde(rename = "Dịch vụ")]
    Services,
}

impl Category {
    /// Every category, in picker order.
    pub const ALL: [Category; 12] = [
        Category::FastMovingConsumerGoods,
        Category::Electronics,
        Category::HomeAppliances,
        Category::FashionAccessories,
        Category::HealthBeauty,
        Category::MotherBaby,
        Category::FurnitureDecor,
        Category::SportsOutdoor,
        Category::AutoMotoTools,
        Category::BooksStationery,
        Category::AgricultureFood,
        Category::Services,
    ];

    /// The display label, identical to the serialized form.
    pub const fn label(&self) -> &'static str {
        match self {
            Category::FastMovingConsumerGoods => "Hàng tiêu dùng nhanh",
            Category::Electronics => "Điện tử – Công nghệ",
            Category::HomeAppliances => "Điện lạnh – Điện gia dụng",
            Category::FashionAccessories => "Thời trang – Phụ kiện",
            Category::HealthBeauty => "Sức khỏe – Làm đẹp",
            Category::MotherBaby => "Đồ mẹ và bé",
            Category::FurnitureDecor => "Nội thất – Trang trí",
            Category::SportsOutdoor => "Thể thao – Dã ngoại",
            Category::AutoMotoTools => "Ô tô – Xe máy – Công cụ",
            Category::BooksStationery => "Sách – Văn phòng phẩm",
            Category::AgricultureFood => "Nông sản – Thực phẩm",
            Category::Services => "Dịch vụ",
        }
    }

    /// ASCII slug accepted on the command line.
    pub const fn slug(&self) -> &'static str {
        match self {
            Category::FastMovingConsumerGoods => "fmcg",
            Category::Electronics => "electronics",
            Category::HomeAppliances => "home_appliances",
            Category::FashionAccessories => "fashion",
            Category::HealthBeauty => "health_beauty",
            Category::MotherBaby => "mother_baby",
            Category::FurnitureDecor => "furniture",
            Category::SportsOutdoor => "sports",
            Category::AutoMotoTools => "auto_moto",
            Category::BooksStationery => "books",
            Category::AgricultureFood => "food",
            Category::Services => "services",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    /// Accepts either the display label or the slug (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.label() == s || c.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: Category::ALL.iter().map(|c| c.slug().to_string()).collect(),
            })
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product record, stored under its own `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Decoded QR/barcode value.
    pub id: String,

    pub name: String,

    pub category: Category,

    #[serde(default)]
    pub description: Option<String>,

    /// Opaque image URI.
    #[serde(default)]
    pub image: Option<String>,

    /// Set once when the product is created.
    #[ts(as = "String")]
    pub date_created: DateTime<Utc>,

    pub is_active: bool,

    /// Selling price per unit.
    pub standard_price: Money,

    /// Purchase cost per unit.
    pub standard_cost: Money,
}

impl Product {
    /// Applies an edit, leaving `id` and `date_created` untouched.
    pub fn apply_patch(&mut self, patch: ProductPatch) {
        let ProductPatch {
            name,
            category,
            description,
            image,
            is_active,
            standard_price,
            standard_cost,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(image) = image {
            self.image = image;
        }
        if let Some(is_active) = is_active {
            self.is_active = is_active;
        }
        if let Some(price) = standard_price {
            self.standard_price = price;
        }
        if let Some(cost) = standard_cost {
            self.standard_cost = cost;
        }
    }
}

/// Input of the add-product form.
///
/// `id` comes from the scan that found no existing product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
    pub standard_price: Money,
    pub standard_cost: Money,
}

impl NewProduct {
    /// Stamps the creation time and produces the record to store.
    ///
    /// Blank optional strings are stored as absent.
    pub fn into_product(self, now: DateTime<Utc>) -> Product {
        Product {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            category: self.category,
            description: non_blank(self.description),
            image: non_blank(self.image),
            date_created: now,
            is_active: self.is_active,
            standard_price: self.standard_price,
            standard_cost: self.standard_cost,
        }
    }
}

/// Changes made on the product detail screen.
///
/// `None` leaves a field as it is. For the optional fields, `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub description: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub standard_price: Option<Money>,
    pub standard_cost: Option<Money>,
}

impl ProductPatch {
    /// True if the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        *self == ProductPatch::default()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart: the scanned product plus a quantity.
///
/// Serialized flat, i.e. the product's fields with an extra `quantity`,
/// which is also the shape of each entry of an invoice's `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,

    /// Always at least 1 while the item is in a cart.
    pub quantity: i64,
}

impl CartItem {
    /// A fresh line with quantity 1.
    pub fn new(product: Product) -> Self {
        CartItem {
            product,
            quantity: 1,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.product.id
    }

    /// `standard_price × quantity`, or `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.product.standard_price.checked_mul(self.quantity)
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A completed checkout.
///
/// Created once and never modified; `total` is computed at checkout time
/// and stored, not recomputed from `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Invoice {
    /// `invoice_` followed by the checkout instant.
    pub id: String,

    #[serde(rename = "createdAt")]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Copy of the cart lines at checkout.
    pub items: Vec<CartItem>,

    pub total: Money,
}

impl Invoice {
    /// Sum of quantities over all lines.
    ///
    /// Saturates at `i64::MAX` instead of overflowing.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, i| acc.saturating_add(i.quantity))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
